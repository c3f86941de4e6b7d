// Domain models shared by the store, the classification engine and the routes

mod archetype;
mod consolidated;
mod continuity;
mod range;
mod report;
mod snapshot;
mod vitality;

pub use archetype::{ArchetypeStyle, IssueSeverity, PointAnalysis, PointArchetype, PointIssue};
pub use consolidated::ConsolidatedPoint;
pub use continuity::{ContinuityLabel, ContinuityReport};
pub use range::{Granularity, MS_PER_DAY, MS_PER_HOUR, TimeRange};
pub use report::NodeReport;
pub use snapshot::NodeSnapshot;
pub use vitality::{StatusStyle, VitalityResult, VitalityStatus};

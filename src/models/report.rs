// Live report published per watched node (broadcast + /api/vitality).

use serde::Serialize;

use super::{ContinuityReport, NodeSnapshot, VitalityResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    pub identity: String,
    /// Latest stored snapshot for the identity.
    pub snapshot: NodeSnapshot,
    pub vitality: VitalityResult,
    pub continuity: ContinuityReport,
}

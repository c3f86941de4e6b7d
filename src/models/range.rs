// Display time ranges and their consolidation granularity.

use serde::{Deserialize, Serialize};

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

/// Caller-requested history window. Granularity is range-driven, never
/// data-driven: ranges up to 7 days stay at raw/hourly resolution, 30 days
/// and up consolidate to one point per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24H")]
    H24,
    #[serde(rename = "3D")]
    D3,
    #[serde(rename = "7D")]
    D7,
    #[serde(rename = "30D")]
    D30,
    #[serde(rename = "ALL")]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Raw,
    Hourly,
    Daily,
}

impl TimeRange {
    /// Parses the wire form ("24H", "3D", "7D", "30D", "ALL"), case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "24H" => Some(Self::H24),
            "3D" => Some(Self::D3),
            "7D" => Some(Self::D7),
            "30D" => Some(Self::D30),
            "ALL" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H24 => "24H",
            Self::D3 => "3D",
            Self::D7 => "7D",
            Self::D30 => "30D",
            Self::All => "ALL",
        }
    }

    pub fn lookback_days(self) -> u32 {
        match self {
            Self::H24 => 1,
            Self::D3 => 3,
            Self::D7 => 7,
            Self::D30 => 30,
            Self::All => 365,
        }
    }

    pub fn lookback_ms(self) -> i64 {
        self.lookback_days() as i64 * MS_PER_DAY
    }

    pub fn granularity(self) -> Granularity {
        match self {
            Self::H24 => Granularity::Raw,
            Self::D3 | Self::D7 => Granularity::Hourly,
            Self::D30 | Self::All => Granularity::Daily,
        }
    }
}

impl Granularity {
    /// Bucket width for consolidation; None means pass-through.
    pub fn bucket_ms(self) -> Option<i64> {
        match self {
            Self::Raw => None,
            Self::Hourly => Some(MS_PER_HOUR),
            Self::Daily => Some(MS_PER_DAY),
        }
    }
}

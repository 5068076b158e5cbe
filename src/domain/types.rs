use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Verdict category → engine count, as reported by the reputation service.
pub type ScanReport = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Spam,
    NotSpam,
}

impl Verdict {
    pub fn from_spam(is_spam: bool) -> Self {
        if is_spam {
            Verdict::Spam
        } else {
            Verdict::NotSpam
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Spam => "Spam Email!",
            Verdict::NotSpam => "Not Spam Email!",
        }
    }
}

/// Result of one submit + retrieve cycle against the reputation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub scan_id: String,
    pub report: ScanReport,
    /// Analysis state reported with the statistics; anything other than
    /// `completed` means the counts may still change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ScanOutcome {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "completed")
    }
}

use serde::{Deserialize, Serialize};

/// Load state of one upstream data source, as reported by the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Loading,
    Success,
    Error,
}

impl SourceStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceStatus::Success)
    }
}

/// Per-source statuses for one computation pass. Totals are withheld until
/// every source has loaded, so a consumer can never catch an income-only
/// transient where income shows with no tax offset. A new fetch cycle is
/// represented by a new value, never by mutating a previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatus {
    pub income: SourceStatus,
    pub expenses: SourceStatus,
    pub tax_profile: SourceStatus,
    pub user_profile: SourceStatus,
}

impl LoadStatus {
    /// All four sources loaded in a single computation pass.
    pub fn all_loaded() -> Self {
        LoadStatus {
            income: SourceStatus::Success,
            expenses: SourceStatus::Success,
            tax_profile: SourceStatus::Success,
            user_profile: SourceStatus::Success,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.income.is_success()
            && self.expenses.is_success()
            && self.tax_profile.is_success()
            && self.user_profile.is_success()
    }
}

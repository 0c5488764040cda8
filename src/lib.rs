pub mod aggregate;
pub mod cmd;
pub mod dashboard;
pub mod pipeline;
pub mod range;
pub mod readiness;
pub mod records;
pub mod tax;
pub mod utils;

// Flat public surface for domain types and functions.
pub use aggregate::{aggregate_records, Aggregates};
pub use dashboard::{
    compose_dashboard, Bucket, CumulativePoint, DashboardData, DashboardTotals, IncomeBreakdown,
    MonthlyPoint, TotalsState,
};
pub use pipeline::{compute_dashboard, PipelineInput};
pub use range::{DateWindow, RangeError, RangeSelector};
pub use readiness::{LoadStatus, SourceStatus};
pub use records::{
    ExpenseCategory, ExpenseRecord, FilingStatus, IncomeEvent, MileageRecord, RecordsInput,
    SubcontractorPayment, TaxProfile,
};
pub use tax::{
    estimate_tax, federal_income_floor, StateCode, StatePolicy, TaxBreakdown, TaxNote, TaxTables,
};

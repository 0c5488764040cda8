use crate::aggregate::aggregate_records;
use crate::dashboard::{compose_dashboard, DashboardData};
use crate::range::{RangeError, RangeSelector};
use crate::readiness::LoadStatus;
use crate::records::{ExpenseRecord, IncomeEvent, MileageRecord, TaxProfile};
use crate::tax::{estimate_tax, TaxTables};
use chrono::NaiveDate;

/// Every external input for one computation pass, passed explicitly. The
/// pipeline never reaches into ambient state; re-running with an identical
/// input yields an identical output.
#[derive(Debug, Clone)]
pub struct PipelineInput<'a> {
    pub incomes: &'a [IncomeEvent],
    pub expenses: &'a [ExpenseRecord],
    pub mileage: &'a [MileageRecord],
    pub profile: Option<&'a TaxProfile>,
    pub statuses: LoadStatus,
    pub selector: RangeSelector,
    /// Wall-clock date, injected so resolution is reproducible.
    pub today: NaiveDate,
    pub tables: &'a TaxTables,
}

/// Resolve the range, aggregate the records, estimate tax (only once every
/// upstream source has loaded) and compose the dashboard. The only failure
/// mode is an invalid custom range, which fails closed rather than guessing
/// a window.
pub fn compute_dashboard(input: &PipelineInput) -> Result<DashboardData, RangeError> {
    let window = input.selector.resolve(input.today)?;
    log::debug!("resolved {:?} to {}..{}", input.selector, window.start, window.end);

    let agg = aggregate_records(
        input.incomes,
        input.expenses,
        input.mileage,
        window,
        input.tables.mileage_rate(),
    );

    let tax = if input.statuses.is_ready() {
        Some(estimate_tax(
            agg.net_earnings(),
            agg.gross_earnings(),
            input.profile,
            input.tables,
        ))
    } else {
        None
    };

    Ok(compose_dashboard(&agg, tax.as_ref(), window))
}

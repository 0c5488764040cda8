use crate::aggregate::Aggregates;
use crate::range::DateWindow;
use crate::tax::TaxBreakdown;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// How many category/payer buckets are kept before collapsing into "Other".
const TOP_BUCKETS: usize = 8;

/// One calendar month of the selected range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    /// e.g. "Jan 2025"
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    /// Share of the period's total tax, proportional to this month's income.
    pub taxes: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativePoint {
    pub month: String,
    pub running_net: Decimal,
}

/// A labelled amount in a category or payer breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub amount: Decimal,
}

/// Itemization of the income side for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeBreakdown {
    pub gross: Decimal,
    pub tips: Decimal,
    pub per_diem: Decimal,
    pub other: Decimal,
    pub fees: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    /// Net earnings after estimated taxes.
    pub net: Decimal,
    pub taxes: Decimal,
    pub effective_tax_rate: Decimal,
}

/// Totals and the tax breakdown are one atomic unit: either the pass had
/// every source loaded and both are present, or neither is. "Still loading"
/// is therefore never confusable with "computed as zero".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TotalsState {
    Pending,
    Ready {
        totals: DashboardTotals,
        tax_breakdown: TaxBreakdown,
    },
}

impl TotalsState {
    pub fn is_ready(&self) -> bool {
        matches!(self, TotalsState::Ready { .. })
    }
}

/// The composed output handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardData {
    pub is_ready: bool,
    pub monthly: Vec<MonthlyPoint>,
    pub cumulative_net: Vec<CumulativePoint>,
    pub expense_breakdown: Vec<Bucket>,
    pub payer_breakdown: Vec<Bucket>,
    pub income_breakdown: IncomeBreakdown,
    pub gigs_count: usize,
    pub total_gross_income: Decimal,
    pub totals: TotalsState,
}

/// Build the dashboard shape from filtered records and a (gated) breakdown.
/// `tax` is `None` while upstream sources are still loading; monthly tax
/// allocation is then zero and totals stay `Pending`.
pub fn compose_dashboard(
    agg: &Aggregates,
    tax: Option<&TaxBreakdown>,
    window: DateWindow,
) -> DashboardData {
    let total_income = agg.gross_earnings();
    let total_tax = tax.map(|t| t.total).unwrap_or(Decimal::ZERO);

    let mut monthly = Vec::new();
    for month in months_in(window) {
        let label = month.format("%b %Y").to_string();
        let income: Decimal = agg
            .incomes
            .iter()
            .filter(|g| g.date.is_some_and(|d| same_month(d, month)))
            .map(|g| g.net_income())
            .sum();
        let subcontractor: Decimal = agg
            .incomes
            .iter()
            .filter(|g| g.date.is_some_and(|d| same_month(d, month)))
            .map(|g| g.subcontractor_total())
            .sum();
        let expense: Decimal = agg
            .expenses
            .iter()
            .filter(|e| e.date.is_some_and(|d| same_month(d, month)))
            .map(|e| e.amount)
            .sum();
        let miles: Decimal = agg
            .mileage
            .iter()
            .filter(|m| m.date.is_some_and(|d| same_month(d, month)))
            .map(|m| m.miles)
            .sum();
        let mileage_deduction = if agg.total_miles.is_zero() {
            Decimal::ZERO
        } else {
            agg.mileage_deduction * miles / agg.total_miles
        };
        let expenses = expense + mileage_deduction + subcontractor;

        // Guard kept explicit: zero income for the whole period means zero
        // allocation, never a division.
        let taxes = if total_income.is_zero() {
            Decimal::ZERO
        } else {
            total_tax * income / total_income
        };

        monthly.push(MonthlyPoint {
            month: label,
            income,
            expenses,
            taxes,
            net: income - expenses - taxes,
        });
    }

    let mut running = Decimal::ZERO;
    let cumulative_net = monthly
        .iter()
        .map(|p| {
            running += p.net;
            CumulativePoint {
                month: p.month.clone(),
                running_net: running,
            }
        })
        .collect();

    let mut expense_items: Vec<(String, Decimal)> = agg
        .expenses
        .iter()
        .map(|e| (e.taxonomy_category().label().to_string(), e.amount))
        .collect();
    if agg.mileage_deduction > Decimal::ZERO {
        expense_items.push(("Mileage".to_string(), agg.mileage_deduction));
    }
    let expense_breakdown = top_buckets(expense_items);

    let payer_items: Vec<(String, Decimal)> = agg
        .incomes
        .iter()
        .map(|g| {
            let label = g
                .payer_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            (label, g.net_income())
        })
        .collect();
    let payer_breakdown = top_buckets(payer_items);

    let totals = match tax {
        Some(tax) => TotalsState::Ready {
            totals: DashboardTotals {
                net: agg.net_earnings() - tax.total,
                taxes: tax.total,
                effective_tax_rate: tax.effective_rate,
            },
            tax_breakdown: tax.clone(),
        },
        None => TotalsState::Pending,
    };

    DashboardData {
        is_ready: totals.is_ready(),
        monthly,
        cumulative_net,
        expense_breakdown,
        payer_breakdown,
        income_breakdown: IncomeBreakdown {
            gross: agg.total_gross,
            tips: agg.total_tips,
            per_diem: agg.total_per_diem,
            other: agg.total_other_income,
            fees: agg.total_fees,
        },
        gigs_count: agg.incomes.len(),
        total_gross_income: agg.total_gross,
        totals,
    }
}

/// Group labelled amounts (first-encountered order preserved), sort
/// descending with a stable sort so ties keep encounter order, keep the top
/// eight and collapse the rest into an "Other" bucket holding the exact
/// remainder.
fn top_buckets(items: Vec<(String, Decimal)>) -> Vec<Bucket> {
    let mut order: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (label, amount) in items {
        match index.get(&label) {
            Some(&i) => order[i].amount += amount,
            None => {
                index.insert(label.clone(), order.len());
                order.push(Bucket { label, amount });
            }
        }
    }

    // Vec::sort_by is stable; equal amounts keep first-encountered order.
    order.sort_by(|a, b| b.amount.cmp(&a.amount));

    if order.len() > TOP_BUCKETS {
        let other_amount: Decimal = order[TOP_BUCKETS..].iter().map(|b| b.amount).sum();
        order.truncate(TOP_BUCKETS);
        order.push(Bucket {
            label: "Other".to_string(),
            amount: other_amount,
        });
    }
    order
}

/// First-of-month dates for every calendar month overlapping the window,
/// chronological, empty months included.
fn months_in(window: DateWindow) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = month_start(window.start);
    let last = month_start(window.end);
    while current <= last {
        months.push(current);
        current = next_month(current);
    }
    months
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn next_month(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}

fn same_month(date: NaiveDate, month: NaiveDate) -> bool {
    date.year() == month.year() && date.month() == month.month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_records;
    use crate::records::{ExpenseRecord, IncomeEvent};
    use rust_decimal_macros::dec;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow {
            start: date(start).unwrap(),
            end: date(end).unwrap(),
        }
    }

    fn gig(d: &str, payer: &str, gross: Decimal) -> IncomeEvent {
        IncomeEvent {
            date: date(d),
            gross_amount: gross,
            tips: Decimal::ZERO,
            per_diem: Decimal::ZERO,
            other_income: Decimal::ZERO,
            fees: Decimal::ZERO,
            payer_name: if payer.is_empty() {
                None
            } else {
                Some(payer.to_string())
            },
            subcontractor_payments: vec![],
        }
    }

    fn expense(d: &str, category: &str, amount: Decimal) -> ExpenseRecord {
        ExpenseRecord {
            date: date(d),
            category: category.to_string(),
            amount,
        }
    }

    fn aggregates(
        incomes: Vec<IncomeEvent>,
        expenses: Vec<ExpenseRecord>,
        w: DateWindow,
    ) -> Aggregates {
        aggregate_records(&incomes, &expenses, &[], w, dec!(0.67))
    }

    fn breakdown(total: Decimal) -> TaxBreakdown {
        TaxBreakdown {
            se_tax: total,
            federal: Decimal::ZERO,
            state: Decimal::ZERO,
            local: Decimal::ZERO,
            total,
            effective_rate: dec!(0.1),
            federal_floor: None,
            notes: vec![],
        }
    }

    #[test]
    fn empty_months_included_in_order() {
        let w = window("2025-01-15", "2025-04-10");
        let agg = aggregates(vec![gig("2025-01-20", "A", dec!(100))], vec![], w);
        let data = compose_dashboard(&agg, None, w);
        let labels: Vec<&str> = data.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(labels, ["Jan 2025", "Feb 2025", "Mar 2025", "Apr 2025"]);
        assert_eq!(data.monthly[1].income, dec!(0));
    }

    #[test]
    fn monthly_tax_allocation_proportional_and_sums_to_total() {
        let w = window("2025-01-01", "2025-03-31");
        let agg = aggregates(
            vec![
                gig("2025-01-10", "A", dec!(3000)),
                gig("2025-02-10", "A", dec!(1000)),
                gig("2025-03-10", "A", dec!(2000)),
            ],
            vec![],
            w,
        );
        let tax = breakdown(dec!(900));
        let data = compose_dashboard(&agg, Some(&tax), w);
        assert_eq!(data.monthly[0].taxes, dec!(450));
        assert_eq!(data.monthly[1].taxes, dec!(150));
        assert_eq!(data.monthly[2].taxes, dec!(300));

        let allocated: Decimal = data.monthly.iter().map(|m| m.taxes).sum();
        assert!((allocated - tax.total).abs() < dec!(0.01));
    }

    #[test]
    fn zero_income_period_allocates_zero_tax() {
        let w = window("2025-01-01", "2025-02-28");
        let agg = aggregates(vec![], vec![expense("2025-01-05", "gas", dec!(100))], w);
        let tax = breakdown(dec!(0));
        let data = compose_dashboard(&agg, Some(&tax), w);
        for m in &data.monthly {
            assert_eq!(m.taxes, dec!(0));
        }
    }

    #[test]
    fn cumulative_net_is_running_sum() {
        let w = window("2025-01-01", "2025-03-31");
        let agg = aggregates(
            vec![
                gig("2025-01-10", "A", dec!(1000)),
                gig("2025-02-10", "A", dec!(500)),
            ],
            vec![expense("2025-03-05", "gas", dec!(200))],
            w,
        );
        let data = compose_dashboard(&agg, None, w);
        assert_eq!(data.cumulative_net[0].running_net, dec!(1000));
        assert_eq!(data.cumulative_net[1].running_net, dec!(1500));
        assert_eq!(data.cumulative_net[2].running_net, dec!(1300));
    }

    #[test]
    fn top_eight_plus_other_preserves_grand_total() {
        // 10 payers with sums 100, 90, ..., 10.
        let w = window("2025-01-01", "2025-01-31");
        let incomes: Vec<IncomeEvent> = (0..10)
            .map(|i| {
                gig(
                    "2025-01-10",
                    &format!("Payer{i}"),
                    Decimal::from(100 - 10 * i),
                )
            })
            .collect();
        let agg = aggregates(incomes, vec![], w);
        let data = compose_dashboard(&agg, None, w);

        assert_eq!(data.payer_breakdown.len(), 9);
        assert_eq!(data.payer_breakdown[0].label, "Payer0");
        assert_eq!(data.payer_breakdown[0].amount, dec!(100));
        let other = data.payer_breakdown.last().unwrap();
        assert_eq!(other.label, "Other");
        // Two smallest: 20 + 10.
        assert_eq!(other.amount, dec!(30));

        let sum: Decimal = data.payer_breakdown.iter().map(|b| b.amount).sum();
        assert_eq!(sum, dec!(550));
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let w = window("2025-01-01", "2025-01-31");
        let agg = aggregates(
            vec![
                gig("2025-01-10", "Zeta", dec!(50)),
                gig("2025-01-11", "Alpha", dec!(50)),
            ],
            vec![],
            w,
        );
        let data = compose_dashboard(&agg, None, w);
        assert_eq!(data.payer_breakdown[0].label, "Zeta");
        assert_eq!(data.payer_breakdown[1].label, "Alpha");
    }

    #[test]
    fn unknown_payer_bucketed_as_unknown() {
        let w = window("2025-01-01", "2025-01-31");
        let agg = aggregates(vec![gig("2025-01-10", "", dec!(75))], vec![], w);
        let data = compose_dashboard(&agg, None, w);
        assert_eq!(data.payer_breakdown[0].label, "Unknown");
    }

    #[test]
    fn mileage_is_synthetic_expense_category() {
        let w = window("2025-01-01", "2025-01-31");
        let miles = vec![crate::records::MileageRecord {
            date: date("2025-01-10"),
            miles: dec!(100),
        }];
        let agg = aggregate_records(&[], &[], &miles, w, dec!(0.67));
        let data = compose_dashboard(&agg, None, w);
        assert_eq!(data.expense_breakdown[0].label, "Mileage");
        assert_eq!(data.expense_breakdown[0].amount, dec!(67));
    }

    #[test]
    fn pending_withholds_totals_atomically() {
        let w = window("2025-01-01", "2025-01-31");
        let agg = aggregates(vec![gig("2025-01-10", "A", dec!(1000))], vec![], w);
        let data = compose_dashboard(&agg, None, w);
        assert!(!data.is_ready);
        assert_eq!(data.totals, TotalsState::Pending);
        // Series data is still present; only totals are withheld.
        assert_eq!(data.monthly.len(), 1);
    }

    #[test]
    fn ready_exposes_totals_and_breakdown_together() {
        let w = window("2025-01-01", "2025-01-31");
        let agg = aggregates(vec![gig("2025-01-10", "A", dec!(1000))], vec![], w);
        let tax = breakdown(dec!(150));
        let data = compose_dashboard(&agg, Some(&tax), w);
        assert!(data.is_ready);
        match data.totals {
            TotalsState::Ready {
                totals,
                tax_breakdown,
            } => {
                assert_eq!(totals.taxes, dec!(150));
                assert_eq!(totals.net, dec!(850));
                assert_eq!(tax_breakdown.total, dec!(150));
            }
            TotalsState::Pending => panic!("expected ready totals"),
        }
    }
}

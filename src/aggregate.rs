use crate::range::DateWindow;
use crate::records::{ExpenseRecord, IncomeEvent, MileageRecord};
use rust_decimal::Decimal;

/// Window-filtered records plus the scalar sums everything downstream uses.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub incomes: Vec<IncomeEvent>,
    pub expenses: Vec<ExpenseRecord>,
    pub mileage: Vec<MileageRecord>,
    pub total_gross: Decimal,
    pub total_tips: Decimal,
    pub total_per_diem: Decimal,
    pub total_other_income: Decimal,
    pub total_fees: Decimal,
    pub total_expenses: Decimal,
    pub total_miles: Decimal,
    pub mileage_deduction: Decimal,
    pub total_subcontractor: Decimal,
}

impl Aggregates {
    /// Income net of platform fees, before costs.
    pub fn gross_earnings(&self) -> Decimal {
        self.total_gross + self.total_tips + self.total_per_diem + self.total_other_income
            - self.total_fees
    }

    /// Earnings after expenses, mileage deduction and subcontractor payments.
    /// This is the figure the tax engine operates on; it can be negative.
    pub fn net_earnings(&self) -> Decimal {
        self.gross_earnings()
            - (self.total_expenses + self.mileage_deduction + self.total_subcontractor)
    }
}

/// Filter the three collections into `window` and sum the totals. Records
/// without a parseable date are excluded, never defaulted to today.
pub fn aggregate_records(
    incomes: &[IncomeEvent],
    expenses: &[ExpenseRecord],
    mileage: &[MileageRecord],
    window: DateWindow,
    mileage_rate: Decimal,
) -> Aggregates {
    let dropped = incomes.iter().filter(|g| g.date.is_none()).count()
        + expenses.iter().filter(|e| e.date.is_none()).count()
        + mileage.iter().filter(|m| m.date.is_none()).count();
    if dropped > 0 {
        log::debug!("excluding {dropped} record(s) with missing or malformed dates");
    }

    let incomes: Vec<IncomeEvent> = incomes
        .iter()
        .filter(|g| g.date.is_some_and(|d| window.contains(d)))
        .cloned()
        .collect();
    let expenses: Vec<ExpenseRecord> = expenses
        .iter()
        .filter(|e| e.date.is_some_and(|d| window.contains(d)))
        .cloned()
        .collect();
    let mileage: Vec<MileageRecord> = mileage
        .iter()
        .filter(|m| m.date.is_some_and(|d| window.contains(d)))
        .cloned()
        .collect();

    let total_gross = incomes.iter().map(|g| g.gross_amount).sum();
    let total_tips = incomes.iter().map(|g| g.tips).sum();
    let total_per_diem = incomes.iter().map(|g| g.per_diem).sum();
    let total_other_income = incomes.iter().map(|g| g.other_income).sum();
    let total_fees = incomes.iter().map(|g| g.fees).sum();
    let total_subcontractor = incomes.iter().map(|g| g.subcontractor_total()).sum();
    let total_expenses = expenses.iter().map(|e| e.amount).sum();
    let total_miles: Decimal = mileage.iter().map(|m| m.miles).sum();
    let mileage_deduction = total_miles * mileage_rate;

    Aggregates {
        incomes,
        expenses,
        mileage,
        total_gross,
        total_tips,
        total_per_diem,
        total_other_income,
        total_fees,
        total_expenses,
        total_miles,
        mileage_deduction,
        total_subcontractor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
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

    fn gig(d: Option<NaiveDate>, gross: Decimal) -> IncomeEvent {
        IncomeEvent {
            date: d,
            gross_amount: gross,
            tips: Decimal::ZERO,
            per_diem: Decimal::ZERO,
            other_income: Decimal::ZERO,
            fees: Decimal::ZERO,
            payer_name: None,
            subcontractor_payments: vec![],
        }
    }

    fn expense(d: Option<NaiveDate>, amount: Decimal) -> ExpenseRecord {
        ExpenseRecord {
            date: d,
            category: "supplies".into(),
            amount,
        }
    }

    #[test]
    fn filters_to_window_inclusive() {
        let incomes = vec![
            gig(date("2025-01-01"), dec!(100)),
            gig(date("2025-01-31"), dec!(200)),
            gig(date("2025-02-01"), dec!(400)),
        ];
        let agg = aggregate_records(
            &incomes,
            &[],
            &[],
            window("2025-01-01", "2025-01-31"),
            dec!(0.67),
        );
        assert_eq!(agg.incomes.len(), 2);
        assert_eq!(agg.total_gross, dec!(300));
    }

    #[test]
    fn undated_records_excluded_not_defaulted() {
        let incomes = vec![gig(None, dec!(9999)), gig(date("2025-01-15"), dec!(100))];
        let agg = aggregate_records(
            &incomes,
            &[],
            &[],
            window("2025-01-01", "2025-01-31"),
            dec!(0.67),
        );
        assert_eq!(agg.incomes.len(), 1);
        assert_eq!(agg.total_gross, dec!(100));
    }

    #[test]
    fn mileage_deduction_uses_rate() {
        let miles = vec![
            MileageRecord {
                date: date("2025-01-10"),
                miles: dec!(100),
            },
            MileageRecord {
                date: date("2025-01-20"),
                miles: dec!(50),
            },
        ];
        let agg = aggregate_records(
            &[],
            &[],
            &miles,
            window("2025-01-01", "2025-01-31"),
            dec!(0.67),
        );
        assert_eq!(agg.total_miles, dec!(150));
        assert_eq!(agg.mileage_deduction, dec!(100.50));
    }

    #[test]
    fn net_earnings_subtracts_all_costs() {
        let mut g = gig(date("2025-01-10"), dec!(2000));
        g.tips = dec!(100);
        g.fees = dec!(50);
        g.subcontractor_payments = vec![crate::records::SubcontractorPayment {
            description: None,
            amount: dec!(300),
        }];
        let expenses = vec![expense(date("2025-01-12"), dec!(250))];
        let miles = vec![MileageRecord {
            date: date("2025-01-15"),
            miles: dec!(100),
        }];
        let agg = aggregate_records(
            &[g],
            &expenses,
            &miles,
            window("2025-01-01", "2025-01-31"),
            dec!(0.67),
        );
        // (2000 + 100 - 50) - (250 + 67 + 300)
        assert_eq!(agg.gross_earnings(), dec!(2050));
        assert_eq!(agg.net_earnings(), dec!(1433));
    }

    #[test]
    fn net_earnings_can_be_negative() {
        let expenses = vec![expense(date("2025-01-12"), dec!(500))];
        let agg = aggregate_records(
            &[],
            &expenses,
            &[],
            window("2025-01-01", "2025-01-31"),
            dec!(0.67),
        );
        assert_eq!(agg.net_earnings(), dec!(-500));
    }
}

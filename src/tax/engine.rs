use crate::records::TaxProfile;
use crate::tax::brackets::{bracket_tax, StandardDeduction};
use crate::tax::states::{StateCode, StatePolicy};
use crate::tax::tables::TaxTables;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Notes attached to an estimate when a piece could not be computed.
/// A zero with a note is a configuration gap; a bare zero is a real zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum TaxNote {
    /// No tax profile on file; only SE tax was computed.
    ProfileMissing,
    /// The profile's state code is not a recognized jurisdiction.
    StateNotRecognized { state: String },
    /// The state levies county tax but no usable county was supplied.
    LocalTaxNotComputed { state: String },
    /// Net SE earnings fell below the $400 floor, so no SE tax is owed.
    SeBelowMinimum,
}

/// Estimated liability for the period, by component. Components are rounded
/// to cents individually; `total` is the exact sum of the rounded parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxBreakdown {
    #[schemars(with = "f64")]
    pub se_tax: Decimal,
    #[schemars(with = "f64")]
    pub federal: Decimal,
    #[schemars(with = "f64")]
    pub state: Decimal,
    #[schemars(with = "f64")]
    pub local: Decimal,
    #[schemars(with = "f64")]
    pub total: Decimal,
    /// total / net earnings, 0 when net earnings <= 0.
    #[schemars(with = "f64")]
    pub effective_rate: Decimal,
    /// Net earnings below this owe no federal tax (standard deduction plus
    /// half the SE tax). Absent when no profile was supplied.
    #[schemars(with = "Option<f64>")]
    pub federal_floor: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<TaxNote>,
}

impl TaxBreakdown {
    fn zero() -> Self {
        TaxBreakdown {
            se_tax: Decimal::ZERO,
            federal: Decimal::ZERO,
            state: Decimal::ZERO,
            local: Decimal::ZERO,
            total: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            federal_floor: None,
            notes: Vec::new(),
        }
    }
}

/// The income level at which federal tax first becomes non-zero: the
/// standard deduction plus half the SE tax. Single shared formula — the
/// engine's taxable-income computation and the user-facing "federal tax
/// starts at $X" explanation both call this.
pub fn federal_income_floor(deduction: Decimal, half_se: Decimal) -> Decimal {
    deduction + half_se
}

/// Estimate the period's tax liability. Pure function of its arguments;
/// `gross_income` is carried only as a reference figure for display.
pub fn estimate_tax(
    net_earnings: Decimal,
    gross_income: Decimal,
    profile: Option<&TaxProfile>,
    tables: &TaxTables,
) -> TaxBreakdown {
    let _ = gross_income;

    // Negative or zero net earnings owe nothing; returning before any
    // bracket math avoids sign errors on negative inputs.
    if net_earnings <= Decimal::ZERO {
        return TaxBreakdown::zero();
    }

    let mut notes = Vec::new();

    // Self-employment tax on 92.35% of net earnings.
    let se_base = net_earnings * tables.se_taxable_portion();
    let waive_floor = profile.is_some_and(|p| p.has_other_se_income);
    let se_tax_raw = if se_base < tables.se_minimum_earnings() && !waive_floor {
        notes.push(TaxNote::SeBelowMinimum);
        Decimal::ZERO
    } else {
        se_base * tables.se_rate()
    };
    // Half the SE tax is deductible before income tax.
    let half_se = se_tax_raw / dec!(2);

    let (federal_raw, state_raw, local_raw, federal_floor) = match profile {
        None => {
            notes.push(TaxNote::ProfileMissing);
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, None)
        }
        Some(profile) => {
            let deduction = tables.federal_deduction().for_status(profile.filing_status);
            let floor = federal_income_floor(deduction, half_se);
            let federal_taxable = (net_earnings - floor).max(Decimal::ZERO);
            let federal = bracket_tax(federal_taxable, &tables.federal_brackets(profile.filing_status));
            log::debug!("federal taxable {federal_taxable} (floor {floor}) -> {federal}");

            let (state, local) = match StateCode::from_str(&profile.state) {
                None => {
                    notes.push(TaxNote::StateNotRecognized {
                        state: profile.state.clone(),
                    });
                    (Decimal::ZERO, Decimal::ZERO)
                }
                Some(code) => state_and_local_tax(
                    net_earnings,
                    half_se,
                    profile,
                    &tables.state_policy(code),
                    &mut notes,
                ),
            };
            (federal, state, local, Some(floor.round_dp(2)))
        }
    };

    let se_tax = se_tax_raw.round_dp(2);
    let federal = federal_raw.round_dp(2);
    let state = state_raw.round_dp(2);
    let local = local_raw.round_dp(2);
    let total = se_tax + federal + state + local;
    let effective_rate = (total / net_earnings).round_dp(4);

    TaxBreakdown {
        se_tax,
        federal,
        state,
        local,
        total,
        effective_rate,
        federal_floor,
        notes,
    }
}

fn state_and_local_tax(
    net_earnings: Decimal,
    half_se: Decimal,
    profile: &TaxProfile,
    policy: &StatePolicy,
    notes: &mut Vec<TaxNote>,
) -> (Decimal, Decimal) {
    let taxable = |deduction: &StandardDeduction| {
        (net_earnings - half_se - deduction.for_status(profile.filing_status)).max(Decimal::ZERO)
    };
    match policy {
        StatePolicy::NoIncomeTax => (Decimal::ZERO, Decimal::ZERO),
        StatePolicy::Bracketed(table) => {
            (bracket_tax(taxable(&table.deduction), &table.brackets), Decimal::ZERO)
        }
        StatePolicy::Special { table, rule } => {
            let taxable = taxable(&table.deduction);
            let base = bracket_tax(taxable, &table.brackets);
            let adjustment = rule.apply(taxable, profile.county.as_deref());
            if let Some(note) = adjustment.note {
                notes.push(note);
            }
            (base + adjustment.state_surtax, adjustment.local_tax)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FilingStatus;

    fn profile(state: &str) -> TaxProfile {
        TaxProfile {
            filing_status: FilingStatus::Single,
            state: state.to_string(),
            county: None,
            has_other_se_income: false,
        }
    }

    fn tables() -> TaxTables {
        TaxTables::for_year(2024)
    }

    #[test]
    fn negative_and_zero_net_owe_nothing() {
        for net in [dec!(-5000), dec!(0)] {
            let b = estimate_tax(net, dec!(10000), Some(&profile("CA")), &tables());
            assert_eq!(b.se_tax, dec!(0));
            assert_eq!(b.federal, dec!(0));
            assert_eq!(b.state, dec!(0));
            assert_eq!(b.local, dec!(0));
            assert_eq!(b.total, dec!(0));
            assert_eq!(b.effective_rate, dec!(0));
        }
    }

    #[test]
    fn no_tax_state_fifty_thousand() {
        // Scenario: $50,000 net, single filer in Texas.
        let b = estimate_tax(dec!(50000), dec!(52000), Some(&profile("TX")), &tables());
        assert_eq!(b.state, dec!(0));
        assert_eq!(b.local, dec!(0));
        assert!(b.se_tax > dec!(0));
        assert!(b.federal > dec!(0));
        assert_eq!(b.se_tax, dec!(7064.78));
        assert_eq!(b.federal, dec!(3592.11));
        assert_eq!(b.total, b.se_tax + b.federal);
        assert_eq!(b.effective_rate, dec!(0.2131));
    }

    #[test]
    fn below_federal_floor_owes_only_se_tax() {
        // $1,391 net: SE tax ~ $196, but half-SE + standard deduction keeps
        // federal at exactly zero.
        let b = estimate_tax(dec!(1391), dec!(1391), Some(&profile("TX")), &tables());
        assert_eq!(b.se_tax, dec!(196.54));
        assert_eq!(b.federal, dec!(0));
        let floor = b.federal_floor.unwrap();
        // Same formula as the taxable-income computation.
        assert_eq!(floor, federal_income_floor(dec!(14600), b.se_tax / dec!(2)).round_dp(2));
        assert!(dec!(1391) < floor);
    }

    #[test]
    fn total_is_exact_sum_of_rounded_components() {
        let mut p = profile("MD");
        p.county = Some("Montgomery".to_string());
        let b = estimate_tax(dec!(80000), dec!(90000), Some(&p), &tables());
        assert_eq!(b.total, b.se_tax + b.federal + b.state + b.local);
        assert!(b.local > dec!(0));
    }

    #[test]
    fn maryland_without_county_degrades_with_note() {
        let b = estimate_tax(dec!(80000), dec!(90000), Some(&profile("MD")), &tables());
        assert_eq!(b.local, dec!(0));
        assert!(b.state > dec!(0));
        assert!(b
            .notes
            .contains(&TaxNote::LocalTaxNotComputed { state: "MD".into() }));
    }

    #[test]
    fn california_millionaire_surtax_applies() {
        let low = estimate_tax(dec!(900000), dec!(900000), Some(&profile("CA")), &tables());
        let high = estimate_tax(dec!(2000000), dec!(2000000), Some(&profile("CA")), &tables());
        assert!(high.state > low.state);
        // Surtax slice exists only above the $1M threshold.
        assert!(high.notes.is_empty());
    }

    #[test]
    fn missing_profile_computes_se_only_with_note() {
        let b = estimate_tax(dec!(50000), dec!(50000), None, &tables());
        assert!(b.se_tax > dec!(0));
        assert_eq!(b.federal, dec!(0));
        assert_eq!(b.state, dec!(0));
        assert_eq!(b.local, dec!(0));
        assert!(b.notes.contains(&TaxNote::ProfileMissing));
        assert!(b.federal_floor.is_none());
    }

    #[test]
    fn unrecognized_state_zeroes_state_tax_with_note() {
        let b = estimate_tax(dec!(50000), dec!(50000), Some(&profile("ZZ")), &tables());
        assert_eq!(b.state, dec!(0));
        assert!(b.federal > dec!(0));
        assert!(b
            .notes
            .contains(&TaxNote::StateNotRecognized { state: "ZZ".into() }));
    }

    #[test]
    fn se_minimum_waived_with_other_se_income() {
        // 92.35% of $400 is below the floor.
        let without = estimate_tax(dec!(400), dec!(400), Some(&profile("TX")), &tables());
        assert_eq!(without.se_tax, dec!(0));
        assert!(without.notes.contains(&TaxNote::SeBelowMinimum));

        let mut p = profile("TX");
        p.has_other_se_income = true;
        let with = estimate_tax(dec!(400), dec!(400), Some(&p), &tables());
        assert!(with.se_tax > dec!(0));
        assert!(!with.notes.contains(&TaxNote::SeBelowMinimum));
    }

    #[test]
    fn total_tax_monotonic_in_net_earnings() {
        let p = profile("CA");
        let mut prev = Decimal::ZERO;
        for net in [500, 2000, 15000, 40000, 90000, 250000, 1200000] {
            let b = estimate_tax(Decimal::from(net), Decimal::from(net), Some(&p), &tables());
            assert!(b.total >= prev, "total decreased at net={net}");
            prev = b.total;
        }
    }

    #[test]
    fn effective_rate_is_total_over_net() {
        let b = estimate_tax(dec!(50000), dec!(50000), Some(&profile("TX")), &tables());
        assert_eq!(b.effective_rate, (b.total / dec!(50000)).round_dp(4));
    }
}

use crate::tax::brackets::{Bracket, StandardDeduction};
use crate::tax::engine::TaxNote;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Two-letter state codes, closed. The policy match over this enum is
/// exhaustive, so a state without jurisdiction data cannot compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum StateCode {
    AL, AK, AZ, AR, CA, CO, CT, DE, DC, FL, GA, HI, ID, IL, IN, IA, KS, KY,
    LA, ME, MD, MA, MI, MN, MS, MO, MT, NE, NV, NH, NJ, NM, NY, NC, ND, OH,
    OK, OR, PA, RI, SC, SD, TN, TX, UT, VT, VA, WA, WV, WI, WY,
}

impl StateCode {
    /// Parse a user-supplied code. `None` means the profile carries a state
    /// this engine does not recognize, which is user data, not a bug.
    pub fn from_str(s: &str) -> Option<StateCode> {
        use StateCode::*;
        let code = match s.trim().to_uppercase().as_str() {
            "AL" => AL, "AK" => AK, "AZ" => AZ, "AR" => AR, "CA" => CA,
            "CO" => CO, "CT" => CT, "DE" => DE, "DC" => DC, "FL" => FL,
            "GA" => GA, "HI" => HI, "ID" => ID, "IL" => IL, "IN" => IN,
            "IA" => IA, "KS" => KS, "KY" => KY, "LA" => LA, "ME" => ME,
            "MD" => MD, "MA" => MA, "MI" => MI, "MN" => MN, "MS" => MS,
            "MO" => MO, "MT" => MT, "NE" => NE, "NV" => NV, "NH" => NH,
            "NJ" => NJ, "NM" => NM, "NY" => NY, "NC" => NC, "ND" => ND,
            "OH" => OH, "OK" => OK, "OR" => OR, "PA" => PA, "RI" => RI,
            "SC" => SC, "SD" => SD, "TN" => TN, "TX" => TX, "UT" => UT,
            "VT" => VT, "VA" => VA, "WA" => WA, "WV" => WV, "WI" => WI,
            "WY" => WY,
            _ => return None,
        };
        Some(code)
    }
}

/// Per-state deduction and bracket schedule.
#[derive(Debug, Clone)]
pub struct StateTable {
    pub deduction: StandardDeduction,
    pub brackets: Vec<Bracket>,
}

/// How a state taxes income. A closed set: adding a state is a data change
/// in the tables, not a new branch in engine logic.
#[derive(Debug, Clone)]
pub enum StatePolicy {
    /// No income tax at all, independent of income.
    NoIncomeTax,
    /// Flat or progressive schedule covered by the generic bracket walk.
    Bracketed(StateTable),
    /// Generic walk plus one jurisdiction-specific adjustment.
    Special {
        table: StateTable,
        rule: SpecialRule,
    },
}

/// Jurisdiction-specific adjustments, each a pure function of
/// (taxable income, county).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRule {
    /// 1% mental health services surtax on taxable income above $1M.
    CaliforniaMentalHealth,
    /// County-level income surtax; the county rate feeds the local tax line.
    MarylandCounty,
}

/// What a special rule contributes on top of the generic walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialAdjustment {
    /// Added to the state tax line (unrounded).
    pub state_surtax: Decimal,
    /// The local tax line (unrounded); zero unless the rule is county-based.
    pub local_tax: Decimal,
    pub note: Option<TaxNote>,
}

impl SpecialRule {
    pub fn apply(&self, taxable: Decimal, county: Option<&str>) -> SpecialAdjustment {
        match self {
            SpecialRule::CaliforniaMentalHealth => {
                let threshold = dec!(1000000);
                let surtax = if taxable > threshold {
                    (taxable - threshold) * dec!(0.01)
                } else {
                    Decimal::ZERO
                };
                SpecialAdjustment {
                    state_surtax: surtax,
                    ..Default::default()
                }
            }
            SpecialRule::MarylandCounty => match county.and_then(maryland_county_rate) {
                Some(rate) => SpecialAdjustment {
                    local_tax: taxable.max(Decimal::ZERO) * rate,
                    ..Default::default()
                },
                None => SpecialAdjustment {
                    note: Some(TaxNote::LocalTaxNotComputed {
                        state: "MD".to_string(),
                    }),
                    ..Default::default()
                },
            },
        }
    }
}

/// Maryland local income tax rates by county (2024 resident rates).
/// Unknown counties return `None`; the caller reports the gap instead of
/// guessing a rate.
fn maryland_county_rate(county: &str) -> Option<Decimal> {
    let key = county.trim().to_lowercase();
    let key = key.strip_suffix(" county").unwrap_or(&key);
    let rate = match key {
        "allegany" => dec!(0.0303),
        "anne arundel" => dec!(0.0281),
        "baltimore city" => dec!(0.0320),
        "baltimore" => dec!(0.0320),
        "calvert" => dec!(0.0300),
        "carroll" => dec!(0.0303),
        "cecil" => dec!(0.0274),
        "charles" => dec!(0.0303),
        "frederick" => dec!(0.0296),
        "harford" => dec!(0.0306),
        "howard" => dec!(0.0320),
        "montgomery" => dec!(0.0320),
        "prince george's" | "prince georges" => dec!(0.0320),
        "queen anne's" | "queen annes" => dec!(0.0320),
        "st. mary's" | "st marys" => dec!(0.0310),
        "washington" => dec!(0.0295),
        "wicomico" => dec!(0.0320),
        "worcester" => dec!(0.0225),
        _ => return None,
    };
    Some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_code_parsing() {
        assert_eq!(StateCode::from_str("tx"), Some(StateCode::TX));
        assert_eq!(StateCode::from_str(" MD "), Some(StateCode::MD));
        assert_eq!(StateCode::from_str("ZZ"), None);
        assert_eq!(StateCode::from_str(""), None);
    }

    #[test]
    fn california_surtax_only_above_one_million() {
        let rule = SpecialRule::CaliforniaMentalHealth;
        assert_eq!(rule.apply(dec!(500000), None).state_surtax, dec!(0));
        let adj = rule.apply(dec!(1500000), None);
        assert_eq!(adj.state_surtax, dec!(5000));
        assert_eq!(adj.local_tax, dec!(0));
        assert!(adj.note.is_none());
    }

    #[test]
    fn maryland_county_rates_feed_local_line() {
        let rule = SpecialRule::MarylandCounty;
        let adj = rule.apply(dec!(100000), Some("Montgomery"));
        assert_eq!(adj.local_tax, dec!(3200.0000));
        assert_eq!(adj.state_surtax, dec!(0));
        assert!(adj.note.is_none());
    }

    #[test]
    fn maryland_county_suffix_and_case_insensitive() {
        let rule = SpecialRule::MarylandCounty;
        let a = rule.apply(dec!(100000), Some("baltimore county"));
        let b = rule.apply(dec!(100000), Some("Baltimore"));
        assert_eq!(a.local_tax, b.local_tax);
    }

    #[test]
    fn maryland_missing_county_notes_gap_without_failing() {
        let rule = SpecialRule::MarylandCounty;
        let adj = rule.apply(dec!(100000), None);
        assert_eq!(adj.local_tax, dec!(0));
        assert_eq!(
            adj.note,
            Some(TaxNote::LocalTaxNotComputed {
                state: "MD".to_string()
            })
        );

        let unknown = rule.apply(dec!(100000), Some("Atlantis"));
        assert_eq!(unknown.local_tax, dec!(0));
        assert!(unknown.note.is_some());
    }
}

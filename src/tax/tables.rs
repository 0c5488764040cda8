//! Versioned jurisdiction data: static tables, not behavior. Amounts are
//! planning approximations for estimation, not filing figures.

use crate::records::FilingStatus;
use crate::tax::brackets::{Bracket, StandardDeduction};
use crate::tax::states::{SpecialRule, StateCode, StatePolicy, StateTable};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

macro_rules! schedule {
    ($($threshold:literal => $rate:literal),+ $(,)?) => {
        vec![$(Bracket::new(dec!($threshold), dec!($rate))),+]
    };
}

/// Lookup tables for one tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxTables {
    pub tax_year: i32,
}

impl Default for TaxTables {
    fn default() -> Self {
        TaxTables::for_year(2025)
    }
}

impl TaxTables {
    pub fn for_year(tax_year: i32) -> Self {
        TaxTables { tax_year }
    }

    /// IRS standard mileage rate for business miles.
    pub fn mileage_rate(&self) -> Decimal {
        match self.tax_year {
            2025.. => dec!(0.70),
            2024 => dec!(0.67),
            _ => dec!(0.655),
        }
    }

    /// Portion of net earnings subject to SE tax.
    pub fn se_taxable_portion(&self) -> Decimal {
        dec!(0.9235)
    }

    /// Combined Social Security + Medicare SE rate.
    pub fn se_rate(&self) -> Decimal {
        dec!(0.153)
    }

    /// SE tax is owed only once net SE earnings reach this floor.
    pub fn se_minimum_earnings(&self) -> Decimal {
        dec!(400)
    }

    pub fn federal_deduction(&self) -> StandardDeduction {
        match self.tax_year {
            2025.. => StandardDeduction {
                single: dec!(15000),
                married_joint: dec!(30000),
                married_separate: dec!(15000),
                head: dec!(22500),
            },
            _ => StandardDeduction {
                single: dec!(14600),
                married_joint: dec!(29200),
                married_separate: dec!(14600),
                head: dec!(21900),
            },
        }
    }

    pub fn federal_brackets(&self, status: FilingStatus) -> Vec<Bracket> {
        match self.tax_year {
            2025.. => match status {
                FilingStatus::Single | FilingStatus::MarriedSeparate => schedule![
                    0 => 0.10, 11925 => 0.12, 48475 => 0.22, 103350 => 0.24,
                    197300 => 0.32, 250525 => 0.35, 626350 => 0.37,
                ],
                FilingStatus::MarriedJoint => schedule![
                    0 => 0.10, 23850 => 0.12, 96950 => 0.22, 206700 => 0.24,
                    394600 => 0.32, 501050 => 0.35, 751600 => 0.37,
                ],
                FilingStatus::Head => schedule![
                    0 => 0.10, 17000 => 0.12, 64850 => 0.22, 103350 => 0.24,
                    197300 => 0.32, 250500 => 0.35, 626350 => 0.37,
                ],
            },
            _ => match status {
                FilingStatus::Single | FilingStatus::MarriedSeparate => schedule![
                    0 => 0.10, 11600 => 0.12, 47150 => 0.22, 100525 => 0.24,
                    191950 => 0.32, 243725 => 0.35, 609350 => 0.37,
                ],
                FilingStatus::MarriedJoint => schedule![
                    0 => 0.10, 23200 => 0.12, 94300 => 0.22, 201050 => 0.24,
                    383900 => 0.32, 487450 => 0.35, 731200 => 0.37,
                ],
                FilingStatus::Head => schedule![
                    0 => 0.10, 16550 => 0.12, 63100 => 0.22, 100500 => 0.24,
                    191950 => 0.32, 243700 => 0.35, 609350 => 0.37,
                ],
            },
        }
    }

    /// State policy table. Exhaustive over the closed `StateCode` set, so a
    /// missing entry is a compile error, not a runtime surprise. State
    /// schedules apply to all filing statuses.
    #[rustfmt::skip]
    pub fn state_policy(&self, code: StateCode) -> StatePolicy {
        use StateCode::*;
        match code {
            // No wage income tax.
            AK | FL | NV | NH | SD | TN | TX | WA | WY => StatePolicy::NoIncomeTax,

            // Flat-rate states.
            AZ => flat(dec!(14600), dec!(0.025)),
            CO => flat(dec!(14600), dec!(0.044)),
            GA => flat(dec!(12000), dec!(0.0549)),
            ID => flat(dec!(14600), dec!(0.058)),
            IL => flat(dec!(0), dec!(0.0495)),
            IN => flat(dec!(0), dec!(0.0305)),
            KY => flat(dec!(3160), dec!(0.04)),
            MA => flat(dec!(0), dec!(0.05)),
            MI => flat(dec!(0), dec!(0.0425)),
            MS => flat(dec!(2300), dec!(0.047)),
            NC => flat(dec!(12750), dec!(0.045)),
            PA => flat(dec!(0), dec!(0.0307)),
            UT => flat(dec!(0), dec!(0.0465)),

            // Progressive-bracket states.
            AL => graduated(dec!(3000), schedule![0 => 0.02, 500 => 0.04, 3000 => 0.05]),
            AR => graduated(dec!(2340), schedule![0 => 0.02, 4400 => 0.04, 8800 => 0.044]),
            CT => graduated(dec!(0), schedule![0 => 0.02, 10000 => 0.045, 50000 => 0.055, 200000 => 0.0699]),
            DE => graduated(dec!(3250), schedule![0 => 0.0, 2000 => 0.022, 5000 => 0.039, 10000 => 0.048, 20000 => 0.052, 60000 => 0.066]),
            DC => graduated(dec!(14600), schedule![0 => 0.04, 10000 => 0.06, 40000 => 0.065, 60000 => 0.085, 250000 => 0.0925, 500000 => 0.0975, 1000000 => 0.1075]),
            HI => graduated(dec!(2200), schedule![0 => 0.014, 2400 => 0.055, 9600 => 0.076, 48000 => 0.0825]),
            IA => graduated(dec!(0), schedule![0 => 0.044, 6210 => 0.0482, 31050 => 0.057]),
            KS => graduated(dec!(3500), schedule![0 => 0.031, 15000 => 0.0525, 30000 => 0.057]),
            LA => graduated(dec!(0), schedule![0 => 0.0185, 12500 => 0.035, 50000 => 0.0425]),
            ME => graduated(dec!(14600), schedule![0 => 0.058, 26050 => 0.0675, 61600 => 0.0715]),
            MN => graduated(dec!(14575), schedule![0 => 0.0535, 31690 => 0.068, 104090 => 0.0785, 193240 => 0.0985]),
            MO => graduated(dec!(14600), schedule![0 => 0.0, 1273 => 0.02, 2546 => 0.03, 5092 => 0.048]),
            MT => graduated(dec!(14600), schedule![0 => 0.047, 20500 => 0.059]),
            NE => graduated(dec!(7900), schedule![0 => 0.0246, 3700 => 0.0351, 22170 => 0.0501, 35730 => 0.0584]),
            NJ => graduated(dec!(0), schedule![0 => 0.014, 20000 => 0.0175, 35000 => 0.035, 40000 => 0.05525, 75000 => 0.0637, 500000 => 0.0897, 1000000 => 0.1075]),
            NM => graduated(dec!(14600), schedule![0 => 0.017, 5500 => 0.032, 11000 => 0.047, 16000 => 0.049]),
            NY => graduated(dec!(8000), schedule![0 => 0.04, 8500 => 0.045, 11700 => 0.0525, 13900 => 0.055, 80650 => 0.06, 215400 => 0.0685, 1077550 => 0.0965]),
            ND => graduated(dec!(14600), schedule![0 => 0.0, 44725 => 0.0195, 225975 => 0.025]),
            OH => graduated(dec!(0), schedule![0 => 0.0, 26050 => 0.0275, 100000 => 0.035]),
            OK => graduated(dec!(6350), schedule![0 => 0.0025, 1000 => 0.0075, 2500 => 0.0175, 3750 => 0.0275, 4900 => 0.0375, 7200 => 0.0475]),
            OR => graduated(dec!(2745), schedule![0 => 0.0475, 4300 => 0.0675, 10750 => 0.0875, 125000 => 0.099]),
            RI => graduated(dec!(10550), schedule![0 => 0.0375, 77450 => 0.0475, 176050 => 0.0599]),
            SC => graduated(dec!(14600), schedule![0 => 0.0, 3460 => 0.03, 17330 => 0.064]),
            VT => graduated(dec!(7000), schedule![0 => 0.0335, 45400 => 0.066, 110050 => 0.076, 229550 => 0.0875]),
            VA => graduated(dec!(8000), schedule![0 => 0.02, 3000 => 0.03, 5000 => 0.05, 17000 => 0.0575]),
            WV => graduated(dec!(0), schedule![0 => 0.0236, 10000 => 0.0315, 25000 => 0.0354, 40000 => 0.0472, 60000 => 0.0512]),
            WI => graduated(dec!(13230), schedule![0 => 0.035, 14320 => 0.044, 28640 => 0.053, 315310 => 0.0765]),

            // Special-rule states: generic walk plus one adjustment.
            CA => StatePolicy::Special {
                table: StateTable {
                    deduction: StandardDeduction::flat(dec!(5540)),
                    brackets: schedule![
                        0 => 0.01, 10412 => 0.02, 24684 => 0.04, 38959 => 0.06,
                        54081 => 0.08, 68350 => 0.093, 349137 => 0.103,
                        418961 => 0.113, 698271 => 0.123,
                    ],
                },
                rule: SpecialRule::CaliforniaMentalHealth,
            },
            MD => StatePolicy::Special {
                table: StateTable {
                    deduction: StandardDeduction::flat(dec!(2550)),
                    brackets: schedule![
                        0 => 0.02, 1000 => 0.03, 2000 => 0.04, 3000 => 0.0475,
                        100000 => 0.05, 125000 => 0.0525, 150000 => 0.055,
                        250000 => 0.0575,
                    ],
                },
                rule: SpecialRule::MarylandCounty,
            },
        }
    }
}

fn flat(deduction: Decimal, rate: Decimal) -> StatePolicy {
    StatePolicy::Bracketed(StateTable {
        deduction: StandardDeduction::flat(deduction),
        brackets: vec![Bracket::new(Decimal::ZERO, rate)],
    })
}

fn graduated(deduction: Decimal, brackets: Vec<Bracket>) -> StatePolicy {
    StatePolicy::Bracketed(StateTable {
        deduction: StandardDeduction::flat(deduction),
        brackets,
    })
}

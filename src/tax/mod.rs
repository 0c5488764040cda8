pub mod brackets;
pub mod engine;
pub mod states;
pub mod tables;

pub use brackets::{bracket_tax, Bracket, StandardDeduction};
pub use engine::{estimate_tax, federal_income_floor, TaxBreakdown, TaxNote};
pub use states::{SpecialRule, StateCode, StatePolicy, StateTable};
pub use tables::TaxTables;

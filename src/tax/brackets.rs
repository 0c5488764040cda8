use crate::records::FilingStatus;
use rust_decimal::Decimal;

/// One marginal bracket: income above `threshold` (up to the next bracket's
/// threshold) is taxed at `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl Bracket {
    pub const fn new(threshold: Decimal, rate: Decimal) -> Self {
        Bracket { threshold, rate }
    }
}

/// Standard deduction by filing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardDeduction {
    pub single: Decimal,
    pub married_joint: Decimal,
    pub married_separate: Decimal,
    pub head: Decimal,
}

impl StandardDeduction {
    /// Same amount for every status (common for state deductions).
    pub fn flat(amount: Decimal) -> Self {
        StandardDeduction {
            single: amount,
            married_joint: amount,
            married_separate: amount,
            head: amount,
        }
    }

    pub fn for_status(&self, status: FilingStatus) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedJoint => self.married_joint,
            FilingStatus::MarriedSeparate => self.married_separate,
            FilingStatus::Head => self.head,
        }
    }
}

/// Progressive bracket walk: tax each slice of `taxable` at its own marginal
/// rate and sum the slices. Brackets must be ordered by ascending threshold
/// with the first at zero. Returns an unrounded amount; callers round once.
pub fn bracket_tax(taxable: Decimal, brackets: &[Bracket]) -> Decimal {
    if taxable <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let mut tax = Decimal::ZERO;
    for (i, bracket) in brackets.iter().enumerate() {
        if taxable <= bracket.threshold {
            break;
        }
        let upper = match brackets.get(i + 1) {
            Some(next) => next.threshold.min(taxable),
            None => taxable,
        };
        let slice = upper - bracket.threshold;
        tax += slice * bracket.rate;
        log::debug!(
            "bracket slice {}..{} at {}: {}",
            bracket.threshold,
            upper,
            bracket.rate,
            slice * bracket.rate
        );
    }
    tax
}

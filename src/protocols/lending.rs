//! Loan-sizing model for the collateralized lending path.
//!
//! A loan is sized as `loan_total = amount + interest` and capped at
//! `maximum_loan = base * factor`, where `factor` is a collateralization ratio in (0, 1).
//! The buggy path sizes against the borrowed `amount` itself; the fixed path sizes against
//! the collateral actually locked by the contract.
//!
//! Integer terms are lifted to reals before they meet `factor`, matching Z3's own
//! Int/Real coercion.

use crate::symbolic::z3_ext::Verdict;
use z3::ast::{Bool, Int, Real};
use z3::Context;

pub const AMOUNT: &str = "amount";
pub const INTEREST: &str = "interest";
pub const FACTOR: &str = "factor";
pub const LOCKED_AMOUNT: &str = "lockedAmount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanModel {
    Buggy,
    Fixed,
}

impl LoanModel {
    pub const ALL: [LoanModel; 2] = [LoanModel::Buggy, LoanModel::Fixed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buggy => "buggy",
            Self::Fixed => "fixed",
        }
    }

    /// Symbol the maximum loan is scaled from.
    pub fn collateral_base(self) -> &'static str {
        match self {
            Self::Buggy => AMOUNT,
            Self::Fixed => LOCKED_AMOUNT,
        }
    }

    /// The buggy model admits no under-sized loan; the fixed one does.
    pub fn expected_verdict(self) -> Verdict {
        match self {
            Self::Buggy => Verdict::Unsat,
            Self::Fixed => Verdict::Sat,
        }
    }
}

/// The four solver-scoped symbols. Z3 identifies constants by name, so declaring twice in
/// one context yields the same terms.
pub struct LoanSymbols<'ctx> {
    pub amount: Int<'ctx>,
    pub interest: Int<'ctx>,
    pub factor: Real<'ctx>,
    pub locked_amount: Int<'ctx>,
}

impl<'ctx> LoanSymbols<'ctx> {
    pub fn declare(ctx: &'ctx Context) -> Self {
        Self {
            amount: Int::new_const(ctx, AMOUNT),
            interest: Int::new_const(ctx, INTEREST),
            factor: Real::new_const(ctx, FACTOR),
            locked_amount: Int::new_const(ctx, LOCKED_AMOUNT),
        }
    }
}

pub fn non_negative<'ctx>(ctx: &'ctx Context, value: &Int<'ctx>) -> Bool<'ctx> {
    value.ge(&Int::from_u64(ctx, 0))
}

/// Strict on both ends: 0 and 1 are never admissible factors.
pub fn factor_in_open_unit_interval<'ctx>(
    ctx: &'ctx Context,
    factor: &Real<'ctx>,
) -> Bool<'ctx> {
    let zero = Real::from_real(ctx, 0, 1);
    let one = Real::from_real(ctx, 1, 1);
    Bool::and(ctx, &[&factor.gt(&zero), &factor.lt(&one)])
}

pub fn loan_total<'ctx>(
    ctx: &'ctx Context,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
) -> Int<'ctx> {
    Int::add(ctx, &[amount, interest])
}

pub fn maximum_loan<'ctx>(
    ctx: &'ctx Context,
    base: &Int<'ctx>,
    factor: &Real<'ctx>,
) -> Real<'ctx> {
    Real::mul(ctx, &[&base.to_real(), factor])
}

pub fn loan_below_maximum<'ctx>(
    loan_total: &Int<'ctx>,
    maximum_loan: &Real<'ctx>,
) -> Bool<'ctx> {
    loan_total.to_real().lt(maximum_loan)
}

/// Constraint set asking for a loan smaller than its own maximum.
/// `locked_amount = None` selects the buggy sizing (base = `amount`).
pub fn sizing_violation<'ctx>(
    ctx: &'ctx Context,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
    locked_amount: Option<&Int<'ctx>>,
) -> Vec<Bool<'ctx>> {
    let mut constraints = vec![non_negative(ctx, amount), non_negative(ctx, interest)];
    if let Some(locked) = locked_amount {
        constraints.push(non_negative(ctx, locked));
    }
    constraints.push(factor_in_open_unit_interval(ctx, factor));

    let base = locked_amount.unwrap_or(amount);
    let total = loan_total(ctx, amount, interest);
    let maximum = maximum_loan(ctx, base, factor);
    constraints.push(loan_below_maximum(&total, &maximum));
    constraints
}

/// A concrete assignment of the sizing symbols with an exact rational factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingPoint {
    pub amount: u64,
    pub interest: u64,
    pub factor_num: i64,
    pub factor_den: i64,
    pub locked_amount: Option<u64>,
}

impl SizingPoint {
    fn normalized_factor(&self) -> Option<(i128, i128)> {
        let (num, den) = (self.factor_num as i128, self.factor_den as i128);
        match den {
            0 => None,
            d if d < 0 => Some((-num, -d)),
            d => Some((num, d)),
        }
    }

    pub fn factor_in_open_unit_interval(&self) -> bool {
        self.normalized_factor()
            .is_some_and(|(num, den)| num > 0 && num < den)
    }

    pub fn base(&self, model: LoanModel) -> Option<u64> {
        match model {
            LoanModel::Buggy => Some(self.amount),
            LoanModel::Fixed => self.locked_amount,
        }
    }

    /// `amount + interest < base * num / den`, cross-multiplied. `None` when the base is
    /// missing, the factor is undefined, or the products leave i128.
    pub fn loan_below_maximum(&self, model: LoanModel) -> Option<bool> {
        let base = self.base(model)? as i128;
        let (num, den) = self.normalized_factor()?;
        let total = self.amount as i128 + self.interest as i128;
        let lhs = total.checked_mul(den)?;
        let rhs = base.checked_mul(num)?;
        Some(lhs < rhs)
    }

    /// Whether this point satisfies the whole violation constraint set of `model`.
    pub fn violates(&self, model: LoanModel) -> bool {
        self.factor_in_open_unit_interval() && self.loan_below_maximum(model) == Some(true)
    }
}

use loan_sizing_proof::protocols::lending::{
    sizing_violation, LoanModel, LoanSymbols, SizingPoint,
};
use proptest::prelude::*;
use z3::ast::{Ast, Int, Real};
use z3::{Config, Context, SatResult, Solver};

fn open_unit_factor() -> impl Strategy<Value = (i64, i64)> {
    (2i64..10_000).prop_flat_map(|den| (1..den, Just(den)))
}

proptest! {
    #[test]
    fn buggy_sizing_never_violated_concretely(
        amount in 0u64..=u32::MAX as u64,
        interest in 0u64..=u32::MAX as u64,
        (num, den) in open_unit_factor(),
    ) {
        let point = SizingPoint {
            amount,
            interest,
            factor_num: num,
            factor_den: den,
            locked_amount: None,
        };
        prop_assert!(point.factor_in_open_unit_interval());
        prop_assert!(!point.violates(LoanModel::Buggy));
    }

    #[test]
    fn fixed_sizing_violated_when_collateral_dominates(
        amount in 0u64..1_000_000,
        interest in 0u64..1_000_000,
        (num, den) in open_unit_factor(),
    ) {
        // locked * num/den > amount + interest once locked > (amount + interest) * den / num.
        let total = amount + interest;
        let locked = total * den as u64 / num as u64 + den as u64;
        let point = SizingPoint {
            amount,
            interest,
            factor_num: num,
            factor_den: den,
            locked_amount: Some(locked),
        };
        prop_assert!(point.violates(LoanModel::Fixed));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn solver_agrees_with_concrete_replay_at_pinned_points(
        amount in 0u64..10_000,
        interest in 0u64..10_000,
        locked in 0u64..100_000,
        (num, den) in open_unit_factor(),
    ) {
        let cfg = Config::new();
        let ctx = Context::new(&cfg);
        let syms = LoanSymbols::declare(&ctx);
        let point = SizingPoint {
            amount,
            interest,
            factor_num: num,
            factor_den: den,
            locked_amount: Some(locked),
        };

        for model in LoanModel::ALL {
            let solver = Solver::new(&ctx);
            let locked_sym = match model {
                LoanModel::Buggy => None,
                LoanModel::Fixed => Some(&syms.locked_amount),
            };
            let constraints = sizing_violation(
                &ctx,
                &syms.amount,
                &syms.interest,
                &syms.factor,
                locked_sym,
            );
            for constraint in &constraints {
                solver.assert(constraint);
            }
            solver.assert(&syms.amount._eq(&Int::from_u64(&ctx, amount)));
            solver.assert(&syms.interest._eq(&Int::from_u64(&ctx, interest)));
            solver.assert(&syms.locked_amount._eq(&Int::from_u64(&ctx, locked)));
            solver.assert(&syms.factor._eq(&Real::from_real(&ctx, num as i32, den as i32)));

            let expected = if point.violates(model) {
                SatResult::Sat
            } else {
                SatResult::Unsat
            };
            prop_assert_eq!(solver.check(), expected, "model {}", model.as_str());
        }
    }
}

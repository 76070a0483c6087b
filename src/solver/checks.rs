use crate::error::Z3Error;
use crate::protocols::lending::{sizing_violation, LoanModel, SizingPoint};
use crate::symbolic::z3_ext::{
    configure_solver, ratio_from_model, u64_from_model, SolverParams, Verdict,
};
use std::time::Instant;
use z3::ast::{Int, Real};
use z3::{Context, Model, Solver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub model: LoanModel,
    pub verdict: Verdict,
    /// Replayed assignment for `sat`; empty when a value does not fit the concrete types.
    pub witness: Option<SizingPoint>,
    /// Set when a `sat` model is missing or fails concrete replay. The verdict is kept.
    pub witness_error: Option<String>,
    pub elapsed_ms: u64,
}

impl CheckOutcome {
    pub fn matches_expectation(&self) -> bool {
        self.verdict == self.model.expected_verdict()
    }

    /// Attach a read-back witness, replaying it against `model` first.
    pub fn with_witness(
        model: LoanModel,
        verdict: Verdict,
        witness: Option<SizingPoint>,
        elapsed_ms: u64,
    ) -> Self {
        let witness_error = witness
            .as_ref()
            .and_then(|point| replay_witness(model, point).err())
            .map(|err| err.to_string());
        Self {
            model,
            verdict,
            witness,
            witness_error,
            elapsed_ms,
        }
    }
}

/// Buggy sizing: can `amount + interest < amount * factor` hold?
pub fn check_buggy<'ctx>(
    ctx: &'ctx Context,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
) -> Verdict {
    check_buggy_detailed(ctx, amount, interest, factor, &SolverParams::default()).verdict
}

/// Fixed sizing: can `amount + interest < locked_amount * factor` hold?
pub fn check_fixed<'ctx>(
    ctx: &'ctx Context,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
    locked_amount: &Int<'ctx>,
) -> Verdict {
    check_fixed_detailed(
        ctx,
        amount,
        interest,
        factor,
        locked_amount,
        &SolverParams::default(),
    )
    .verdict
}

pub fn check_buggy_detailed<'ctx>(
    ctx: &'ctx Context,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
    params: &SolverParams,
) -> CheckOutcome {
    run_sizing_check(ctx, LoanModel::Buggy, amount, interest, factor, None, params)
}

pub fn check_fixed_detailed<'ctx>(
    ctx: &'ctx Context,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
    locked_amount: &Int<'ctx>,
    params: &SolverParams,
) -> CheckOutcome {
    run_sizing_check(
        ctx,
        LoanModel::Fixed,
        amount,
        interest,
        factor,
        Some(locked_amount),
        params,
    )
}

fn run_sizing_check<'ctx>(
    ctx: &'ctx Context,
    model: LoanModel,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
    locked_amount: Option<&Int<'ctx>>,
    params: &SolverParams,
) -> CheckOutcome {
    let solver = Solver::new(ctx);
    configure_solver(ctx, &solver, params);
    for constraint in sizing_violation(ctx, amount, interest, factor, locked_amount) {
        solver.assert(&constraint);
    }

    let started = Instant::now();
    let verdict = Verdict::from(solver.check());
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if verdict != Verdict::Sat {
        return CheckOutcome::with_witness(model, verdict, None, elapsed_ms);
    }
    let Some(z3_model) = solver.get_model() else {
        let err = Z3Error::Operation(format!(
            "{} check returned sat without a model",
            model.as_str()
        ));
        return CheckOutcome {
            witness_error: Some(err.to_string()),
            ..CheckOutcome::with_witness(model, verdict, None, elapsed_ms)
        };
    };
    let witness = read_witness(&z3_model, amount, interest, factor, locked_amount);
    if witness.is_none() {
        tracing::debug!(
            model = model.as_str(),
            "model values exceed concrete types; witness skipped"
        );
    }
    CheckOutcome::with_witness(model, verdict, witness, elapsed_ms)
}

fn read_witness<'ctx>(
    z3_model: &Model<'ctx>,
    amount: &Int<'ctx>,
    interest: &Int<'ctx>,
    factor: &Real<'ctx>,
    locked_amount: Option<&Int<'ctx>>,
) -> Option<SizingPoint> {
    let (factor_num, factor_den) = ratio_from_model(z3_model, factor)?;
    let locked_amount = match locked_amount {
        Some(sym) => Some(u64_from_model(z3_model, sym)?),
        None => None,
    };
    Some(SizingPoint {
        amount: u64_from_model(z3_model, amount)?,
        interest: u64_from_model(z3_model, interest)?,
        factor_num,
        factor_den,
        locked_amount,
    })
}

fn replay_witness(model: LoanModel, point: &SizingPoint) -> Result<(), Z3Error> {
    if point.violates(model) {
        return Ok(());
    }
    // Products beyond i128 cannot be replayed exactly; accept the solver's word.
    if point.factor_in_open_unit_interval() && point.loan_below_maximum(model).is_none() {
        tracing::debug!(
            model = model.as_str(),
            ?point,
            "witness too large for concrete replay"
        );
        return Ok(());
    }
    Err(Z3Error::UnsoundWitness {
        model: model.as_str(),
        detail: format!("{point:?}"),
    })
}

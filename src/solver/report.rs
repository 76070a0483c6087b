use crate::error::{Result, Z3Error};
use crate::protocols::lending::{LoanModel, LoanSymbols};
use crate::solver::checks::{check_buggy_detailed, check_fixed_detailed, CheckOutcome};
use crate::symbolic::z3_ext::SolverParams;
use z3::{Config, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl VerificationReport {
    /// One verdict token per check, buggy first.
    pub fn verdict_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|outcome| outcome.verdict.to_string())
            .collect()
    }

    pub fn outcome(&self, model: LoanModel) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.model == model)
    }

    pub fn mismatches(&self) -> Vec<&CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.matches_expectation())
            .collect()
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.outcomes.iter().map(|outcome| outcome.elapsed_ms).sum()
    }

    /// Strict-mode gate: every verdict matches its model and every witness replayed.
    pub fn ensure_consistent(&self) -> Result<()> {
        if let Some(outcome) = self.mismatches().first() {
            return Err(Z3Error::VerdictMismatch {
                model: outcome.model.as_str(),
                expected: outcome.model.expected_verdict().as_str(),
                actual: outcome.verdict.as_str(),
            }
            .into());
        }
        if let Some(message) = self
            .outcomes
            .iter()
            .find_map(|outcome| outcome.witness_error.as_ref())
        {
            return Err(Z3Error::Operation(message.clone()).into());
        }
        Ok(())
    }
}

/// Declare the sizing symbols once and run the buggy then the fixed check against them.
pub fn run_checks(params: &SolverParams) -> VerificationReport {
    let cfg = Config::new();
    let ctx = Context::new(&cfg);
    let syms = LoanSymbols::declare(&ctx);

    let buggy = check_buggy_detailed(&ctx, &syms.amount, &syms.interest, &syms.factor, params);
    record_outcome(&buggy);
    let fixed = check_fixed_detailed(
        &ctx,
        &syms.amount,
        &syms.interest,
        &syms.factor,
        &syms.locked_amount,
        params,
    );
    record_outcome(&fixed);

    VerificationReport {
        outcomes: vec![buggy, fixed],
    }
}

fn record_outcome(outcome: &CheckOutcome) {
    let model = outcome.model;
    tracing::info!(
        model = model.as_str(),
        base = model.collateral_base(),
        verdict = outcome.verdict.as_str(),
        elapsed_ms = outcome.elapsed_ms,
        "[PROOF] loan sizing check finished"
    );
    if let Some(witness) = outcome.witness.as_ref() {
        tracing::debug!(model = model.as_str(), ?witness, "[PROOF] under-sized loan witness");
    }
    if let Some(err) = outcome.witness_error.as_deref() {
        tracing::error!(model = model.as_str(), error = err, "[PROOF] witness rejected");
    }
    if !outcome.matches_expectation() {
        tracing::warn!(
            model = model.as_str(),
            expected = model.expected_verdict().as_str(),
            actual = outcome.verdict.as_str(),
            "[PROOF] verdict differs from expectation"
        );
    }
}

use std::fmt;
use z3::ast::{Int, Real};
use z3::{Context, Model, SatResult, Solver};

pub const DEFAULT_RANDOM_SEED: u32 = 42;

/// Three-valued decision procedure result, printed the way Z3 prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Sat,
    Unsat,
    Unknown,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sat => "sat",
            Self::Unsat => "unsat",
            Self::Unknown => "unknown",
        }
    }
}

impl From<SatResult> for Verdict {
    fn from(result: SatResult) -> Self {
        match result {
            SatResult::Sat => Self::Sat,
            SatResult::Unsat => Self::Unsat,
            SatResult::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverParams {
    /// `None` lets every check run to completion.
    pub timeout_ms: Option<u32>,
    pub random_seed: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl SolverParams {
    /// Z3 parameter entries applied to each solver.
    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        let mut entries = vec![("random_seed", self.random_seed)]; // deterministic by default
        if let Some(timeout_ms) = self.timeout_ms {
            entries.push(("timeout", timeout_ms));
        }
        entries
    }
}

pub fn configure_solver(ctx: &Context, solver: &Solver, params: &SolverParams) {
    let mut z3_params = z3::Params::new(ctx);
    for (key, value) in params.entries() {
        z3_params.set_u32(key, value);
    }
    solver.set_params(&z3_params);
}

/// Read an integer constant back from a model. `None` when the value does not fit a u64.
pub fn u64_from_model<'ctx>(model: &Model<'ctx>, sym: &Int<'ctx>) -> Option<u64> {
    model.eval(sym, true).and_then(|v| v.as_u64())
}

/// Read a real constant back from a model as `(numerator, denominator)`.
pub fn ratio_from_model<'ctx>(model: &Model<'ctx>, sym: &Real<'ctx>) -> Option<(i64, i64)> {
    model.eval(sym, true).and_then(|v| v.as_real())
}

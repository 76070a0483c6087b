//! Optional solver tuning read from the environment. Nothing here can stop the checks
//! from running: bad values and stray arguments are logged and ignored.

use crate::error::{ConfigError, Result};
use crate::symbolic::z3_ext::{SolverParams, DEFAULT_RANDOM_SEED};

pub const TIMEOUT_KEY: &str = "LOAN_PROOF_TIMEOUT_MS";
pub const SEED_KEY: &str = "LOAN_PROOF_RANDOM_SEED";
pub const STRICT_KEY: &str = "LOAN_PROOF_STRICT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeArgs {
    pub solver: SolverParams,
    /// Exit non-zero when a verdict differs from its model's expectation.
    pub strict: bool,
}

fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_u32_from_env(key: &'static str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|err| {
                ConfigError::InvalidValue {
                    key,
                    raw: raw.trim().to_string(),
                    reason: err.to_string(),
                }
                .into()
            }),
        _ => Ok(None),
    }
}

fn optional_u32_from_env(key: &'static str) -> Option<u32> {
    parse_u32_from_env(key).unwrap_or_else(|err| {
        tracing::warn!("[OPS] {err}; using default");
        None
    })
}

fn parse_runtime_args_from_iter<I, S>(args: I) -> RuntimeArgs
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let supplied_args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .collect::<Vec<_>>();
    if !supplied_args.is_empty() {
        tracing::warn!(
            "[OPS] Ignoring CLI arguments ({}); tune via {}, {}, {}",
            supplied_args.join(" "),
            TIMEOUT_KEY,
            SEED_KEY,
            STRICT_KEY
        );
    }

    let timeout_ms = optional_u32_from_env(TIMEOUT_KEY);
    let random_seed = optional_u32_from_env(SEED_KEY).unwrap_or(DEFAULT_RANDOM_SEED);
    let strict = std::env::var(STRICT_KEY)
        .ok()
        .and_then(|raw| parse_bool_flag(&raw))
        .unwrap_or(false);

    RuntimeArgs {
        solver: SolverParams {
            timeout_ms,
            random_seed,
        },
        strict,
    }
}

pub fn parse_runtime_args() -> RuntimeArgs {
    parse_runtime_args_from_iter(std::env::args().skip(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_proof_env() {
        for key in [TIMEOUT_KEY, SEED_KEY, STRICT_KEY] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn runtime_args_default_when_env_unset() {
        let _guard = env_lock().lock().expect("env lock");
        clear_proof_env();
        let parsed = parse_runtime_args_from_iter(Vec::<&str>::new());
        assert_eq!(parsed.solver, SolverParams::default());
        assert_eq!(parsed.solver.timeout_ms, None);
        assert!(!parsed.strict);
        clear_proof_env();
    }

    #[test]
    fn runtime_args_read_solver_params_and_strict() {
        let _guard = env_lock().lock().expect("env lock");
        clear_proof_env();
        std::env::set_var(TIMEOUT_KEY, " 1500 ");
        std::env::set_var(SEED_KEY, "7");
        std::env::set_var(STRICT_KEY, "yes");

        let parsed = parse_runtime_args_from_iter(Vec::<&str>::new());
        assert_eq!(parsed.solver.timeout_ms, Some(1500));
        assert_eq!(parsed.solver.random_seed, 7);
        assert!(parsed.strict);

        clear_proof_env();
    }

    #[test]
    fn invalid_numeric_values_fall_back_to_defaults() {
        let _guard = env_lock().lock().expect("env lock");
        clear_proof_env();
        std::env::set_var(TIMEOUT_KEY, "soon");
        std::env::set_var(SEED_KEY, "-1");

        let parsed = parse_runtime_args_from_iter(Vec::<&str>::new());
        assert_eq!(parsed.solver, SolverParams::default());

        clear_proof_env();
    }

    #[test]
    fn invalid_timeout_is_reported_as_config_error() {
        let _guard = env_lock().lock().expect("env lock");
        clear_proof_env();
        std::env::set_var(TIMEOUT_KEY, "soon");

        let err = parse_u32_from_env(TIMEOUT_KEY).expect_err("parse should fail");
        let message = err.to_string();
        assert!(
            message.contains("invalid LOAN_PROOF_TIMEOUT_MS 'soon'"),
            "unexpected error message: {message}"
        );

        clear_proof_env();
    }

    #[test]
    fn invalid_strict_flag_falls_back_to_false() {
        let _guard = env_lock().lock().expect("env lock");
        clear_proof_env();
        std::env::set_var(STRICT_KEY, "maybe");

        let parsed = parse_runtime_args_from_iter(Vec::<&str>::new());
        assert!(!parsed.strict);

        clear_proof_env();
    }

    #[test]
    fn cli_arguments_are_ignored() {
        let _guard = env_lock().lock().expect("env lock");
        clear_proof_env();
        std::env::set_var(TIMEOUT_KEY, "soon");

        let parsed = parse_runtime_args_from_iter(vec!["x", "--strict"]);
        assert_eq!(parsed.solver, SolverParams::default());
        assert!(!parsed.strict);

        clear_proof_env();
    }
}

//! Runs both loan-sizing checks and prints one verdict per line (buggy, then fixed).

use loan_sizing_proof::runtime::{emit_runtime_status, parse_runtime_args};
use loan_sizing_proof::solver::run_checks;

fn main() -> anyhow::Result<()> {
    // Default to `warn` when `RUST_LOG` is unset or invalid. Logs go to stderr so stdout
    // carries only the verdicts.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Optional env tuning; arguments and bad values are logged and ignored.
    let runtime_args = parse_runtime_args();
    emit_runtime_status(&runtime_args);

    let report = run_checks(&runtime_args.solver);
    for line in report.verdict_lines() {
        println!("{line}");
    }
    tracing::info!(
        total_elapsed_ms = report.total_elapsed_ms(),
        "[PROOF] loan sizing checks complete"
    );

    if runtime_args.strict {
        report.ensure_consistent()?;
    }
    Ok(())
}

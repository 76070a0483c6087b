use crate::runtime::RuntimeArgs;

pub fn emit_runtime_status(runtime_args: &RuntimeArgs) {
    let timeout = runtime_args
        .solver
        .timeout_ms
        .map_or_else(|| "none".to_string(), |ms| ms.to_string());
    tracing::info!(
        "[OPS] Solver configured: timeout_ms={} random_seed={} strict={}",
        timeout,
        runtime_args.solver.random_seed,
        runtime_args.strict
    );
}

pub mod checks;
pub mod report;

pub use checks::{check_buggy, check_fixed, CheckOutcome};
pub use report::{run_checks, VerificationReport};

//! Loan-sizing proofs for a collateralized lending contract.
//!
//! Two fixed Z3 checks ask whether a loan can be smaller than its own maximum:
//! once under the buggy sizing (maximum scaled from the borrowed amount) and once under
//! the fixed sizing (maximum scaled from locked collateral).

pub mod error;
pub mod protocols;
pub mod runtime;
pub mod solver;
pub mod symbolic;

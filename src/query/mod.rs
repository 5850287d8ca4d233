//! Query and mutation execution.
//!
//! Every statement the application issues goes through one of these
//! executors, which classify it, bind its parameters, and bound it in time.

pub mod executor;

pub use executor::{MutationExecutor, QueryExecutor};

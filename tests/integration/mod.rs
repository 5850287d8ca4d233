//! Integration tests for Startup Atlas.

pub mod common;

pub mod acquisition_test;
pub mod dashboard_test;
pub mod founder_test;
pub mod funding_round_test;
pub mod investor_test;
pub mod mysql_test;
pub mod reference_test;
pub mod startup_test;

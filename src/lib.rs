//! Startup Atlas - analytics dashboard and record management for a startup
//! ecosystem database.
//!
//! This library exposes the core modules for use by the binary and by
//! integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod entities;
pub mod error;
pub mod logging;
pub mod query;
pub mod reference;
pub mod safety;

//! Command handlers.
//!
//! Each handler takes the command context, drives one controller or the
//! aggregator, and returns a [`CommandOutput`](super::output::CommandOutput).

pub mod analytics;
pub mod records;
pub mod system;

use std::time::Duration;

use crate::db::DatabaseClient;

/// Context provided to command handlers.
pub struct CommandContext<'a> {
    /// Database client for executing statements.
    pub db: &'a dyn DatabaseClient,
    /// Per-call timeout applied by the executors.
    pub timeout: Duration,
    /// Skip the confirmation step for deletes.
    pub assume_yes: bool,
}

impl<'a> CommandContext<'a> {
    pub fn new(db: &'a dyn DatabaseClient, timeout: Duration) -> Self {
        Self {
            db,
            timeout,
            assume_yes: false,
        }
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }
}

//! Command definitions, dispatch, and output for Startup Atlas.
//!
//! Commands are parsed by clap, routed to a handler, and the handler's
//! output is rendered separately, so handlers can be tested without a
//! terminal.

pub mod handlers;
pub mod output;
pub mod router;

pub use handlers::CommandContext;
pub use output::{CommandOutput, OutputFormat};
pub use router::{dispatch, Command};

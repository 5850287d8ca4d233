//! Command definitions and dispatch.
//!
//! The command tree is declared with clap so it can be parsed from the
//! command line, then routed to the handler for each group.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use super::handlers::{analytics, records, system, CommandContext};
use super::output::CommandOutput;
use crate::dashboard::AnalyticsReport;
use crate::entities::{FundingStage, InvestorType};
use crate::error::Result;
use crate::reference::LookupTable;

/// Top-level commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Headline metrics, recent funding rounds, and distribution charts
    Dashboard,

    /// Run one analytics report (industry, top-startups, stages, cities)
    Analytics {
        #[arg(value_parser = parse_report)]
        report: AnalyticsReport,
    },

    /// Manage startups
    #[command(subcommand)]
    Startup(StartupCommand),

    /// Manage investors
    #[command(subcommand)]
    Investor(InvestorCommand),

    /// Manage funding rounds
    #[command(subcommand)]
    Funding(FundingCommand),

    /// Manage founders
    #[command(subcommand)]
    Founder(FounderCommand),

    /// Manage acquisitions
    #[command(subcommand)]
    Acquisition(AcquisitionCommand),

    /// List a lookup table (city, country, industry, startup)
    Lookup {
        #[arg(value_parser = parse_lookup_table)]
        table: LookupTable,

        /// Show the display name for one id
        #[arg(long)]
        id: Option<i64>,
    },

    /// Create any missing tables
    InitSchema,

    /// Check that the database is reachable
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum StartupCommand {
    /// List all startups
    List,
    /// Show one startup as an edit form
    Show { id: i64 },
    /// Create a startup with an operator-chosen id
    Create {
        id: i64,
        #[command(flatten)]
        fields: StartupFields,
    },
    /// Change the given fields of a startup
    Update {
        id: i64,
        #[command(flatten)]
        fields: StartupFields,
    },
    /// Delete a startup
    Delete { id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct StartupFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub founded_year: Option<i32>,
    /// City name
    #[arg(long)]
    pub city: Option<String>,
    /// Industry sector
    #[arg(long)]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum InvestorCommand {
    /// List all investors
    List,
    /// Show one investor as an edit form
    Show { id: i64 },
    /// Create an investor with an operator-chosen id
    Create {
        id: i64,
        #[command(flatten)]
        fields: InvestorFields,
    },
    /// Change the given fields of an investor
    Update {
        id: i64,
        #[command(flatten)]
        fields: InvestorFields,
    },
    /// Delete an investor
    Delete { id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct InvestorFields {
    #[arg(long)]
    pub name: Option<String>,
    /// VC Firm, Angel, PE Firm, Corporate VC, or Bank
    #[arg(long = "type", value_parser = parse_investor_type)]
    pub investor_type: Option<InvestorType>,
    /// Country name
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum FundingCommand {
    /// List all funding rounds
    List,
    /// Show one funding round as an edit form
    Show { id: i64 },
    /// Record a funding round with an operator-chosen id
    Create {
        id: i64,
        #[command(flatten)]
        fields: FundingFields,
    },
    /// Change the given fields of a funding round
    Update {
        id: i64,
        #[command(flatten)]
        fields: FundingFields,
    },
    /// Delete a funding round
    Delete { id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FundingFields {
    /// Startup name
    #[arg(long)]
    pub startup: Option<String>,
    /// Round date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Amount in rupees
    #[arg(long)]
    pub amount: Option<Decimal>,
    /// Pre-Seed, Seed, Series A through Series E+, or IPO
    #[arg(long, value_parser = parse_funding_stage)]
    pub stage: Option<FundingStage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum FounderCommand {
    /// List all founders
    List,
    /// Show one founder as an edit form
    Show { id: i64 },
    /// Create a founder with an operator-chosen id
    Create {
        id: i64,
        #[command(flatten)]
        fields: FounderFields,
    },
    /// Change the given fields of a founder
    Update {
        id: i64,
        #[command(flatten)]
        fields: FounderFields,
    },
    /// Delete a founder
    Delete { id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FounderFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Startup name
    #[arg(long)]
    pub startup: Option<String>,
    /// Role (pass an empty string to clear)
    #[arg(long)]
    pub role: Option<String>,
    /// LinkedIn profile URL (pass an empty string to clear)
    #[arg(long)]
    pub linkedin_url: Option<String>,
}

/// Acquisitions are addressed by acquirer id, target id, and date.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum AcquisitionCommand {
    /// List all acquisitions, newest first
    List,
    /// Show one acquisition as an edit form
    Show {
        #[command(flatten)]
        key: AcquisitionKey,
    },
    /// Record an acquisition
    Create {
        #[command(flatten)]
        fields: AcquisitionFields,
        /// Acquisition date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change the given fields of an acquisition
    Update {
        #[command(flatten)]
        key: AcquisitionKey,
        #[command(flatten)]
        fields: AcquisitionFields,
        /// Replacement date (YYYY-MM-DD)
        #[arg(long)]
        new_date: Option<NaiveDate>,
    },
    /// Delete an acquisition
    Delete {
        #[command(flatten)]
        key: AcquisitionKey,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct AcquisitionKey {
    pub acquirer_id: i64,
    pub target_id: i64,
    /// Acquisition date (YYYY-MM-DD)
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct AcquisitionFields {
    /// Acquiring startup name
    #[arg(long)]
    pub acquirer: Option<String>,
    /// Acquired startup name
    #[arg(long)]
    pub target: Option<String>,
    /// Amount in rupees
    #[arg(long)]
    pub amount: Option<Decimal>,
}

/// Routes a parsed command to its handler.
pub async fn dispatch(command: &Command, ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    match command {
        Command::Dashboard => analytics::handle_dashboard(ctx).await,
        Command::Analytics { report } => analytics::handle_report(ctx, *report).await,
        Command::Startup(cmd) => records::handle_startup(ctx, cmd).await,
        Command::Investor(cmd) => records::handle_investor(ctx, cmd).await,
        Command::Funding(cmd) => records::handle_funding(ctx, cmd).await,
        Command::Founder(cmd) => records::handle_founder(ctx, cmd).await,
        Command::Acquisition(cmd) => records::handle_acquisition(ctx, cmd).await,
        Command::Lookup { table, id } => system::handle_lookup(ctx, *table, *id).await,
        Command::InitSchema => system::handle_init_schema(ctx).await,
        Command::Check => system::handle_check(ctx).await,
    }
}

fn parse_report(s: &str) -> std::result::Result<AnalyticsReport, String> {
    match s.trim().to_lowercase().as_str() {
        "industry" | "industries" => Ok(AnalyticsReport::Industry),
        "top-startups" | "top" => Ok(AnalyticsReport::TopStartups),
        "stages" | "stage" => Ok(AnalyticsReport::Stages),
        "cities" | "city" => Ok(AnalyticsReport::Cities),
        _ => Err(format!(
            "Unknown report: {s}. Expected: industry, top-startups, stages, or cities"
        )),
    }
}

fn parse_lookup_table(s: &str) -> std::result::Result<LookupTable, String> {
    LookupTable::parse(s)
        .ok_or_else(|| format!("Unknown table: {s}. Expected: city, country, industry, or startup"))
}

fn parse_investor_type(s: &str) -> std::result::Result<InvestorType, String> {
    InvestorType::parse(s).map_err(|e| e.message().to_string())
}

fn parse_funding_stage(s: &str) -> std::result::Result<FundingStage, String> {
    FundingStage::parse(s).map_err(|e| e.message().to_string())
}

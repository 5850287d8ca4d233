//! System command handlers (check, init-schema, lookup).

use tracing::info;

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::db::schema;
use crate::error::Result;
use crate::reference::{LookupTable, ReferenceResolver};

/// Handle `check`.
pub async fn handle_check(ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    ctx.db.ping().await?;
    info!("Connection check passed");
    Ok(CommandOutput::info(format!(
        "Connected ({})",
        ctx.db.backend().as_str()
    )))
}

/// Handle `init-schema`.
pub async fn handle_init_schema(ctx: &CommandContext<'_>) -> Result<CommandOutput> {
    let tables = schema::install(ctx.db).await?;
    Ok(CommandOutput::info(format!(
        "Schema ready: {}",
        tables.join(", ")
    )))
}

/// Handle `lookup <table> [--id N]`.
pub async fn handle_lookup(
    ctx: &CommandContext<'_>,
    table: LookupTable,
    id: Option<i64>,
) -> Result<CommandOutput> {
    let resolver = ReferenceResolver::new(ctx.db, ctx.timeout);

    if let Some(id) = id {
        let message = match resolver.id_to_name(table, id).await? {
            Some(name) => format!("{} {id}: {name}", table.label()),
            None => format!("No {} with id {id}", table.label()),
        };
        return Ok(CommandOutput::info(message));
    }

    let lookup = resolver.load_lookup(table).await?;
    let rows = lookup
        .entries()
        .iter()
        .map(|e| vec![e.id.to_string(), e.name.clone()])
        .collect();
    let mut outputs = vec![CommandOutput::table(
        vec![
            table.id_column().to_string(),
            table.name_column().to_string(),
        ],
        rows,
    )];

    let duplicates = lookup.duplicate_names();
    if !duplicates.is_empty() {
        outputs.push(CommandOutput::info(format!(
            "Ambiguous names (cannot be chosen by name): {}",
            duplicates.join(", ")
        )));
    }
    Ok(CommandOutput::multiple(outputs))
}

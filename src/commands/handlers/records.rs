//! Entity record handlers (list, show, create, update, delete).
//!
//! Updates are partial: the stored row is loaded as an edit form, the given
//! fields replace the loaded values, and the whole form is submitted.
//! Deletes show the record and stop unless `--yes` was passed.

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::commands::router::{
    AcquisitionCommand, AcquisitionFields, FounderCommand, FounderFields, FundingCommand,
    FundingFields, InvestorCommand, InvestorFields, StartupCommand, StartupFields,
};
use crate::entities::{
    AcquisitionController, AcquisitionForm, FormField, FounderController, FounderForm,
    FundingRoundController, FundingRoundForm, InvestorController, InvestorForm,
    StartupController, StartupForm,
};
use crate::error::{AtlasError, Result};

/// Handle `startup ...`.
pub async fn handle_startup(
    ctx: &CommandContext<'_>,
    cmd: &StartupCommand,
) -> Result<CommandOutput> {
    let controller = StartupController::new(ctx.db, ctx.timeout);
    match cmd {
        StartupCommand::List => Ok(CommandOutput::Records(controller.list().await?)),
        StartupCommand::Show { id } => {
            let form = controller.edit_form(*id).await?;
            Ok(CommandOutput::form(format!("Startup {id}"), form.fields()))
        }
        StartupCommand::Create { id, fields } => {
            let form = StartupForm {
                name: fields.name.clone().unwrap_or_default(),
                founded_year: fields.founded_year,
                city: required(&fields.city, "--city")?,
                industry: required(&fields.industry, "--industry")?,
            };
            controller.create(*id, &form).await?;
            Ok(CommandOutput::info(format!(
                "Created startup {id} ({})",
                form.name.trim()
            )))
        }
        StartupCommand::Update { id, fields } => {
            let mut form = controller.edit_form(*id).await?.to_form();
            apply_startup_fields(&mut form, fields);
            reference_set(&form.city, "City", "--city")?;
            reference_set(&form.industry, "Industry", "--industry")?;
            controller.update(*id, &form).await?;
            Ok(CommandOutput::info(format!("Updated startup {id}")))
        }
        StartupCommand::Delete { id } => {
            if !ctx.assume_yes {
                let form = controller.edit_form(*id).await?;
                return Ok(confirmation_required(
                    format!("Startup {id}"),
                    form.fields(),
                ));
            }
            controller.delete(*id).await?;
            Ok(CommandOutput::info(format!("Deleted startup {id}")))
        }
    }
}

fn apply_startup_fields(form: &mut StartupForm, fields: &StartupFields) {
    if let Some(name) = &fields.name {
        form.name = name.clone();
    }
    if fields.founded_year.is_some() {
        form.founded_year = fields.founded_year;
    }
    if let Some(city) = &fields.city {
        form.city = city.clone();
    }
    if let Some(industry) = &fields.industry {
        form.industry = industry.clone();
    }
}

/// Handle `investor ...`.
pub async fn handle_investor(
    ctx: &CommandContext<'_>,
    cmd: &InvestorCommand,
) -> Result<CommandOutput> {
    let controller = InvestorController::new(ctx.db, ctx.timeout);
    match cmd {
        InvestorCommand::List => Ok(CommandOutput::Records(controller.list().await?)),
        InvestorCommand::Show { id } => {
            let form = controller.edit_form(*id).await?;
            Ok(CommandOutput::form(format!("Investor {id}"), form.fields()))
        }
        InvestorCommand::Create { id, fields } => {
            let form = InvestorForm {
                name: fields.name.clone().unwrap_or_default(),
                investor_type: fields
                    .investor_type
                    .ok_or_else(|| AtlasError::validation("--type is required"))?,
                country: required(&fields.country, "--country")?,
            };
            controller.create(*id, &form).await?;
            Ok(CommandOutput::info(format!(
                "Created investor {id} ({})",
                form.name.trim()
            )))
        }
        InvestorCommand::Update { id, fields } => {
            let mut form = controller.edit_form(*id).await?.to_form();
            apply_investor_fields(&mut form, fields);
            reference_set(&form.country, "Country", "--country")?;
            controller.update(*id, &form).await?;
            Ok(CommandOutput::info(format!("Updated investor {id}")))
        }
        InvestorCommand::Delete { id } => {
            if !ctx.assume_yes {
                let form = controller.edit_form(*id).await?;
                return Ok(confirmation_required(
                    format!("Investor {id}"),
                    form.fields(),
                ));
            }
            controller.delete(*id).await?;
            Ok(CommandOutput::info(format!("Deleted investor {id}")))
        }
    }
}

fn apply_investor_fields(form: &mut InvestorForm, fields: &InvestorFields) {
    if let Some(name) = &fields.name {
        form.name = name.clone();
    }
    if let Some(investor_type) = fields.investor_type {
        form.investor_type = investor_type;
    }
    if let Some(country) = &fields.country {
        form.country = country.clone();
    }
}

/// Handle `funding ...`.
pub async fn handle_funding(
    ctx: &CommandContext<'_>,
    cmd: &FundingCommand,
) -> Result<CommandOutput> {
    let controller = FundingRoundController::new(ctx.db, ctx.timeout);
    match cmd {
        FundingCommand::List => Ok(CommandOutput::Records(controller.list().await?)),
        FundingCommand::Show { id } => {
            let form = controller.edit_form(*id).await?;
            Ok(CommandOutput::form(format!("Funding round {id}"), form.fields()))
        }
        FundingCommand::Create { id, fields } => {
            let form = FundingRoundForm {
                startup: required(&fields.startup, "--startup")?,
                date: fields.date,
                amount: fields.amount,
                stage: fields
                    .stage
                    .ok_or_else(|| AtlasError::validation("--stage is required"))?,
            };
            controller.create(*id, &form).await?;
            Ok(CommandOutput::info(format!(
                "Created funding round {id} for {}",
                form.startup.trim()
            )))
        }
        FundingCommand::Update { id, fields } => {
            let mut form = controller.edit_form(*id).await?.to_form();
            apply_funding_fields(&mut form, fields);
            reference_set(&form.startup, "Startup", "--startup")?;
            controller.update(*id, &form).await?;
            Ok(CommandOutput::info(format!("Updated funding round {id}")))
        }
        FundingCommand::Delete { id } => {
            if !ctx.assume_yes {
                let form = controller.edit_form(*id).await?;
                return Ok(confirmation_required(
                    format!("Funding round {id}"),
                    form.fields(),
                ));
            }
            controller.delete(*id).await?;
            Ok(CommandOutput::info(format!("Deleted funding round {id}")))
        }
    }
}

fn apply_funding_fields(form: &mut FundingRoundForm, fields: &FundingFields) {
    if let Some(startup) = &fields.startup {
        form.startup = startup.clone();
    }
    if fields.date.is_some() {
        form.date = fields.date;
    }
    if fields.amount.is_some() {
        form.amount = fields.amount;
    }
    if let Some(stage) = fields.stage {
        form.stage = stage;
    }
}

/// Handle `founder ...`.
pub async fn handle_founder(
    ctx: &CommandContext<'_>,
    cmd: &FounderCommand,
) -> Result<CommandOutput> {
    let controller = FounderController::new(ctx.db, ctx.timeout);
    match cmd {
        FounderCommand::List => Ok(CommandOutput::Records(controller.list().await?)),
        FounderCommand::Show { id } => {
            let form = controller.edit_form(*id).await?;
            Ok(CommandOutput::form(format!("Founder {id}"), form.fields()))
        }
        FounderCommand::Create { id, fields } => {
            let form = FounderForm {
                name: fields.name.clone().unwrap_or_default(),
                startup: required(&fields.startup, "--startup")?,
                role: fields.role.clone().unwrap_or_default(),
                linkedin_url: fields.linkedin_url.clone().unwrap_or_default(),
            };
            controller.create(*id, &form).await?;
            Ok(CommandOutput::info(format!(
                "Created founder {id} ({})",
                form.name.trim()
            )))
        }
        FounderCommand::Update { id, fields } => {
            let mut form = controller.edit_form(*id).await?.to_form();
            apply_founder_fields(&mut form, fields);
            reference_set(&form.startup, "Startup", "--startup")?;
            controller.update(*id, &form).await?;
            Ok(CommandOutput::info(format!("Updated founder {id}")))
        }
        FounderCommand::Delete { id } => {
            if !ctx.assume_yes {
                let form = controller.edit_form(*id).await?;
                return Ok(confirmation_required(
                    format!("Founder {id}"),
                    form.fields(),
                ));
            }
            controller.delete(*id).await?;
            Ok(CommandOutput::info(format!("Deleted founder {id}")))
        }
    }
}

fn apply_founder_fields(form: &mut FounderForm, fields: &FounderFields) {
    if let Some(name) = &fields.name {
        form.name = name.clone();
    }
    if let Some(startup) = &fields.startup {
        form.startup = startup.clone();
    }
    if let Some(role) = &fields.role {
        form.role = role.clone();
    }
    if let Some(url) = &fields.linkedin_url {
        form.linkedin_url = url.clone();
    }
}

/// Handle `acquisition ...`.
pub async fn handle_acquisition(
    ctx: &CommandContext<'_>,
    cmd: &AcquisitionCommand,
) -> Result<CommandOutput> {
    let controller = AcquisitionController::new(ctx.db, ctx.timeout);
    match cmd {
        AcquisitionCommand::List => Ok(CommandOutput::Records(controller.list().await?)),
        AcquisitionCommand::Show { key } => {
            let selection = controller
                .select(key.acquirer_id, key.target_id, key.date)
                .await?;
            let form = controller.edit_form(&selection).await?;
            Ok(CommandOutput::form(selection.to_string(), form.fields()))
        }
        AcquisitionCommand::Create { fields, date } => {
            let form = AcquisitionForm {
                acquirer: required(&fields.acquirer, "--acquirer")?,
                target: required(&fields.target, "--target")?,
                date: *date,
                amount: fields.amount,
            };
            controller.create(&form).await?;
            Ok(CommandOutput::info(format!(
                "Created acquisition {} → {}",
                form.acquirer.trim(),
                form.target.trim()
            )))
        }
        AcquisitionCommand::Update {
            key,
            fields,
            new_date,
        } => {
            let selection = controller
                .select(key.acquirer_id, key.target_id, key.date)
                .await?;
            let mut form = controller.edit_form(&selection).await?.to_form();
            apply_acquisition_fields(&mut form, fields);
            if new_date.is_some() {
                form.date = *new_date;
            }
            reference_set(&form.acquirer, "Acquirer", "--acquirer")?;
            reference_set(&form.target, "Target", "--target")?;
            controller.update(&selection, &form).await?;
            Ok(CommandOutput::info(format!("Updated {selection}")))
        }
        AcquisitionCommand::Delete { key } => {
            let selection = controller
                .select(key.acquirer_id, key.target_id, key.date)
                .await?;
            if !ctx.assume_yes {
                let form = controller.edit_form(&selection).await?;
                return Ok(confirmation_required(selection.to_string(), form.fields()));
            }
            controller.delete(&selection).await?;
            Ok(CommandOutput::info(format!("Deleted {selection}")))
        }
    }
}

fn apply_acquisition_fields(form: &mut AcquisitionForm, fields: &AcquisitionFields) {
    if let Some(acquirer) = &fields.acquirer {
        form.acquirer = acquirer.clone();
    }
    if let Some(target) = &fields.target {
        form.target = target.clone();
    }
    if fields.amount.is_some() {
        form.amount = fields.amount;
    }
}

/// A reference field that must be named on create.
fn required(value: &Option<String>, flag: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| AtlasError::validation(format!("{flag} is required")))
}

/// A loaded reference that did not resolve stays blank until the operator
/// names one.
fn reference_set(value: &str, label: &str, flag: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AtlasError::validation(format!(
            "{label} is unset; pass {flag}"
        )));
    }
    Ok(())
}

fn confirmation_required(title: String, fields: Vec<FormField>) -> CommandOutput {
    CommandOutput::multiple(vec![
        CommandOutput::form(title, fields),
        CommandOutput::info("Not deleted. Re-run with --yes to delete this record."),
    ])
}

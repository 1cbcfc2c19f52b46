use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, CustomUserError, MultiSelect, Text};

use recurringPages::clients::notion_client::NotionEndpoint;
use recurringPages::config::NotionSettings;
use recurringPages::error::{AppError, Result};
use recurringPages::models::date_range::parse_iso_date;
use recurringPages::models::field::FieldType;
use recurringPages::models::schema::{DatabaseSchema, SelectOption};
use recurringPages::service::notion_service::{NotionApi, NotionService};
use recurringPages::service::page_service::PageCreator;
use recurringPages::service::recurring_service::submit_recurring;
use recurringPages::service::schema_service::{
    fetch_field_type_map, fetch_multi_select_options, field_type_table, multi_select_options,
    parse_field_assignment, resolve_options,
};

const DEFAULT_INTERVAL_DAYS: i64 = 7;

/// Create recurring pages in a Notion database
#[derive(Parser)]
#[command(name = "recurringPages", version, about)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create one page per date from start up to (not including) end
    Recurring {
        #[arg(short, long)]
        title: String,
        /// Append a running number to each title ("Gym 1", "Gym 2", ...)
        #[arg(long)]
        increment: bool,
        /// First date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<String>,
        /// Exclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// Days between pages
        #[arg(short, long, allow_negative_numbers = true)]
        interval: i64,
        /// Multi-select option name for the type field, repeatable
        #[arg(long = "type")]
        types: Vec<String>,
        /// Extra property to set on every page, repeatable
        #[arg(long = "field", value_name = "ID=VALUE")]
        fields: Vec<String>,
    },
    /// Create a single page
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        date: String,
        #[arg(long = "type")]
        types: Vec<String>,
        /// Extra property to set, repeatable
        #[arg(long = "field", value_name = "ID=VALUE")]
        fields: Vec<String>,
    },
    /// List field ids and their types
    Fields,
    /// List the options of a multi-select field
    Options {
        /// Field id, defaults to NOTION_TYPE_PROPERTY_ID
        #[arg(long)]
        field: Option<String>,
    },
    /// Ask for everything interactively
    Prompt,
}

pub async fn run(cli: Cli, settings: NotionSettings) -> Result<()> {
    let endpoint = NotionEndpoint::new(
        &settings.api_base_url,
        &settings.service_credential,
        &settings.notion_version,
    );
    let api: Arc<dyn NotionApi> = Arc::new(NotionService::new(endpoint));

    match cli.command {
        Commands::Recurring {
            title,
            increment,
            start,
            end,
            interval,
            types,
            fields,
        } => {
            let start = match start {
                Some(start) => parse_iso_date(&start)?,
                None => today(&settings),
            };
            let end = parse_iso_date(&end)?;
            let schema = api.retrieve_database_schema(&settings.database_id).await?;
            let creator = page_creator(api.clone(), &settings, &schema, &types, &fields)?;
            let count = submit_recurring(&creator, &title, increment, start, end, interval).await?;
            println!("Created {} pages", count);
        }
        Commands::Create {
            title,
            date,
            types,
            fields,
        } => {
            let date = parse_iso_date(&date)?;
            let schema = api.retrieve_database_schema(&settings.database_id).await?;
            let creator = page_creator(api.clone(), &settings, &schema, &types, &fields)?;
            let page = creator.create(&creator.draft(&title, date)).await?;
            println!("{}", page.url.unwrap_or(page.id));
        }
        Commands::Fields => {
            let types = fetch_field_type_map(api.as_ref(), &settings.database_id).await?;
            let mut rows: Vec<_> = types.into_iter().collect();
            rows.sort();
            for (field_id, type_name) in rows {
                println!("{}\t{}", field_id, type_name);
            }
        }
        Commands::Options { field } => {
            let field_id = field
                .or_else(|| settings.type_field_id.clone())
                .ok_or_else(|| {
                    AppError::Config("pass --field or set NOTION_TYPE_PROPERTY_ID".to_string())
                })?;
            let options =
                fetch_multi_select_options(api.as_ref(), &settings.database_id, &field_id).await?;
            for option in options {
                println!("{}\t{}", option.id, option.name);
            }
        }
        Commands::Prompt => {
            let schema = api.retrieve_database_schema(&settings.database_id).await?;
            let answers = prompt_recurring(&settings, &schema)?;
            let creator = page_creator(api.clone(), &settings, &schema, &answers.types, &[])?;
            let count = submit_recurring(
                &creator,
                &answers.title,
                answers.increment,
                answers.start,
                answers.end,
                answers.interval,
            )
            .await?;
            println!("Created {} pages", count);
        }
    }
    Ok(())
}

fn today(settings: &NotionSettings) -> NaiveDate {
    Utc::now().with_timezone(&settings.timezone).date_naive()
}

/// Builds the page creator from the live schema, checking the configured
/// fields exist with the right types before anything is written.
fn page_creator(
    api: Arc<dyn NotionApi>,
    settings: &NotionSettings,
    schema: &DatabaseSchema,
    type_names: &[String],
    assignments: &[String],
) -> Result<PageCreator> {
    let table = field_type_table(schema);
    table.ensure_fields(&[
        (settings.title_field_id.as_str(), FieldType::Title),
        (settings.date_field_id.as_str(), FieldType::Date),
    ])?;

    let mut creator = PageCreator::new(
        api,
        settings.database_id.clone(),
        table,
        settings.page_fields(),
    );
    if !type_names.is_empty() {
        let type_field_id = settings.type_field_id.as_deref().ok_or_else(|| {
            AppError::Config("--type needs NOTION_TYPE_PROPERTY_ID".to_string())
        })?;
        let options = multi_select_options(schema, type_field_id)?;
        creator = creator.with_types(resolve_options(type_field_id, &options, type_names)?);
    }
    if !assignments.is_empty() {
        let extra_fields = assignments
            .iter()
            .map(|raw| parse_field_assignment(schema, raw))
            .collect::<Result<Vec<_>>>()?;
        creator = creator.with_extra_fields(extra_fields);
    }
    Ok(creator)
}

struct RecurringAnswers {
    title: String,
    increment: bool,
    start: NaiveDate,
    end: NaiveDate,
    interval: i64,
    types: Vec<String>,
}

fn prompt_recurring(settings: &NotionSettings, schema: &DatabaseSchema) -> Result<RecurringAnswers> {
    let title = Text::new("Page title:").prompt().map_err(prompt_error)?;
    let increment = Confirm::new("Number each title?")
        .with_default(false)
        .prompt()
        .map_err(prompt_error)?;
    let start = prompt_date(
        "Start date (YYYY-MM-DD):",
        Some(today(settings).to_string().as_str()),
        None,
    )?;
    let end = prompt_date("End date, exclusive (YYYY-MM-DD):", None, Some(start))?;
    let interval = CustomType::<i64>::new("Days between pages:")
        .with_default(DEFAULT_INTERVAL_DAYS)
        .prompt()
        .map_err(prompt_error)?;

    let types = match &settings.type_field_id {
        Some(type_field_id) => {
            let options: Vec<SelectOption> = multi_select_options(schema, type_field_id)?;
            MultiSelect::new("Types:", options)
                .prompt()
                .map_err(prompt_error)?
                .into_iter()
                .map(|option| option.name)
                .collect()
        }
        None => Vec::new(),
    };

    Ok(RecurringAnswers {
        title,
        increment,
        start,
        end,
        interval,
        types,
    })
}

fn check_date(input: &str, not_before: Option<NaiveDate>) -> std::result::Result<NaiveDate, String> {
    let date = parse_iso_date(input).map_err(|e| e.to_string())?;
    match not_before {
        Some(min) if date < min => Err(format!("must not be before {}", min)),
        _ => Ok(date),
    }
}

/// Re-asks until the input is a valid date no earlier than `not_before`.
fn prompt_date(message: &str, default: Option<&str>, not_before: Option<NaiveDate>) -> Result<NaiveDate> {
    let validator = move |input: &str| {
        let verdict = match check_date(input, not_before) {
            Ok(_) => Validation::Valid,
            Err(message) => Validation::Invalid(message.into()),
        };
        Ok::<_, CustomUserError>(verdict)
    };
    let mut prompt = Text::new(message).with_validator(validator);
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    let input = prompt.prompt().map_err(prompt_error)?;
    parse_iso_date(&input)
}

fn prompt_error(err: inquire::InquireError) -> AppError {
    AppError::Prompt(err.to_string())
}

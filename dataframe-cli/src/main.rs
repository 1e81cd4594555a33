mod cli;
mod confirm;
mod error;
mod export;
mod render;

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use dataframe_lib::DataFrameTable;
use dataframe_lib::TableConfig;
use dataframe_lib::action::ActionManager;
use dataframe_lib::action::AutoConfirm;
use dataframe_lib::action::Dispatch;
use dataframe_lib::action::IntentLog;
use dataframe_lib::column::Column;
use dataframe_lib::model::Row;
use dataframe_lib::table::TableSpec;
use log::LevelFilter;
use log::debug;
use log::info;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Cli;
use crate::cli::parse_filter;
use crate::cli::parse_sort;
use crate::confirm::StdinConfirm;
use crate::error::CliError;
use crate::export::FORMATS;
use crate::export::WriterExporter;
use crate::render::render;
use crate::render::render_detail;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match &cli.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let rows = read_rows(cli)?;
    let config = build_config(cli, &rows)?;
    let intents = IntentLog::new();
    let manager = ActionManager::new(intents.clone()).id_field(config.id_field.as_str());
    let manager = if cli.yes {
        manager.confirm(AutoConfirm(true))
    } else {
        manager.confirm(StdinConfirm)
    };
    let mut table =
        DataFrameTable::new(config.clone(), config.dataset(rows.clone())?)?.with_actions(manager);

    for arg in &cli.filters {
        let (id, values) = parse_filter(arg)?;
        table.set_filter(&id, values);
    }
    if let Some(term) = &cli.search {
        table.set_search(term.as_str());
    }
    if let Some(sort) = &cli.sort {
        table.set_sort(Some(parse_sort(sort)?))?;
    }
    for column in &cli.hidden {
        table.set_column_visible(column, false)?;
    }
    if let Some(size) = cli.page_size {
        if size == 0 {
            return Err(CliError::argument("page size must be at least 1"));
        }
        table.set_page_size(size);
    }
    table.set_page(cli.page);

    for id in &cli.selected {
        if !table.data().contains(id) {
            return Err(CliError::argument(format!("no row with id '{id}'")));
        }
        if !table.is_selected(id) {
            table.toggle_row(id);
        }
    }

    if let Some(action) = &cli.bulk {
        run_bulk(&mut table, &config, rows, action, &intents)?;
    }
    if let Some(id) = &cli.detail {
        table.open_detail(id)?;
    }

    if let Some(format) = &cli.export {
        return export(&table, format, cli);
    }

    let view = table.view();
    let mut stdout = io::stdout().lock();
    match (&cli.detail, &view.detail) {
        (Some(_), Some(detail)) => write!(stdout, "{}", render_detail(detail))?,
        _ => write!(stdout, "{}", render(&view))?,
    }
    Ok(())
}

fn read_rows(cli: &Cli) -> Result<Vec<Row>, CliError> {
    let json = fs::read_to_string(&cli.data).map_err(|source| CliError::Read {
        path: cli.data.display().to_string(),
        source,
    })?;
    let rows: Vec<Row> = serde_json::from_str(&json)?;
    debug!("[cli] read {} rows from {}", rows.len(), cli.data.display());
    Ok(rows)
}

/// Loads the configuration document, or derives a table showing every
/// field when there is none.
fn build_config(cli: &Cli, rows: &[Row]) -> Result<TableConfig, CliError> {
    if let Some(path) = &cli.config {
        let config = TableSpec::load(path)?.into_config()?;
        info!("[cli] loaded table configuration from {}", path.display());
        return Ok(config);
    }

    let mut fields: Vec<&String> = Vec::new();
    for row in rows {
        for field in row.fields().keys() {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }
    let columns = fields
        .into_iter()
        .map(|f| Column::new(f.as_str(), f.as_str()).sortable())
        .collect();
    Ok(TableConfig::new(columns)
        .id_field(cli.id_field.as_str())
        .search_all()
        .selectable()
        .export_formats(FORMATS))
}

/// Runs a bulk action, applies the resulting intents to the rows and hands
/// the updated rows back to the table.
fn run_bulk(
    table: &mut DataFrameTable,
    config: &TableConfig,
    mut rows: Vec<Row>,
    action: &str,
    intents: &IntentLog,
) -> Result<(), CliError> {
    let selected = table.selected_ids();
    let dispatch = table.run_bulk_action(action)?;

    match dispatch {
        Dispatch::Done => {
            let applied = intents.take();
            for intent in &applied {
                intent.apply(&mut rows, &config.id_field);
            }
            info!(
                "[cli] {action} applied {} changes to {} rows",
                applied.len(),
                selected.len()
            );
            table.set_data(config.dataset(rows)?)?;
        }
        Dispatch::Declined => info!("[cli] {action} cancelled"),
        Dispatch::Disabled | Dispatch::Unhandled => {
            return Err(CliError::argument(format!("bulk action '{action}' did nothing")));
        }
    }
    Ok(())
}

fn export(table: &DataFrameTable, format: &str, cli: &Cli) -> Result<(), CliError> {
    let count = match &cli.output {
        Some(path) => {
            let mut exporter = WriterExporter::new(io::BufWriter::new(File::create(path)?));
            let count = table.export(format, &mut exporter)?;
            exporter.into_inner().flush()?;
            count
        }
        None => {
            let mut exporter = WriterExporter::new(io::stdout().lock());
            table.export(format, &mut exporter)?
        }
    };
    info!("[cli] exported {count} rows as {format}");
    Ok(())
}

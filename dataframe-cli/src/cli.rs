//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use dataframe_lib::query::Direction;
use dataframe_lib::query::SortSpec;

use crate::error::CliError;

/// Filter, search, sort and page a JSON row file as a text table.
#[derive(Parser, Debug)]
#[command(name = "dataframe", version, about, long_about = None)]
pub struct Cli {
    /// JSON array of row objects
    pub data: PathBuf,

    /// Table configuration document (columns, filters, actions)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Identity field, when no configuration is given
    #[arg(long, default_value = "id")]
    pub id_field: String,

    /// Search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Quick filter as `id=value[,value...]`; repeatable
    #[arg(short, long = "filter", value_name = "ID=VALUES")]
    pub filters: Vec<String>,

    /// Sort as `column[:asc|desc]`
    #[arg(long)]
    pub sort: Option<String>,

    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Column to hide; repeatable
    #[arg(long = "hide", value_name = "COLUMN")]
    pub hidden: Vec<String>,

    /// Row id to select; repeatable
    #[arg(long = "select", value_name = "ID")]
    pub selected: Vec<String>,

    /// Bulk action to run on the selected rows
    #[arg(long, value_name = "ACTION", requires = "selected")]
    pub bulk: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Show the detail view of a row
    #[arg(long, value_name = "ID")]
    pub detail: Option<String>,

    /// Export the processed rows instead of rendering them
    #[arg(short, long, value_name = "FORMAT")]
    pub export: Option<String>,

    /// Export destination; stdout when omitted
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses `id=v1,v2` into the filter id and its values.
pub fn parse_filter(arg: &str) -> Result<(String, Vec<String>), CliError> {
    let (id, values) = arg
        .split_once('=')
        .ok_or_else(|| CliError::argument(format!("filter '{arg}' must look like id=value")))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::argument(format!("filter '{arg}' has no id")));
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((id.to_string(), values))
}

/// Parses `column[:asc|desc]`.
pub fn parse_sort(arg: &str) -> Result<SortSpec, CliError> {
    let (column, direction) = match arg.rsplit_once(':') {
        Some((column, "asc")) => (column, Direction::Asc),
        Some((column, "desc")) => (column, Direction::Desc),
        Some((_, other)) => {
            return Err(CliError::argument(format!(
                "sort direction '{other}' must be asc or desc"
            )));
        }
        None => (arg, Direction::Asc),
    };
    if column.is_empty() {
        return Err(CliError::argument("sort column is empty"));
    }
    Ok(SortSpec {
        column: column.to_string(),
        direction,
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "dataframe",
            "orders.json",
            "--filter",
            "status=pending,shipped",
            "-f",
            "payment=due",
            "--sort",
            "amount:desc",
            "--hide",
            "notes",
        ])
        .unwrap();
        assert_eq!(cli.filters.len(), 2);
        assert_eq!(cli.page, 1);
        assert_eq!(cli.hidden, ["notes"]);
        assert!(Cli::try_parse_from(["dataframe", "x.json", "--bulk", "rm"]).is_err());
    }

    #[test]
    fn test_parse_filter() {
        let (id, values) = parse_filter("status = pending, shipped ,").unwrap();
        assert_eq!(id, "status");
        assert_eq!(values, ["pending", "shipped"]);
        assert!(parse_filter("status").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("amount").unwrap(), SortSpec::asc("amount"));
        assert_eq!(parse_sort("amount:desc").unwrap(), SortSpec::desc("amount"));
        assert!(parse_sort("amount:up").is_err());
        assert!(parse_sort(":asc").is_err());
    }
}

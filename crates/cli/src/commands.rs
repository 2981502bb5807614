use crate::error::CliError;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use wrangler::options::{DateColumn, DateFormat, DtypeMap, FetchOptions, IndexCol, ParseDates};

#[derive(Subcommand)]
pub enum Commands {
    /// Run a query and print its result
    Query {
        /// Connection URL, file holding a URL, or SQLite database path
        #[arg(long, env = "WRANGLER_CONN")]
        conn: String,

        #[command(flatten)]
        sql: SqlInput,

        /// Column to use as index; repeat for a multi-column index
        #[arg(long = "index-col")]
        index_col: Vec<String>,

        /// Date column, optionally with a strftime format or epoch unit: `col` or `col=fmt`
        #[arg(long = "parse-dates")]
        parse_dates: Vec<String>,

        /// Column dtype as `col=type`
        #[arg(long)]
        dtype: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[arg(
            long,
            help = "If specified, writes the result to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    /// Print the options embedded in a query as JSON
    Extract {
        #[command(flatten)]
        sql: SqlInput,
    },
    /// Check that a connection string can be resolved and queried
    TestConn {
        /// Connection URL, file holding a URL, or SQLite database path
        #[arg(long, env = "WRANGLER_CONN")]
        conn: String,
    },
}

#[derive(Args)]
pub struct SqlInput {
    /// Query text
    #[arg(long, conflicts_with = "file")]
    pub sql: Option<String>,

    /// File holding the query
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Builds the per-fetch overrides from repeated command line flags.
pub fn fetch_options(
    index_col: &[String],
    parse_dates: &[String],
    dtype: &[String],
) -> Result<FetchOptions, CliError> {
    let mut options = FetchOptions::new();

    if !index_col.is_empty() {
        options = options.index_col(IndexCol::new(index_col));
    }

    if !parse_dates.is_empty() {
        let mut dates = ParseDates::default();
        for arg in parse_dates {
            let column = match arg.split_once('=') {
                Some((column, format)) => DateColumn::new(column, DateFormat::from_spec(format)),
                None => DateColumn::new(arg, DateFormat::Infer),
            };
            dates.push(column);
        }
        options = options.parse_dates(dates);
    }

    if !dtype.is_empty() {
        let pairs = dtype
            .iter()
            .map(|arg| {
                arg.split_once('=').ok_or_else(|| CliError::InvalidArgument {
                    argument: arg.clone(),
                    message: "expected col=type".to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        options = options.dtype(DtypeMap::parse(pairs)?);
    }

    Ok(options)
}

use crate::{
    commands::{Commands, SqlInput},
    error::CliError,
    shutdown::ExitCode,
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wrangler::{DbWrangler, metadata};

mod commands;
mod conn;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "wrangler",
    version = "0.1.0",
    about = "Fetch SQL query results shaped by options embedded in the query"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so results on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = tokio::select! {
        result = run(cli.command) => match result {
            Ok(()) => ExitCode::Success,
            Err(err) => {
                error!("{err}");
                ExitCode::GeneralError
            }
        },
        _ = shutdown::wait_for_signal() => {
            error!("{}", CliError::ShutdownRequested);
            ExitCode::ShutdownRequested
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Query {
            conn,
            sql,
            index_col,
            parse_dates,
            dtype,
            format,
            output,
        } => {
            let overrides = commands::fetch_options(&index_col, &parse_dates, &dtype)?;
            let mut wrangler = DbWrangler::new(&conn)?;

            let frame = match (sql.sql, sql.file) {
                (Some(text), _) => wrangler.fetch(&text, overrides).await?,
                (None, Some(path)) => wrangler.fetch_file(&path, overrides).await?,
                (None, None) => return Err(CliError::MissingSql),
            };

            let rendered = output::render(&frame, format)?;
            output::write_result(&rendered, output.as_deref()).await?;
        }
        Commands::Extract { sql } => {
            let text = read_sql(sql).await?;
            let options = metadata::try_extract(&text).map_err(|err| {
                CliError::InvalidArgument {
                    argument: "sql".to_string(),
                    message: err.to_string(),
                }
            })?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Commands::TestConn { conn } => {
            let spec = conn::test_connection(&conn).await?;
            info!("Connection OK: {spec}");
        }
    }

    Ok(())
}

async fn read_sql(input: SqlInput) -> Result<String, CliError> {
    match (input.sql, input.file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(tokio::fs::read_to_string(path).await?),
        (None, None) => Err(CliError::MissingSql),
    }
}

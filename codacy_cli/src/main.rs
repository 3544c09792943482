mod commands;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use codacy_api::{CancellationToken, Client, ClientOptions, DEFAULT_BASE_URL};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "codacy")]
#[command(about = "Query organizations and repositories on Codacy")]
struct Cli {
    /// Output format: table, markdown, or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API root URL
    #[arg(long, env = "CODACY_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Account API token
    #[arg(long, env = "CODACY_API_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated user
    User,
    /// List your organizations on a provider
    Orgs(commands::organizations::OrgsArgs),
    /// Show a single organization
    Org(commands::organizations::OrgArgs),
    /// List the repositories of an organization
    Repos(commands::repositories::ReposArgs),
    /// Show a single repository
    Repo(commands::repositories::RepoArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codacy=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let mut options = ClientOptions::default()
        .with_base_url(cli.base_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout));
    if let Some(token) = &cli.api_token {
        options = options.with_api_token(token.clone());
    }

    // Ctrl-C aborts the in-flight request instead of killing the process.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let client = Client::new(options)?.with_cancellation(cancel);
    tracing::debug!("Using API at {}", client.base_url());

    let result = match &cli.command {
        Commands::User => commands::user::run(&client, &format).await,
        Commands::Orgs(args) => commands::organizations::run_list(args, &client, &format).await,
        Commands::Org(args) => commands::organizations::run_get(args, &client, &format).await,
        Commands::Repos(args) => commands::repositories::run_list(args, &client, &format).await,
        Commands::Repo(args) => commands::repositories::run_get(args, &client, &format).await,
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => match e.downcast_ref::<codacy_api::Error>() {
            Some(api_error) => {
                eprintln!("{}", output::format_api_error(api_error));
                Ok(ExitCode::FAILURE)
            }
            None => Err(e),
        },
    }
}

use anyhow::Result;
use clap::Args;
use codacy_api::types::Provider;
use codacy_api::{Client, CursorQuery};

use crate::output::{print_json, print_repositories, OutputFormat};

#[derive(Args)]
pub struct ReposArgs {
    /// Git provider: gh, ghe, gl, gle, bb, bbe
    #[arg(long, default_value = "gh")]
    pub provider: Provider,

    /// Organization name on the provider
    #[arg(long)]
    pub org: String,

    /// Filter repositories by name
    #[arg(long)]
    pub search: Option<String>,

    /// Cursor returned by a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Results per page
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct RepoArgs {
    /// Git provider: gh, ghe, gl, gle, bb, bbe
    #[arg(long, default_value = "gh")]
    pub provider: Provider,

    /// Organization name on the provider
    #[arg(long)]
    pub org: String,

    /// Repository name
    #[arg(long)]
    pub repo: String,
}

pub async fn run_list(args: &ReposArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut query = CursorQuery::default();
    if let Some(search) = &args.search {
        query = query.with_search(search);
    }
    if let Some(cursor) = &args.cursor {
        query = query.with_cursor(cursor);
    }
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }

    let resp = client
        .list_organization_repositories(args.provider, &args.org, &query)
        .await?;

    if let Some(total) = resp.pagination.as_ref().and_then(|p| p.total) {
        eprintln!("{} repositories in {}", total, args.org);
    }
    match format {
        OutputFormat::Json => print_json(&resp.data),
        _ => print_repositories(&resp.data, format),
    }
    if let Some(cursor) = resp.next_cursor() {
        eprintln!("More results available, use --cursor {}", cursor);
    }
    Ok(())
}

pub async fn run_get(args: &RepoArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let resp = client
        .get_repository(args.provider, &args.org, &args.repo)
        .await?;
    match format {
        OutputFormat::Json => print_json(&resp.data),
        _ => print_repositories(std::slice::from_ref(&resp.data), format),
    }
    Ok(())
}

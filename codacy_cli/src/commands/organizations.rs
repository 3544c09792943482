use anyhow::Result;
use clap::Args;
use codacy_api::types::Provider;
use codacy_api::{Client, CursorQuery};

use crate::output::{print_json, print_organizations, OutputFormat};

#[derive(Args)]
pub struct OrgsArgs {
    /// Git provider: gh, ghe, gl, gle, bb, bbe
    #[arg(long, default_value = "gh")]
    pub provider: Provider,

    /// Cursor returned by a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Results per page
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct OrgArgs {
    /// Git provider: gh, ghe, gl, gle, bb, bbe
    #[arg(long, default_value = "gh")]
    pub provider: Provider,

    /// Organization name on the provider
    #[arg(long)]
    pub org: String,
}

pub async fn run_list(args: &OrgsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut query = CursorQuery::default();
    if let Some(cursor) = &args.cursor {
        query = query.with_cursor(cursor);
    }
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }

    let resp = client.list_user_organizations(args.provider, &query).await?;

    match format {
        OutputFormat::Json => print_json(&resp.data),
        _ => print_organizations(&resp.data, format),
    }
    if let Some(cursor) = resp.next_cursor() {
        eprintln!("More results available, use --cursor {}", cursor);
    }
    Ok(())
}

pub async fn run_get(args: &OrgArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let resp = client.get_organization(args.provider, &args.org).await?;
    match format {
        OutputFormat::Json => print_json(&resp.data),
        _ => print_organizations(std::slice::from_ref(&resp.data), format),
    }
    Ok(())
}

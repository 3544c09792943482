use anyhow::Result;
use codacy_api::Client;

use crate::output::{print_json, print_user, OutputFormat};

pub async fn run(client: &Client, format: &OutputFormat) -> Result<()> {
    let resp = client.get_user().await?;
    match format {
        OutputFormat::Json => print_json(&resp.data),
        OutputFormat::Table | OutputFormat::Markdown => print_user(&resp.data, format),
    }
    Ok(())
}

use codacy_api::types::{Organization, Repository, User};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct UserRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Created")]
    created: String,
}

#[derive(Tabled, Serialize)]
struct OrganizationRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Type")]
    org_type: String,
    #[tabled(rename = "On Codacy")]
    on_codacy: String,
    #[tabled(rename = "Join Mode")]
    join_mode: String,
}

#[derive(Tabled, Serialize)]
struct RepositoryRow {
    #[tabled(rename = "Repository")]
    path: String,
    #[tabled(rename = "Visibility")]
    visibility: String,
    #[tabled(rename = "Default Branch")]
    branch: String,
    #[tabled(rename = "Languages")]
    languages: String,
    #[tabled(rename = "Last Updated")]
    last_updated: String,
}

// -- Row builders --

fn build_user_rows(users: &[User]) -> Vec<UserRow> {
    users
        .iter()
        .map(|u| UserRow {
            id: u.id,
            name: u.name.clone().unwrap_or_default(),
            email: u.main_email.clone(),
            admin: yes_no(u.is_admin),
            created: u
                .created
                .map(|c| c.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn build_organization_rows(organizations: &[Organization]) -> Vec<OrganizationRow> {
    organizations
        .iter()
        .map(|o| OrganizationRow {
            name: o.name.clone(),
            provider: o.provider.to_string(),
            org_type: o.organization_type.clone(),
            on_codacy: yes_no(o.identifier.is_some()),
            join_mode: o.join_mode.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_repository_rows(repositories: &[Repository]) -> Vec<RepositoryRow> {
    repositories
        .iter()
        .map(|r| RepositoryRow {
            path: r.display_path(),
            visibility: r.visibility.clone(),
            branch: r
                .default_branch
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_default(),
            languages: r.languages.join(", "),
            last_updated: r
                .last_updated
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn render<T: Tabled>(rows: Vec<T>, format: &OutputFormat) -> String {
    let mut table = Table::new(rows);
    if let OutputFormat::Markdown = format {
        table.with(Style::markdown());
    }
    table.to_string()
}

// -- Table output --

pub fn print_user(user: &User, format: &OutputFormat) {
    println!(
        "{}",
        render(build_user_rows(std::slice::from_ref(user)), format)
    );
}

pub fn print_organizations(organizations: &[Organization], format: &OutputFormat) {
    println!("{}", render(build_organization_rows(organizations), format));
}

pub fn print_repositories(repositories: &[Repository], format: &OutputFormat) {
    println!("{}", render(build_repository_rows(repositories), format));
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Errors --

/// Renders a classified API error for stderr: name, kind, message, then
/// one line per remediation action.
pub fn format_api_error(err: &codacy_api::Error) -> String {
    let mut out = format!("{} ({}): {}", err.name(), err.kind(), err.message());
    if let Some(status) = err.status() {
        out.push_str(&format!(" [HTTP {}]", status));
    }
    if let Some(cause) = err.cause() {
        out.push_str(&format!("\n  caused by: {}", cause));
    }
    for action in err.actions() {
        match &action.url {
            Some(url) => out.push_str(&format!("\n  - {} ({})", action.description, url)),
            None => out.push_str(&format!("\n  - {}", action.description)),
        }
    }
    out
}

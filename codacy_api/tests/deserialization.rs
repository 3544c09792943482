use codacy_api::types::{
    ErrorEnvelope, ErrorTag, Organization, PaginatedResponse, Provider, Repository, Response, User,
};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_user() {
    let json = load_fixture("user.json");
    let resp: Response<User> = serde_json::from_str(&json).unwrap();
    let user = resp.data;
    assert_eq!(user.id, 4242);
    assert_eq!(user.name.as_deref(), Some("Jane Developer"));
    assert_eq!(user.other_emails, vec!["jane@users.noreply.github.com"]);
    assert!(!user.is_admin);
    assert_eq!(
        user.created.map(|c| c.to_rfc3339()).as_deref(),
        Some("2021-03-04T10:15:30+00:00")
    );
}

#[test]
fn deserialize_organizations() {
    let json = load_fixture("organizations.json");
    let resp: PaginatedResponse<Organization> = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.data.len(), 2);

    let codacy = &resp.data[0];
    assert_eq!(codacy.identifier, Some(1001));
    assert_eq!(codacy.provider, Provider::GitHub);
    assert_eq!(codacy.organization_type, "Organization");
    assert_eq!(codacy.single_provider_login, Some(true));

    let account = &resp.data[1];
    assert_eq!(account.identifier, None);
    assert_eq!(account.organization_type, "Account");
    assert!(account.avatar.is_none());

    let pagination = resp.pagination.as_ref().unwrap();
    assert_eq!(pagination.total, Some(3));
    assert!(pagination.has_next());
}

#[test]
fn deserialize_repositories_last_page() {
    let json = load_fixture("repositories.json");
    let resp: PaginatedResponse<Repository> = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.next_cursor(), None);

    let docs = &resp.data[0];
    assert_eq!(docs.visibility, "Public");
    assert_eq!(docs.languages, vec!["Markdown", "Python"]);
    let branch = docs.default_branch.as_ref().unwrap();
    assert_eq!(branch.name, "main");
    assert!(branch.is_default);

    let sandbox = &resp.data[1];
    assert_eq!(sandbox.repository_id, None);
    assert_eq!(sandbox.display_path(), "codacy/sandbox");
}

#[test]
fn error_fixtures_are_envelopes() {
    let json: serde_json::Value =
        serde_json::from_str(&load_fixture("error_not_found.json")).unwrap();
    let envelope = ErrorEnvelope::from_body(&json).unwrap();
    assert_eq!(envelope.tag(), Ok(ErrorTag::NotFound));
    assert_eq!(envelope.actions.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&load_fixture("error_payment_required.json")).unwrap();
    let envelope = ErrorEnvelope::from_body(&json).unwrap();
    assert_eq!(envelope.tag(), Ok(ErrorTag::PaymentRequired));
}

#[test]
fn success_fixtures_are_not_envelopes() {
    for name in ["user.json", "organizations.json", "repositories.json", "repository.json"] {
        let json: serde_json::Value = serde_json::from_str(&load_fixture(name)).unwrap();
        assert!(ErrorEnvelope::from_body(&json).is_none(), "{}", name);
    }
}

#[test]
fn deserialize_missing_required_fields_returns_error() {
    let json = r#"{"data": {"name": "no id or email"}}"#;
    let result = serde_json::from_str::<Response<User>>(json);
    assert!(result.is_err());
}

#[test]
fn deserialize_unknown_provider_returns_error() {
    let json = r#"{"data": {"remoteIdentifier": "1", "name": "x", "provider": "svn", "type": "Account"}}"#;
    let result = serde_json::from_str::<Response<Organization>>(json);
    assert!(result.is_err());
}

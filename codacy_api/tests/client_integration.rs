use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use codacy_api::pipeline::{ApiRequest, HttpResponse, Method, PolicyOptions, RequestPolicy};
use codacy_api::types::Provider;
use codacy_api::{
    CancellationToken, Client, ClientOptions, CursorQuery, ErrorKind, TransportError,
    TransportErrorCode,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn json_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

#[tokio::test]
async fn get_user_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(json_response(200, &load_fixture("user.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_user().await;
    assert!(result.is_ok());

    let user = result.unwrap().data;
    assert_eq!(user.id, 4242);
    assert_eq!(user.main_email, "jane@example.com");
    assert!(user.is_active);
}

#[tokio::test]
async fn sends_token_and_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("api-token", "secret-token"))
        .and(header("user-agent", "codacy-tests/0.1"))
        .and(header("accept", "application/json"))
        .respond_with(json_response(200, &load_fixture("user.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = ClientOptions::default()
        .with_base_url(mock_server.uri())
        .with_api_token("secret-token")
        .with_user_agent("codacy-tests/0.1");
    let client = Client::new(options).unwrap();
    assert!(client.get_user().await.is_ok());
}

#[tokio::test]
async fn list_user_organizations_with_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/organizations/gh"))
        .and(query_param("limit", "2"))
        .and(query_param("cursor", "MTAwMQ=="))
        .respond_with(json_response(200, &load_fixture("organizations.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let query = CursorQuery::default().with_limit(2).with_cursor("MTAwMQ==");
    let resp = client
        .list_user_organizations(Provider::GitHub, &query)
        .await
        .unwrap();

    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[0].name, "codacy");
    assert_eq!(resp.next_cursor(), Some("MTAwMg=="));
}

#[tokio::test]
async fn get_repository_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/gh/codacy/repositories/docs"))
        .respond_with(json_response(200, &load_fixture("repository.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let repo = client
        .get_repository(Provider::GitHub, "codacy", "docs")
        .await
        .unwrap()
        .data;
    assert_eq!(repo.display_path(), "codacy/docs");
    assert_eq!(repo.repository_id, Some(77));
}

#[tokio::test]
async fn not_found_envelope_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/gh/codacy/repositories/missing"))
        .respond_with(json_response(404, &load_fixture("error_not_found.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client
        .get_repository(Provider::GitHub, "codacy", "missing")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "Repository codacy/missing not found");
    assert_eq!(err.actions().len(), 1);
    assert_eq!(
        err.actions()[0].url.as_deref(),
        Some("https://app.codacy.com/add-repositories")
    );
    assert_eq!(err.status(), Some(404));
    assert!(err.cause().is_none());
}

#[tokio::test]
async fn payment_required_envelope_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/gl/acme"))
        .respond_with(json_response(
            402,
            &load_fixture("error_payment_required.json"),
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client
        .get_organization(Provider::GitLab, "acme")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PaymentRequired);
    assert_eq!(err.name(), "PaymentRequiredApiError");
}

#[tokio::test]
async fn unknown_tag_is_unexpected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(json_response(
            400,
            r#"{"error": "QuotaExceeded", "message": "over limit"}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(err.error_type(), "QuotaExceeded");
    assert_eq!(err.message(), "over limit");
}

#[tokio::test]
async fn server_error_without_envelope_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(err.message().contains("500"));
    let raw = err.raw_response().unwrap();
    assert_eq!(raw.body_text, "Internal Server Error");
    assert!(raw.parsed_body.is_none());
}

#[tokio::test]
async fn success_with_wrong_shape_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(json_response(200, r#"{"data": {"id": "not a number"}}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn invalid_json_is_transport_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(json_response(200, "{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportUnavailable);
    assert!(err.raw_response().is_none());
    assert_eq!(
        err.cause().map(TransportError::code),
        Some(TransportErrorCode::Parse)
    );
}

#[tokio::test]
async fn connection_refused_is_transport_unavailable() {
    // nothing listens on port 1
    let client = Client::with_base_url("http://127.0.0.1:1").unwrap();
    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportUnavailable);
    assert_eq!(
        err.cause().map(TransportError::code),
        Some(TransportErrorCode::RequestSend)
    );
}

#[tokio::test]
async fn timeout_is_transport_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            json_response(200, &load_fixture("user.json")).set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let options = ClientOptions::default()
        .with_base_url(mock_server.uri())
        .with_timeout(Duration::from_millis(100));
    let client = Client::new(options).unwrap();
    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportUnavailable);
}

#[tokio::test]
async fn cancelled_in_flight_request_is_aborted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            json_response(200, &load_fixture("user.json")).set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    let client = Client::with_base_url(&mock_server.uri())
        .unwrap()
        .with_cancellation(token.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = client.get_user().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Aborted);
    assert_eq!(err.message(), "Request was aborted.");
    assert!(err.cause().unwrap().is_aborted());
}

#[tokio::test]
async fn already_cancelled_request_never_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(json_response(200, &load_fixture("user.json")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let url = client.base_url().join("user").unwrap();
    let err = client
        .send(ApiRequest::get(url).with_abort_signal(token))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Aborted);
}

#[tokio::test]
async fn send_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/repositories"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"names": ["docs"]})))
        .respond_with(json_response(200, r#"{"data": []}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = client.endpoint(&["search", "repositories"], &codacy_api::NoQuery);
    let request =
        ApiRequest::new(Method::POST, url).with_json(serde_json::json!({"names": ["docs"]}));
    let response = client.send(request).await.unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.parsed_body, Some(serde_json::json!({"data": []})));
}

/// Adds a trace header to every request.
struct TraceHeader {
    next: Arc<dyn RequestPolicy>,
}

#[async_trait]
impl RequestPolicy for TraceHeader {
    async fn send_request(&self, request: ApiRequest) -> Result<HttpResponse, TransportError> {
        let request = request.with_header(
            "x-trace-id".parse().unwrap(),
            "trace-123".parse().unwrap(),
        );
        self.next.send_request(request).await
    }
}

#[tokio::test]
async fn custom_policy_runs_in_pipeline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("x-trace-id", "trace-123"))
        .respond_with(json_response(200, &load_fixture("user.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = ClientOptions::default()
        .with_base_url(mock_server.uri())
        .with_policy(|next: Arc<dyn RequestPolicy>, _: &PolicyOptions| {
            Arc::new(TraceHeader { next }) as Arc<dyn RequestPolicy>
        });
    let client = Client::new(options).unwrap();
    assert!(client.get_user().await.is_ok());
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(json_response(200, &load_fixture("user.json")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations/gh/missing"))
        .respond_with(json_response(
            404,
            r#"{"error": "NotFound", "message": "Organization not found"}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let (user, org) = tokio::join!(
        client.get_user(),
        client.get_organization(Provider::GitHub, "missing")
    );
    assert!(user.is_ok());
    assert_eq!(org.unwrap_err().kind(), ErrorKind::NotFound);
}

//! Integration tests for ApiGateway using wiremock.

use clubh2h::data::ingest::ApiTeamEntry;
use clubh2h::data::{ApiGateway, ApiRequest, Credential, Team, TeamId};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> ApiGateway {
    ApiGateway::new(server.uri(), Credential::ApiSports { key: "secret".into() })
}

#[tokio::test]
async fn test_returns_response_field_and_sends_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .and(header("x-apisports-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "get": "countries",
            "errors": [],
            "results": 1,
            "response": [{"name": "England", "code": "GB", "flag": null}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let value = gateway_for(&mock_server)
        .fetch_data(&ApiRequest::Countries)
        .await
        .expect("Should return data");

    assert_eq!(value, json!([{"name": "England", "code": "GB", "flag": null}]));
}

#[tokio::test]
async fn test_rapidapi_credential_sends_both_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams"))
        .and(query_param("country", "Spain"))
        .and(header("x-rapidapi-key", "secret"))
        .and(header("x-rapidapi-host", "v3.football.api-sports.io"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = ApiGateway::new(
        mock_server.uri(),
        Credential::RapidApi {
            key: "secret".into(),
            host: "v3.football.api-sports.io".into(),
        },
    );
    let value = gateway
        .fetch_data(&ApiRequest::TeamsByCountry { country: "Spain".into() })
        .await;

    assert_eq!(value, Some(json!([])));
}

#[tokio::test]
async fn test_payload_without_response_field_is_returned_whole() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams"))
        .and(query_param("league", "39"))
        .and(query_param("season", "2023"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paging": {"current": 1}})))
        .mount(&mock_server)
        .await;

    let value = gateway_for(&mock_server)
        .fetch_data(&ApiRequest::TeamsByLeague { league: 39, season: 2023 })
        .await;

    assert_eq!(value, Some(json!({"paging": {"current": 1}})));
}

#[tokio::test]
async fn test_server_error_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let value = gateway_for(&mock_server).fetch_data(&ApiRequest::Countries).await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_rate_limited_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let value = gateway_for(&mock_server).fetch_data(&ApiRequest::Countries).await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_application_error_payload_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": {"token": "Error/Missing application key."},
            "response": []
        })))
        .mount(&mock_server)
        .await;

    let value = gateway_for(&mock_server).fetch_data(&ApiRequest::Countries).await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_non_json_body_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let value = gateway_for(&mock_server).fetch_data(&ApiRequest::Countries).await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_unreachable_server_yields_none() {
    let mock_server = MockServer::start().await;
    let gateway = gateway_for(&mock_server);
    drop(mock_server);

    let value = gateway.fetch_data(&ApiRequest::Countries).await;

    assert!(value.is_none());
}

#[tokio::test]
async fn test_typed_fetch_normalizes_teams() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "response": [{"team": {"id": 42, "name": "Arsenal"}, "venue": {"name": "Emirates Stadium"}}]
        })))
        .mount(&mock_server)
        .await;

    let entries: Vec<ApiTeamEntry> = gateway_for(&mock_server)
        .fetch(&ApiRequest::TeamsByCountry { country: "England".into() })
        .await
        .expect("Should decode");
    let teams: Vec<Team> = entries.into_iter().map(Team::from).collect();

    assert_eq!(teams[0].id, TeamId(42));
    assert_eq!(
        teams[0].venue.as_ref().and_then(|v| v.name.as_deref()),
        Some("Emirates Stadium")
    );
}

#[tokio::test]
async fn test_typed_fetch_with_wrong_shape_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": [{"id": 1}]})))
        .mount(&mock_server)
        .await;

    let entries: Option<Vec<ApiTeamEntry>> = gateway_for(&mock_server)
        .fetch(&ApiRequest::TeamsByCountry { country: "England".into() })
        .await;

    assert!(entries.is_none());
}

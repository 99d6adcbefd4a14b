//! API-Football gateway
//!
//! The only component that talks to the network. Every request is a typed
//! [`ApiRequest`]; every failure (transport, HTTP status, API error payload,
//! undecodable body) is logged here and collapses into `None` for the caller.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::TeamId;

/// Base URL for the API-Football v3 API
pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io/";

/// Host header value expected by the RapidAPI proxy
pub const DEFAULT_RAPIDAPI_HOST: &str = "v3.football.api-sports.io";

/// Errors that can occur when fetching from the API
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network failure or unreadable body
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Rejected credentials or exhausted daily quota
    #[error("Access error: status {0}. Check your API key or daily limits")]
    AccessDenied(StatusCode),

    /// Any other non-success status
    #[error("HTTP error: status {0}")]
    Status(StatusCode),

    /// Well-formed response carrying an `errors` payload
    #[error("API error: {0}")]
    Application(String),

    /// Body was not the expected JSON
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How the static API key is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// RapidAPI proxy: `x-rapidapi-key` and `x-rapidapi-host`
    RapidApi { key: String, host: String },
    /// Direct API-Sports access: `x-apisports-key`
    ApiSports { key: String },
}

impl Credential {
    /// Header pairs attached to every request
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        match self {
            Credential::RapidApi { key, host } => {
                vec![("x-rapidapi-key", key.as_str()), ("x-rapidapi-host", host.as_str())]
            }
            Credential::ApiSports { key } => vec![("x-apisports-key", key.as_str())],
        }
    }
}

/// The read requests the application makes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// All countries known to the API
    Countries,
    /// Clubs of one country
    TeamsByCountry { country: String },
    /// Clubs of one league season
    TeamsByLeague { league: u32, season: u16 },
    /// Every recorded fixture between two clubs
    HeadToHead { team_a: TeamId, team_b: TeamId },
}

impl ApiRequest {
    /// Endpoint path relative to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            ApiRequest::Countries => "countries",
            ApiRequest::TeamsByCountry { .. } | ApiRequest::TeamsByLeague { .. } => "teams",
            ApiRequest::HeadToHead { .. } => "fixtures/headtohead",
        }
    }

    /// Query string parameters
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            ApiRequest::Countries => Vec::new(),
            ApiRequest::TeamsByCountry { country } => vec![("country", country.clone())],
            ApiRequest::TeamsByLeague { league, season } => {
                vec![("league", league.to_string()), ("season", season.to_string())]
            }
            ApiRequest::HeadToHead { team_a, team_b } => {
                vec![("h2h", format!("{}-{}", team_a, team_b))]
            }
        }
    }

    /// Key under which the response is cached
    pub fn cache_key(&self) -> String {
        match self {
            ApiRequest::Countries => "countries_list".to_string(),
            ApiRequest::TeamsByCountry { country } => format!("teams_{}", country),
            ApiRequest::TeamsByLeague { league, season } => format!("teams_{}_{}", league, season),
            ApiRequest::HeadToHead { team_a, team_b } => format!("h2h_{}_{}", team_a, team_b),
        }
    }
}

/// Client for the API-Football REST API
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
    credential: Credential,
}

impl ApiGateway {
    /// Creates a gateway against `base_url` with a default HTTP client
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self::with_client(Client::new(), base_url, credential)
    }

    /// Creates a gateway with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>, credential: Credential) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client,
            base_url,
            credential,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs `request` and returns the `response` field of the payload
    ///
    /// Returns the whole payload when it has no `response` field, and `None`
    /// on any failure. Failures are logged, never returned.
    pub async fn fetch_data(&self, request: &ApiRequest) -> Option<Value> {
        match self.try_fetch(request).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(endpoint = request.path(), error = %e, "error fetching data");
                None
            }
        }
    }

    /// Like [`fetch_data`](Self::fetch_data), then decodes the payload into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Option<T> {
        let value = self.fetch_data(request).await?;
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::error!(endpoint = request.path(), error = %e, "unexpected response shape");
                None
            }
        }
    }

    async fn try_fetch(&self, request: &ApiRequest) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, request.path());
        tracing::debug!(%url, query = ?request.query(), "GET");

        let mut builder = self.client.get(&url).query(&request.query());
        for (name, value) in self.credential.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::AccessDenied(status));
        }
        if !status.is_success() {
            return Err(GatewayError::Status(status));
        }

        let text = response.text().await?;
        let mut json: Value = serde_json::from_str(&text)?;

        if let Some(errors) = application_errors(&json) {
            return Err(GatewayError::Application(errors));
        }

        if json.get("response").is_some_and(|r| !r.is_null()) {
            Ok(json["response"].take())
        } else {
            Ok(json)
        }
    }
}

/// Returns the serialized `errors` field when it is a non-empty object or array
fn application_errors(json: &Value) -> Option<String> {
    let errors = json.get("errors")?;
    let present = match errors {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => false,
    };
    present.then(|| errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_paths() {
        assert_eq!(ApiRequest::Countries.path(), "countries");
        assert_eq!(
            ApiRequest::TeamsByCountry { country: "England".into() }.path(),
            "teams"
        );
        assert_eq!(ApiRequest::TeamsByLeague { league: 39, season: 2023 }.path(), "teams");
        assert_eq!(
            ApiRequest::HeadToHead { team_a: TeamId(42), team_b: TeamId(49) }.path(),
            "fixtures/headtohead"
        );
    }

    #[test]
    fn test_request_queries() {
        assert!(ApiRequest::Countries.query().is_empty());
        assert_eq!(
            ApiRequest::TeamsByLeague { league: 39, season: 2023 }.query(),
            vec![("league", "39".to_string()), ("season", "2023".to_string())]
        );
        assert_eq!(
            ApiRequest::HeadToHead { team_a: TeamId(42), team_b: TeamId(49) }.query(),
            vec![("h2h", "42-49".to_string())]
        );
    }

    #[test]
    fn test_request_cache_keys() {
        assert_eq!(ApiRequest::Countries.cache_key(), "countries_list");
        assert_eq!(
            ApiRequest::TeamsByCountry { country: "Spain".into() }.cache_key(),
            "teams_Spain"
        );
        assert_eq!(
            ApiRequest::TeamsByLeague { league: 78, season: 2023 }.cache_key(),
            "teams_78_2023"
        );
        assert_eq!(
            ApiRequest::HeadToHead { team_a: TeamId(42), team_b: TeamId(49) }.cache_key(),
            "h2h_42_49"
        );
    }

    #[test]
    fn test_credential_headers() {
        let rapid = Credential::RapidApi {
            key: "secret".into(),
            host: DEFAULT_RAPIDAPI_HOST.into(),
        };
        assert_eq!(
            rapid.headers(),
            vec![("x-rapidapi-key", "secret"), ("x-rapidapi-host", DEFAULT_RAPIDAPI_HOST)]
        );

        let direct = Credential::ApiSports { key: "secret".into() };
        assert_eq!(direct.headers(), vec![("x-apisports-key", "secret")]);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let gateway = ApiGateway::new(
            "http://localhost:1234",
            Credential::ApiSports { key: "k".into() },
        );
        assert_eq!(gateway.base_url(), "http://localhost:1234/");
    }

    #[test]
    fn test_application_errors_detection() {
        assert!(application_errors(&json!({"errors": []})).is_none());
        assert!(application_errors(&json!({"errors": {}})).is_none());
        assert!(application_errors(&json!({"response": []})).is_none());

        let errors = application_errors(&json!({"errors": {"token": "Error/Missing application key"}}));
        assert!(errors.unwrap().contains("Missing application key"));

        assert!(application_errors(&json!({"errors": ["bad"]})).is_some());
    }

    #[test]
    fn test_access_denied_message_mentions_limits() {
        let err = GatewayError::AccessDenied(StatusCode::TOO_MANY_REQUESTS);
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("daily limits"));
    }
}

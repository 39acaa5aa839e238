//! HTTP implementation of the key service client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{ApiKey, ApiKeyId, DomainError, KeyServiceClient, QuotaConfig};

#[derive(Debug, Deserialize)]
struct KeysResponse {
    #[serde(default)]
    keys: Vec<ApiKey>,
}

#[derive(Debug, Deserialize)]
struct KeyResponse {
    key: ApiKey,
}

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    config: QuotaConfig,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateKeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateKeyRequest<'a> {
    name: &'a str,
}

/// Key service client speaking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpKeyServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpKeyServiceClient {
    /// Create a client for the service rooted at `base_url` (e.g. `http://host/api`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client with a request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::remote(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and return the raw body of a successful response
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, DomainError> {
        let url = self.url(endpoint);
        debug!("Key service request: {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Key service request failed: {} {}: {}", method, url, e);
            DomainError::remote(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::remote(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error = error_from_response(status, &bytes);
            warn!("Key service returned {} for {} {}: {}", status, method, url, error);
            return Err(error);
        }

        Ok(bytes.to_vec())
    }

    async fn request_json<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, DomainError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.send(method, endpoint, body).await?;

        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::remote(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl KeyServiceClient for HttpKeyServiceClient {
    async fn list_keys(&self) -> Result<Vec<ApiKey>, DomainError> {
        let response: KeysResponse = self
            .request_json(Method::GET, "/keys", None::<&()>)
            .await?;
        Ok(response.keys)
    }

    async fn create_key(&self, name: Option<String>) -> Result<ApiKey, DomainError> {
        let body = CreateKeyRequest { name };
        let response: KeyResponse = self
            .request_json(Method::POST, "/keys", Some(&body))
            .await?;
        Ok(response.key)
    }

    async fn update_key(&self, id: &ApiKeyId, name: &str) -> Result<ApiKey, DomainError> {
        let body = UpdateKeyRequest { name };
        let response: KeyResponse = self
            .request_json(Method::PUT, &key_path(id), Some(&body))
            .await?;
        Ok(response.key)
    }

    async fn delete_key(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        // Acknowledgement body, if any, carries nothing the client needs
        self.send(Method::DELETE, &key_path(id), None::<&()>)
            .await?;
        Ok(())
    }

    async fn get_config(&self) -> Result<QuotaConfig, DomainError> {
        let response: ConfigResponse = self
            .request_json(Method::GET, "/config", None::<&()>)
            .await?;
        Ok(response.config)
    }
}

/// `/keys/{id}` with the id percent-encoded as a single path segment
fn key_path(id: &ApiKeyId) -> String {
    format!("/keys/{}", urlencoding::encode(id.as_str()))
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Error for a non-2xx response: the body's `error` field, else the status
fn error_from_response(status: StatusCode, body: &[u8]) -> DomainError {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .filter(|message| !message.is_empty())
        .map(DomainError::remote)
        .unwrap_or_else(|| DomainError::http_status(status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "key": format!("ak_{}", id),
            "name": name,
            "expirationDate": 1_700_000_000_000_i64,
            "createdAt": 1_698_704_000_000_i64,
            "isActive": true
        })
    }

    async fn setup() -> (MockServer, HttpKeyServiceClient) {
        let server = MockServer::start().await;
        let client = HttpKeyServiceClient::new(format!("{}/api/", server.uri()));
        (server, client)
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let client = HttpKeyServiceClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/keys"), "http://localhost:5000/api/keys");
    }

    #[test]
    fn test_key_path_encodes_id() {
        assert_eq!(key_path(&ApiKeyId::new("k1").unwrap()), "/keys/k1");
        assert_eq!(
            key_path(&ApiKeyId::new("tenant 7%2Fkey").unwrap()),
            "/keys/tenant%207%252Fkey"
        );
        assert_eq!(key_path(&ApiKeyId::new("a/b?c#d").unwrap()), "/keys/a%2Fb%3Fc%23d");
    }

    #[test]
    fn test_error_from_response_prefers_body_message() {
        let error = error_from_response(
            StatusCode::BAD_REQUEST,
            br#"{"success": false, "error": "API limit reached. You can only have 2 active keys."}"#,
        );
        assert_eq!(
            error.to_string(),
            "API limit reached. You can only have 2 active keys."
        );
    }

    #[test]
    fn test_error_from_response_falls_back_to_status() {
        assert_eq!(
            error_from_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>"),
            DomainError::http_status(502)
        );
        assert_eq!(
            error_from_response(StatusCode::NOT_FOUND, br#"{"success": false}"#),
            DomainError::http_status(404)
        );
    }

    #[tokio::test]
    async fn test_list_keys() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/keys"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "keys": [key_json("k1", "API Key 1"), key_json("k2", "API Key 2")],
                "count": 2,
                "maxKeys": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let keys = client.list_keys().await.unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].id().as_str(), "k1");
        assert_eq!(keys[1].secret(), "ak_k2");
    }

    #[tokio::test]
    async fn test_list_keys_keeps_opaque_ids() {
        let (server, client) = setup().await;
        let long_id = "x".repeat(65);

        Mock::given(method("GET"))
            .and(path("/api/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keys": [
                    key_json("k1", "API Key 1"),
                    key_json("tenant 7%2Fkey", "API Key 2"),
                    key_json(&long_id, "API Key 3")
                ]
            })))
            .mount(&server)
            .await;

        let keys = client.list_keys().await.unwrap();

        assert_eq!(keys.len(), 3);
        assert_eq!(keys[1].id().as_str(), "tenant 7%2Fkey");
        assert_eq!(keys[2].id().as_str(), long_id);
    }

    #[tokio::test]
    async fn test_list_keys_missing_field_is_empty() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        assert!(client.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_key_with_name() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/keys"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "name": "API Key 1" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "key": key_json("k1", "API Key 1"),
                "message": "New API Key generated successfully!"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let key = client.create_key(Some("API Key 1".to_string())).await.unwrap();

        assert_eq!(key.id().as_str(), "k1");
        assert_eq!(key.name(), Some("API Key 1"));
    }

    #[tokio::test]
    async fn test_create_key_without_name_sends_empty_object() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/keys"))
            .and(body_json(json!({})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "key": key_json("k1", "API Key 1") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert!(client.create_key(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_key_quota_rejection_uses_server_message() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/keys"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": "API limit reached. You can only have 2 active keys."
            })))
            .mount(&server)
            .await;

        let error = client.create_key(None).await.unwrap_err();
        assert_eq!(
            error,
            DomainError::remote("API limit reached. You can only have 2 active keys.")
        );
    }

    #[tokio::test]
    async fn test_update_key() {
        let (server, client) = setup().await;

        Mock::given(method("PUT"))
            .and(path("/api/keys/k1"))
            .and(body_json(json!({ "name": "Production" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "key": key_json("k1", "Production")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = ApiKeyId::new("k1").unwrap();
        let key = client.update_key(&id, "Production").await.unwrap();

        assert_eq!(key.name(), Some("Production"));
    }

    #[tokio::test]
    async fn test_delete_key_accepts_empty_body() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/api/keys/k1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let id = ApiKeyId::new("k1").unwrap();
        assert!(client.delete_key(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_key_encodes_id_in_path() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/api/keys/tenant%207%252Fkey"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let id = ApiKeyId::new("tenant 7%2Fkey").unwrap();
        assert!(client.delete_key(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_key_not_found() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/api/keys/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "error": "API Key not found or already inactive"
            })))
            .mount(&server)
            .await;

        let id = ApiKeyId::new("missing").unwrap();
        let error = client.delete_key(&id).await.unwrap_err();

        assert_eq!(error.to_string(), "API Key not found or already inactive");
    }

    #[tokio::test]
    async fn test_get_config() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "config": { "maxKeys": 2, "expirationDays": 15 }
            })))
            .mount(&server)
            .await;

        assert_eq!(client.get_config().await.unwrap(), QuotaConfig::new(2, 15));
    }

    #[tokio::test]
    async fn test_server_error_without_body_message() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let error = client.get_config().await.unwrap_err();
        assert_eq!(error.to_string(), "HTTP error! status: 500");
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        match client.list_keys().await.unwrap_err() {
            DomainError::RemoteRequestFailed { message } => {
                assert!(message.starts_with("Failed to parse response"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = HttpKeyServiceClient::new("http://127.0.0.1:1/api");

        match client.list_keys().await.unwrap_err() {
            DomainError::RemoteRequestFailed { message } => {
                assert!(message.starts_with("Request failed"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

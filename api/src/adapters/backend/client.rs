//! Backing API client implementation

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};

use crate::domain::entities::PlanTier;
use crate::domain::ports::BillingProvider;
use crate::error::BackendError;

/// Header identifying the signed-in user to the backend
pub const USER_ID_HEADER: &str = "x-user-id";

/// Thin HTTP wrapper over the hosted backend. No retries.
pub struct BackendClient {
    http: Client,
    base_url: String,
    session: RwLock<Option<String>>,
}

/// Error body returned by the backend (PostgREST shape)
#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct PlanResponse {
    plan: String,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        }
    }

    pub fn with_session(self, user_id: impl Into<String>) -> Self {
        self.set_session(Some(user_id.into()));
        self
    }

    pub fn set_session(&self, user_id: Option<String>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = user_id;
    }

    pub fn clear_session(&self) {
        self.set_session(None);
    }

    pub fn session(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, tagging it with the session user when there is one
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.api_url(path));
        match self.session() {
            Some(user_id) => builder.header(USER_ID_HEADER, user_id),
            None => builder,
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| BackendError::Deserialization(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => (body.code, body.message.or(body.error).unwrap_or(text)),
            Err(_) => (None, text),
        };
        Err(BackendError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.request(Method::GET, path).send().await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl BillingProvider for BackendClient {
    fn begin_session(&self, user_id: &str) {
        self.set_session(Some(user_id.to_string()));
    }

    fn end_session(&self) {
        self.clear_session();
    }

    async fn fetch_plan(&self) -> Result<PlanTier, BackendError> {
        let response: PlanResponse = self.get_json("/billing/plan").await?;
        Ok(response.plan.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_session_has_no_user_header() {
        let client = BackendClient::new("http://localhost:3001/".to_string());
        let request = client.request(Method::GET, "/billing/plan").build().unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:3001/billing/plan");
        assert!(request.headers().get(USER_ID_HEADER).is_none());
    }

    #[test]
    fn request_with_session_carries_user_header() {
        let client = BackendClient::new("http://localhost:3001".to_string()).with_session("user-42");
        let request = client.request(Method::POST, "/projects").build().unwrap();

        assert_eq!(
            request.headers().get(USER_ID_HEADER).unwrap().to_str().unwrap(),
            "user-42"
        );
    }

    #[test]
    fn ending_session_removes_header() {
        let client = BackendClient::new("http://localhost:3001".to_string());
        client.begin_session("user-42");
        assert_eq!(client.session().as_deref(), Some("user-42"));

        client.end_session();
        let request = client.request(Method::GET, "/billing/plan").build().unwrap();
        assert!(request.headers().get(USER_ID_HEADER).is_none());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transient() {
        // Bind then release an ephemeral port so nothing is listening on it
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let client = BackendClient::new(format!("http://{}", addr));
        let err = client.fetch_plan().await.unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Transient);
    }
}

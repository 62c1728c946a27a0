//! Outbound boundary to the remote registration/matching service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::RegistrationConfig;

use super::super::domain::Role;
use super::payload::{MenteeRegistration, MentorRegistration};

/// What the remote service answered on success: any 2xx with a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationReceipt {
    pub status: u16,
    pub body: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Boundary to the registration endpoints so the submission path can be
/// exercised without network access.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn register_mentor(
        &self,
        payload: &MentorRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError>;

    async fn register_mentee(
        &self,
        payload: &MenteeRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError>;
}

/// HTTP client POSTing JSON bodies to `<base>/mentor/register` and
/// `<base>/mentee/register`.
#[derive(Debug, Clone)]
pub struct HttpRegistrationClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRegistrationClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, RegistrationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RegistrationError::Transport(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &RegistrationConfig) -> Result<Self, RegistrationError> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    async fn post<P: Serialize + Sync>(
        &self,
        role: Role,
        payload: &P,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let url = format!("{}/{}/register", self.base_url, role.label());
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|err| RegistrationError::Transport(err.to_string()))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            Ok(RegistrationReceipt {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(RegistrationError::Rejected {
                status: status.as_u16(),
                message: render_detail(&body, status.as_u16()),
            })
        }
    }
}

#[async_trait]
impl RegistrationGateway for HttpRegistrationClient {
    async fn register_mentor(
        &self,
        payload: &MentorRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.post(Role::Mentor, payload).await
    }

    async fn register_mentee(
        &self,
        payload: &MenteeRegistration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.post(Role::Mentee, payload).await
    }
}

/// Turn an error body into the single string shown to the applicant.
///
/// A bare-string `detail` is rendered verbatim. A structured
/// `{ detail: { errors: { field: [msg, …] } } }` body is flattened to a
/// space-joined message. Anything else falls back to a generic line
/// carrying the HTTP status.
pub fn render_detail(body: &Value, status: u16) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Object(detail)) => {
            if let Some(Value::Object(errors)) = detail.get("errors") {
                let messages: Vec<String> = errors
                    .values()
                    .flat_map(|entry| match entry {
                        Value::Array(items) => items
                            .iter()
                            .filter_map(|item| item.as_str().map(str::to_string))
                            .collect::<Vec<_>>(),
                        Value::String(message) => vec![message.clone()],
                        _ => Vec::new(),
                    })
                    .collect();
                if !messages.is_empty() {
                    return messages.join(" ");
                }
            }
            Value::Object(detail.clone()).to_string()
        }
        _ => format!("registration failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_detail_is_rendered_verbatim() {
        let body = json!({ "detail": "email already registered" });
        assert_eq!(render_detail(&body, 422), "email already registered");
    }

    #[test]
    fn structured_errors_are_flattened() {
        let body = json!({
            "detail": {
                "errors": {
                    "email": ["Email is invalid."],
                    "zipcode": ["Zip code must be 5 digits."],
                }
            }
        });
        let rendered = render_detail(&body, 422);
        assert!(rendered.contains("Email is invalid."));
        assert!(rendered.contains("Zip code must be 5 digits."));
    }

    #[test]
    fn missing_detail_falls_back_to_status_line() {
        assert_eq!(
            render_detail(&Value::Null, 500),
            "registration failed with status 500"
        );
    }
}

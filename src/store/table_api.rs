use crate::config::TableApiConfig;
use crate::error::{AppError, Result};
use crate::models::Incident;
use crate::store::{IncidentStore, Query};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Fields requested on every read so that records deserialize fully
const INCIDENT_FIELDS: &str = "sys_id,number,short_description,description,category,\
                               subcategory,priority,cmdb_ci,state,close_notes,work_notes,opened_at";

/// Incident store backed by the ServiceNow Table API
#[derive(Clone, Debug)]
pub struct TableApiStore {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

/// Table API responses wrap the payload in a `result` key; single-record
/// fetches normally return an object but some gateways hand back a
/// one-element list
#[derive(Debug, Deserialize)]
struct Envelope {
    result: ResultPayload,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultPayload {
    One(Box<Incident>),
    Many(Vec<Incident>),
}

impl TableApiStore {
    /// Create a store client with explicit credentials
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let username = username.into();
        let password = password.into();

        if base_url.is_empty() {
            return Err(AppError::Configuration(
                "table_api.base_url is not set".to_string(),
            ));
        }
        if username.is_empty() {
            return Err(AppError::Configuration(
                "table_api.username is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
        })
    }

    /// Create a store client from configuration, resolving the password
    /// from the environment variable the config names
    pub fn from_config(config: &TableApiConfig) -> Result<Self> {
        let password = std::env::var(&config.password_env).map_err(|_| {
            AppError::Configuration(format!(
                "Environment variable {} is not set",
                config.password_env
            ))
        })?;

        Self::new(
            config.base_url.clone(),
            config.username.clone(),
            password,
            config.request_timeout_secs,
        )
    }

    fn table_url(&self) -> String {
        format!("{}/api/now/table/incident", self.base_url)
    }

    fn record_url(&self, sys_id: &str) -> String {
        format!("{}/{}", self.table_url(), sys_id)
    }

    /// Issue a GET and decode the `result` envelope, surfacing upstream
    /// status and body on non-success responses
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<ResultPayload> {
        debug!(url = %url, "Table API request");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| String::new());

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Incident not found".to_string()));
        }

        if !status.is_success() {
            return Err(AppError::Upstream {
                source_name: "table_api".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl IncidentStore for TableApiStore {
    async fn get_incident(&self, sys_id: &str) -> Result<Incident> {
        let url = self.record_url(sys_id);
        let payload = self
            .fetch(&url, &[("sysparm_fields", INCIDENT_FIELDS)])
            .await?;

        match payload {
            ResultPayload::One(incident) => Ok(*incident),
            ResultPayload::Many(incidents) => incidents
                .into_iter()
                .next()
                .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", sys_id))),
        }
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Incident>> {
        let encoded = format!("number={}", number);
        let payload = self
            .fetch(
                &self.table_url(),
                &[
                    ("sysparm_query", encoded.as_str()),
                    ("sysparm_limit", "1"),
                    ("sysparm_fields", INCIDENT_FIELDS),
                ],
            )
            .await?;

        let first = match payload {
            ResultPayload::One(incident) => Some(*incident),
            ResultPayload::Many(incidents) => incidents.into_iter().next(),
        };
        Ok(first)
    }

    async fn query(&self, query: &Query, limit: usize) -> Result<Vec<Incident>> {
        let encoded = query.to_encoded();
        let limit = limit.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("sysparm_limit", limit.as_str()),
            ("sysparm_fields", INCIDENT_FIELDS),
        ];
        if !encoded.is_empty() {
            params.push(("sysparm_query", encoded.as_str()));
        }

        let payload = self.fetch(&self.table_url(), &params).await?;

        Ok(match payload {
            ResultPayload::One(incident) => vec![*incident],
            ResultPayload::Many(incidents) => incidents,
        })
    }

    async fn append_work_notes(&self, sys_id: &str, text: &str) -> Result<()> {
        let url = self.record_url(sys_id);
        debug!(url = %url, bytes = text.len(), "Appending work notes");

        let response = self
            .client
            .patch(&url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
            .json(&json!({ "work_notes": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(AppError::Upstream {
                source_name: "table_api".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(sys_id = %sys_id, "Work notes updated");
        Ok(())
    }
}

use crate::models::{Contact, Persona};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub personas: String,
    pub contacts: String,
}

/// Supabase (PostgREST) client
///
/// Read-only access to the persona and contact tables; match results are
/// never persisted by this service, they are recomputed per request.
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(base_url: String, api_key: String, tables: SupabaseTables) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
            tables,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            table
        )
    }

    /// Fetch a single persona by id
    pub async fn get_persona(&self, persona_id: &str) -> Result<Persona, SupabaseError> {
        let url = self.table_url(&self.tables.personas);

        tracing::debug!("Fetching persona {} from {}", persona_id, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("id", format!("eq.{persona_id}")),
                ("select", "*".to_string()),
            ])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Failed to fetch persona: {}",
                response.status()
            )));
        }

        let rows: Vec<Value> = response.json().await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("Persona {persona_id} not found")))?;

        serde_json::from_value(row)
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse persona: {e}")))
    }

    /// Fetch every contact belonging to a project
    ///
    /// Rows that fail to parse are skipped instead of failing the whole
    /// fetch; a partially imported contact should not block a match run.
    pub async fn list_contacts(&self, project_id: &str) -> Result<Vec<Contact>, SupabaseError> {
        let url = self.table_url(&self.tables.contacts);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("project_id", format!("eq.{project_id}")),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Failed to list contacts: {}",
                response.status()
            )));
        }

        let rows: Vec<Value> = response.json().await?;
        let total = rows.len();

        let contacts: Vec<Contact> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();

        if contacts.len() < total {
            tracing::warn!(
                "Skipped {} malformed contact rows for project {}",
                total - contacts.len(),
                project_id
            );
        }

        tracing::debug!(
            "Fetched {} contacts for project {}",
            contacts.len(),
            project_id
        );

        Ok(contacts)
    }

    /// Health check for the PostgREST endpoint
    pub async fn health_check(&self) -> Result<bool, SupabaseError> {
        let url = format!("{}/rest/v1/", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

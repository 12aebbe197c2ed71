use crate::models::{Contact, Persona, RemoteMatch};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the AI scoring endpoint
#[derive(Debug, Error)]
pub enum RemoteScoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Best-effort AI scoring client.
///
/// Asks an OpenAI-compatible chat-completions endpoint to score every
/// contact against the persona. The caller treats any failure here as
/// "remote unavailable" and proceeds with local-only scoring; nothing in
/// this client is load-bearing for correctness.
pub struct RemoteScorer {
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

const SYSTEM_PROMPT: &str = "You are an expert at matching customer personas with real individuals based on demographic and psychographic data.\n\n\
MATCHING GUIDELINES:\n\
- Prioritize interests, behaviors, and psychographic alignment over strict demographic matching\n\
- When demographic data is limited or missing, focus on available interests and behaviors\n\
- Moderate age differences should not heavily penalize the score when interests align well\n\
- Only give low scores (below 50) when interests or goals clearly mismatch\n\n\
Return a JSON object of the form:\n\
{\"matches\": [{\"contact_id\": \"uuid\", \"match_score\": 85, \"reasons\": [\"Strong interest alignment in fitness\"]}]}";

impl RemoteScorer {
    /// Create a new remote scorer
    pub fn new(endpoint: String, api_key: String, model: String, max_tokens: Option<u32>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            model,
            max_tokens: max_tokens.unwrap_or(3000),
            client,
        }
    }

    /// Score contacts against a persona via the AI endpoint
    ///
    /// Returns whatever parseable match entries the model produced; entries
    /// with unusable shapes are dropped, not errors.
    pub async fn score(
        &self,
        persona: &Persona,
        contacts: &[Contact],
    ) -> Result<Vec<RemoteMatch>, RemoteScoreError> {
        if contacts.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(persona, contacts) },
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteScoreError::ApiError(format!(
                "Scoring endpoint returned {}",
                response.status()
            )));
        }

        let payload: Value = response.json().await?;
        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                RemoteScoreError::InvalidResponse("Missing completion content".into())
            })?;

        let parsed: Value = serde_json::from_str(content).map_err(|e| {
            RemoteScoreError::InvalidResponse(format!("Completion is not valid JSON: {e}"))
        })?;

        let matches = extract_matches(parsed);

        tracing::debug!(
            "Remote scorer returned {} usable entries for {} contacts",
            matches.len(),
            contacts.len()
        );

        Ok(matches)
    }
}

/// Pull match entries out of the model's JSON, tolerating the shapes the
/// model is known to produce: a bare array, or an object keyed by
/// "matches", "results" or "contacts".
fn extract_matches(parsed: Value) -> Vec<RemoteMatch> {
    let entries = match parsed {
        Value::Array(entries) => entries,
        Value::Object(mut map) => ["matches", "results", "contacts"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect()
}

fn build_user_prompt(persona: &Persona, contacts: &[Contact]) -> String {
    let contact_blocks: Vec<String> = contacts
        .iter()
        .map(|c| {
            format!(
                "ID: {}\nName: {} {}\nEmail: {}\nAge Range: {}\nDemographics: {}\nInterests: {}\nBehavior: {}",
                c.id,
                c.first_name,
                c.last_name.as_deref().unwrap_or(""),
                c.email,
                c.age_range.as_deref().unwrap_or("Not specified"),
                c.demographics,
                c.interests,
                c.behavior_data,
            )
        })
        .collect();

    format!(
        "Target Persona:\nName: {}\nAge Range: {}\nDemographics: {}\nPsychographics: {}\nPain Points: {}\nGoals: {}\n\n\
Contacts to Match ({} total):\n{}\n\n\
Score each contact's match with the persona (0-100) and explain why.",
        persona.name,
        persona.age_range.as_deref().unwrap_or("Not specified"),
        persona.demographics,
        persona.psychographics,
        persona.pain_points,
        persona.goals,
        contacts.len(),
        contact_blocks.join("\n---\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_matches_from_bare_array() {
        let parsed = json!([
            {"contact_id": "a", "match_score": 80, "reasons": ["fit"]},
        ]);
        let matches = extract_matches(parsed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].contact_id, "a");
        assert_eq!(matches[0].match_score, Some(80.0));
    }

    #[test]
    fn test_extract_matches_from_wrapped_objects() {
        for key in ["matches", "results", "contacts"] {
            let parsed = json!({ key: [{"contact_id": "a", "match_score": 70}] });
            let matches = extract_matches(parsed);
            assert_eq!(matches.len(), 1, "failed for key {key}");
        }
    }

    #[test]
    fn test_extract_matches_drops_unusable_entries() {
        let parsed = json!({
            "matches": [
                {"contact_id": "good", "match_score": 70},
                {"match_score": 90},
                "not an object",
            ]
        });
        let matches = extract_matches(parsed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].contact_id, "good");
    }

    #[test]
    fn test_extract_matches_from_garbage() {
        assert!(extract_matches(json!("nope")).is_empty());
        assert!(extract_matches(json!({"unexpected": 1})).is_empty());
    }

    #[test]
    fn test_remote_match_reasons_accept_string_or_array() {
        let from_array: RemoteMatch =
            serde_json::from_value(json!({"contact_id": "a", "reasons": ["x", "y"]})).unwrap();
        assert_eq!(from_array.reason_strings(), vec!["x", "y"]);

        let from_string: RemoteMatch =
            serde_json::from_value(json!({"contact_id": "a", "reasons": "single"})).unwrap();
        assert_eq!(from_string.reason_strings(), vec!["single"]);

        let absent: RemoteMatch = serde_json::from_value(json!({"contact_id": "a"})).unwrap();
        assert!(absent.reason_strings().is_empty());
    }

    #[test]
    fn test_remote_match_reasons_are_deduplicated() {
        let repeated: RemoteMatch = serde_json::from_value(
            json!({"contact_id": "a", "reasons": ["fit", "fit", "overlap", "fit"]}),
        )
        .unwrap();
        assert_eq!(repeated.reason_strings(), vec!["fit", "overlap"]);
    }
}

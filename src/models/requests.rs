use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to match a persona against a project's contacts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "persona_id", rename = "personaId")]
    pub persona_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "project_id", rename = "projectId")]
    pub project_id: String,
    /// Minimum match score (0-100). Falls back to the configured default.
    #[validate(range(min = 0, max = 100))]
    #[serde(default, alias = "min_match_score", rename = "minMatchScore")]
    pub min_match_score: Option<u8>,
}

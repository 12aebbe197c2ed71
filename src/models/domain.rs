use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Target-customer archetype used as the matching query.
///
/// Generated upstream and persisted per project; the matcher reads it and
/// never writes it back. The nested blobs (`demographics`, `psychographics`,
/// list fields) are stored as free-form JSON in the backing table, so they
/// are modeled as `serde_json::Value` and flattened by the keyword extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub demographics: Value,
    #[serde(default)]
    pub psychographics: Value,
    #[serde(default)]
    pub goals: Value,
    #[serde(default)]
    pub pain_points: Value,
    #[serde(default)]
    pub preferred_channels: Value,
}

/// A real individual from the project's contact pool.
///
/// Owned by the caller; the matcher never mutates contacts. Every enrichment
/// field is nullable since contacts arrive from CSV imports and manual entry
/// with wildly varying completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub interests: Value,
    #[serde(default)]
    pub demographics: Value,
    #[serde(default)]
    pub behavior_data: Value,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One scored contact, recomputed fresh on every match run.
///
/// `match_score` is always within 0-100 and `reasons` is never empty: when no
/// scoring signal fired, a single fallback explanation is substituted so the
/// review UI always has something to show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub contact_id: String,
    pub contact: Contact,
    pub match_score: u8,
    pub reasons: Vec<String>,
}

/// Partial match entry returned by the AI scoring call.
///
/// Treated as untrusted input: the score may be missing entirely and
/// `reasons` may arrive as an array, a bare string, or garbage. Anything
/// unusable degrades to "no score / no reasons" rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteMatch {
    pub contact_id: String,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub reasons: Value,
}

impl RemoteMatch {
    /// Normalize the untrusted `reasons` field into a deduplicated list of
    /// strings, preserving first-seen order.
    pub fn reason_strings(&self) -> Vec<String> {
        let reasons: Vec<String> = match &self.reasons {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str())
                .filter(|reason| !reason.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Value::String(reason) if !reason.trim().is_empty() => {
                vec![reason.clone()]
            }
            _ => Vec::new(),
        };

        let mut seen = HashSet::new();
        reasons
            .into_iter()
            .filter(|reason| seen.insert(reason.clone()))
            .collect()
    }
}

/// Heuristic scoring weights.
///
/// Age and keyword overlap dominate since they are the strongest behavioral
/// predictors available from sparse contact records; the channel, industry
/// and pain point bonuses are smaller additive signals that reward richer
/// contact data without swamping the primary ones. The base score keeps
/// every contact rankable even with no data overlap.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub base: f64,
    pub age_overlap: f64,
    pub age_exact: f64,
    pub keyword_floor: f64,
    pub keyword_step: f64,
    pub keyword_cap: f64,
    pub channel: f64,
    pub industry: f64,
    pub pain_point: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 10.0,
            age_overlap: 30.0,
            age_exact: 28.0,
            keyword_floor: 25.0,
            keyword_step: 5.0,
            keyword_cap: 40.0,
            channel: 10.0,
            industry: 12.0,
            pain_point: 8.0,
        }
    }
}

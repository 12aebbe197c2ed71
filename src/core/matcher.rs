use crate::core::scoring::{score_contact, PersonaSignals};
use crate::models::{Contact, MatchResult, Persona, RemoteMatch, ScoringWeights};
use std::collections::HashMap;

/// When no contact clears the threshold, fall back to at most this many of
/// the best available candidates.
const FALLBACK_LIMIT: usize = 10;

/// Matching engine: deterministic local heuristic scoring plus a merge of
/// best-effort remote (AI-sourced) partial scores into one ranked,
/// deduplicated result set.
///
/// The engine is pure and synchronous; fetching inputs and issuing the
/// remote scoring call are the caller's concern.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    weights: ScoringWeights,
}

impl MatchEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Score every contact against the persona.
    ///
    /// Deterministic and total: exactly one result per input contact, each
    /// with a score in [0, 100] and at least one reason.
    pub fn score_contacts(&self, persona: &Persona, contacts: &[Contact]) -> Vec<MatchResult> {
        let signals = PersonaSignals::from_persona(persona);
        contacts
            .iter()
            .map(|contact| score_contact(&signals, contact, &self.weights))
            .collect()
    }

    /// Merge remote and local scores into one entry per contact id.
    ///
    /// Remote entries are processed first; entries naming an unknown contact
    /// id are skipped. On a repeated contact id a strictly higher score
    /// replaces the existing score and reasons; a lower or equal one keeps
    /// the existing score and only unions in reasons not already present.
    /// The result is sorted by score descending, ties keeping
    /// first-encounter order.
    pub fn merge(
        &self,
        remote: &[RemoteMatch],
        local: Vec<MatchResult>,
        contacts: &[Contact],
    ) -> Vec<MatchResult> {
        let by_id: HashMap<&str, &Contact> =
            contacts.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut order: Vec<String> = Vec::new();
        let mut merged: HashMap<String, MatchResult> = HashMap::new();

        for remote_match in remote {
            let Some(contact) = by_id.get(remote_match.contact_id.as_str()) else {
                continue;
            };
            upsert(
                &mut order,
                &mut merged,
                MatchResult {
                    contact_id: remote_match.contact_id.clone(),
                    contact: (*contact).clone(),
                    match_score: clamp_score(remote_match.match_score.unwrap_or(0.0)),
                    reasons: remote_match.reason_strings(),
                },
            );
        }

        for local_match in local {
            if !by_id.contains_key(local_match.contact_id.as_str()) {
                continue;
            }
            upsert(&mut order, &mut merged, local_match);
        }

        let mut results: Vec<MatchResult> = order
            .iter()
            .filter_map(|contact_id| merged.remove(contact_id))
            .collect();
        // Stable sort keeps first-encounter order for equal scores.
        results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        results
    }

    /// Threshold filter with a best-effort fallback.
    ///
    /// Returns every entry at or above `min_score`; when nothing clears the
    /// bar, returns the top candidates instead so a strict threshold never
    /// yields an empty review list while contacts exist.
    pub fn select_for_sending(&self, merged: Vec<MatchResult>, min_score: u8) -> Vec<MatchResult> {
        if merged.is_empty() {
            return merged;
        }

        if merged.iter().any(|m| m.match_score >= min_score) {
            merged
                .into_iter()
                .filter(|m| m.match_score >= min_score)
                .collect()
        } else {
            let keep = merged.len().min(FALLBACK_LIMIT);
            merged.into_iter().take(keep).collect()
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn upsert(order: &mut Vec<String>, merged: &mut HashMap<String, MatchResult>, entry: MatchResult) {
    match merged.get_mut(&entry.contact_id) {
        None => {
            order.push(entry.contact_id.clone());
            merged.insert(entry.contact_id.clone(), entry);
        }
        Some(existing) => {
            if entry.match_score > existing.match_score {
                existing.match_score = entry.match_score;
                existing.reasons = entry.reasons;
            } else {
                for reason in entry.reasons {
                    if !existing.reasons.contains(&reason) {
                        existing.reasons.push(reason);
                    }
                }
            }
        }
    }
}

fn clamp_score(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

use crate::core::age_range::{parse_age_range, ranges_overlap, AgeRange};
use crate::core::keywords::{collect_keywords, dedup_keywords, tokenize};
use crate::models::{Contact, MatchResult, Persona, ScoringWeights};
use serde_json::Value;
use std::collections::HashSet;

/// Reason attached when no scoring signal fired for a contact.
pub const FALLBACK_REASON: &str = "Limited data available; included for manual review.";

/// Persona-side signal sets, built once per match run and reused for every
/// contact. Keyword lists keep first-seen order so reason strings are
/// deterministic.
#[derive(Debug, Clone)]
pub struct PersonaSignals {
    pub keywords: Vec<String>,
    pub channels: Vec<String>,
    pub industries: Vec<String>,
    pub pain_points: Vec<String>,
    pub age_range: Option<AgeRange>,
    pub age_label: String,
}

impl PersonaSignals {
    pub fn from_persona(persona: &Persona) -> Self {
        let mut keywords = Vec::new();
        keywords.extend(collect_keywords(&persona.goals));
        keywords.extend(collect_keywords(&persona.pain_points));
        keywords.extend(collect_keywords(&persona.psychographics));
        keywords.extend(collect_keywords(&persona.demographics));

        Self {
            keywords: dedup_keywords(keywords),
            channels: dedup_keywords(collect_keywords(&persona.preferred_channels)),
            industries: dedup_keywords(industry_keywords(&persona.demographics)),
            pain_points: dedup_keywords(collect_keywords(&persona.pain_points)),
            age_range: parse_age_range(persona.age_range.as_deref()),
            age_label: normalized_label(persona.age_range.as_deref()),
        }
    }
}

/// Score one contact against the persona signals.
///
/// Starts from the base score and layers on the age, keyword, channel,
/// industry and pain point signals; the final score is rounded and capped
/// at 100. Missing or malformed contact fields contribute nothing instead
/// of failing.
pub fn score_contact(
    signals: &PersonaSignals,
    contact: &Contact,
    weights: &ScoringWeights,
) -> MatchResult {
    let mut score = weights.base;
    let mut reasons: Vec<String> = Vec::new();

    // Age alignment: numeric overlap first, exact label match as fallback.
    let contact_range = parse_age_range(contact.age_range.as_deref());
    let contact_label = normalized_label(contact.age_range.as_deref());

    if ranges_overlap(signals.age_range, contact_range) {
        score += weights.age_overlap;
        reasons.push("Age range aligns with the persona focus.".to_string());
    } else if !signals.age_label.is_empty()
        && !contact_label.is_empty()
        && signals.age_label == contact_label
    {
        score += weights.age_exact;
        reasons.push("Age range matches the persona exactly.".to_string());
    }

    // Shared keyword signal across interests, demographics, behavior, notes.
    let mut contact_keywords: HashSet<String> = HashSet::new();
    contact_keywords.extend(collect_keywords(&contact.interests));
    contact_keywords.extend(collect_keywords(&contact.demographics));
    contact_keywords.extend(collect_keywords(&contact.behavior_data));
    if let Some(notes) = contact.notes.as_deref() {
        contact_keywords.extend(tokenize(notes));
    }

    let shared: Vec<&String> = signals
        .keywords
        .iter()
        .filter(|keyword| contact_keywords.contains(keyword.as_str()))
        .collect();
    if !shared.is_empty() {
        let bonus = weights
            .keyword_cap
            .min(weights.keyword_floor + shared.len() as f64 * weights.keyword_step);
        score += bonus;
        reasons.push(format!("Shared focus on {}.", join_first(&shared, 3)));
    }

    // Channel overlap against channel-like keys in behavior_data.
    let contact_channels: HashSet<String> = channel_keywords(&contact.behavior_data)
        .into_iter()
        .collect();
    let shared_channels: Vec<&String> = signals
        .channels
        .iter()
        .filter(|channel| contact_channels.contains(channel.as_str()))
        .collect();
    if !shared_channels.is_empty() {
        score += weights.channel;
        reasons.push(format!(
            "Preferred channels overlap ({}).",
            join_first(&shared_channels, 2)
        ));
    }

    // Industry / sector / profession overlap.
    let contact_industries: HashSet<String> = industry_keywords(&contact.demographics)
        .into_iter()
        .collect();
    if let Some(term) = signals
        .industries
        .iter()
        .find(|industry| contact_industries.contains(industry.as_str()))
    {
        score += weights.industry;
        reasons.push(format!("Similar industry background ({term})."));
    }

    // Persona pain points mentioned in the contact's free-text notes.
    let note_keywords: HashSet<String> = contact
        .notes
        .as_deref()
        .map(tokenize)
        .unwrap_or_default()
        .into_iter()
        .collect();
    if let Some(term) = signals
        .pain_points
        .iter()
        .find(|pain| note_keywords.contains(pain.as_str()))
    {
        score += weights.pain_point;
        reasons.push(format!("Notes mention persona pain point ({term})."));
    }

    let match_score = score.round().min(100.0).max(0.0) as u8;

    let mut reasons = dedup_keywords(reasons);
    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }

    MatchResult {
        contact_id: contact.id.clone(),
        contact: contact.clone(),
        match_score,
        reasons,
    }
}

/// Pull the industry-like sub-fields out of a demographics blob.
fn industry_keywords(demographics: &Value) -> Vec<String> {
    ["industry", "sector", "profession"]
        .iter()
        .flat_map(|key| {
            demographics
                .get(key)
                .map(collect_keywords)
                .unwrap_or_default()
        })
        .collect()
}

/// Pull channel-like sub-fields out of a behavior_data blob.
fn channel_keywords(behavior_data: &Value) -> Vec<String> {
    ["preferred_channels", "channels"]
        .iter()
        .flat_map(|key| {
            behavior_data
                .get(key)
                .map(collect_keywords)
                .unwrap_or_default()
        })
        .collect()
}

fn normalized_label(text: Option<&str>) -> String {
    text.unwrap_or("").trim().to_lowercase()
}

fn join_first(items: &[&String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(|item| item.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Persona Match - persona-to-contact matching service for survey automation
//!
//! This library scores a project's contact pool against a customer persona,
//! blending a best-effort AI scoring source with a deterministic local
//! heuristic, and merges both into one ranked, explainable result set.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{collect_keywords, parse_age_range, ranges_overlap, AgeRange, MatchEngine};
pub use models::{
    Contact, FindMatchesRequest, FindMatchesResponse, MatchResult, Persona, RemoteMatch,
    ScoringWeights,
};

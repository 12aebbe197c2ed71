// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Contact, MatchResult, Persona, RemoteMatch, ScoringWeights};
pub use requests::FindMatchesRequest;
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse};

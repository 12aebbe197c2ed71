// Core algorithm exports
pub mod age_range;
pub mod keywords;
pub mod matcher;
pub mod scoring;

pub use age_range::{parse_age_range, ranges_overlap, AgeRange};
pub use keywords::{collect_keywords, dedup_keywords, tokenize};
pub use matcher::MatchEngine;
pub use scoring::{score_contact, PersonaSignals, FALLBACK_REASON};

use regex::Regex;
use std::sync::LazyLock;

/// Open-ended ranges ("65+", "40") extend to this sentinel upper bound.
pub const OPEN_ENDED_MAX: u32 = 120;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})\D+(\d{1,3})").expect("valid age range regex"));

static LOWER_BOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})\s*\+?").expect("valid lower bound regex"));

/// Numeric age bounds parsed from a free-text label.
///
/// The parser does not enforce `min <= max`; callers treat the pair as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// Parse a free-text age range such as "25-34", "25 to 34", "65+" or "40".
///
/// Two integers separated by non-digits become `{min, max}`; a single
/// integer becomes `{n, OPEN_ENDED_MAX}`; anything else ("Gen Z", empty,
/// missing) is unparseable and yields `None`.
pub fn parse_age_range(text: Option<&str>) -> Option<AgeRange> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = RANGE_RE.captures(text) {
        let min = caps[1].parse().ok()?;
        let max = caps[2].parse().ok()?;
        return Some(AgeRange { min, max });
    }

    if let Some(caps) = LOWER_BOUND_RE.captures(text) {
        let min = caps[1].parse().ok()?;
        return Some(AgeRange {
            min,
            max: OPEN_ENDED_MAX,
        });
    }

    None
}

/// Inclusive overlap test; false when either side failed to parse.
pub fn ranges_overlap(a: Option<AgeRange>, b: Option<AgeRange>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.min <= b.max && b.min <= a.max,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_range() {
        assert_eq!(
            parse_age_range(Some("25-34")),
            Some(AgeRange { min: 25, max: 34 })
        );
    }

    #[test]
    fn test_parse_worded_range() {
        assert_eq!(
            parse_age_range(Some("25 to 34")),
            Some(AgeRange { min: 25, max: 34 })
        );
    }

    #[test]
    fn test_parse_open_ended() {
        assert_eq!(
            parse_age_range(Some("65+")),
            Some(AgeRange {
                min: 65,
                max: OPEN_ENDED_MAX
            })
        );
        assert_eq!(
            parse_age_range(Some("40")),
            Some(AgeRange {
                min: 40,
                max: OPEN_ENDED_MAX
            })
        );
    }

    #[test]
    fn test_unparseable_inputs() {
        assert_eq!(parse_age_range(Some("Gen Z")), None);
        assert_eq!(parse_age_range(Some("unspecified")), None);
        assert_eq!(parse_age_range(Some("")), None);
        assert_eq!(parse_age_range(Some("   ")), None);
        assert_eq!(parse_age_range(None), None);
    }

    #[test]
    fn test_overlap() {
        let a = parse_age_range(Some("25-34"));
        let b = parse_age_range(Some("30-40"));
        let c = parse_age_range(Some("40-50"));

        assert!(ranges_overlap(a, b));
        assert!(!ranges_overlap(a, c));
        // Inclusive at the boundary
        assert!(ranges_overlap(b, c));
    }

    #[test]
    fn test_overlap_requires_both_sides() {
        let a = parse_age_range(Some("25-34"));
        assert!(!ranges_overlap(a, None));
        assert!(!ranges_overlap(None, a));
        assert!(!ranges_overlap(None, None));
    }
}

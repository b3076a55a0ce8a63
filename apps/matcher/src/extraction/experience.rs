//! Experience Extractor — estimates total years of professional experience from free text.
//!
//! Signals are additive: every accepted "<N> years" mention and every accepted
//! year range contributes separately. Repeated mentions are not deduplicated,
//! since resumes usually state experience once per role.

use chrono::{Datelike, Utc};
use regex::Captures;

use crate::extraction::patterns::{
    word_to_number, DATE_RANGE, EXPERIENCE_MENTION, EXTENSIVE_EXPERIENCE_MARKER,
    EXTENSIVE_EXPERIENCE_YEARS, FALSE_POSITIVE_CONTEXT, FALSE_POSITIVE_WINDOW,
    NO_EXPERIENCE_MARKERS,
};

/// Total years of experience stated in `text`, resolving "present" to the current year.
///
/// Returns 0 for empty text, for explicit "fresher"/"entry-level" text, and when no
/// signal survives false-positive suppression.
pub fn extract_experience(text: &str) -> u32 {
    extract_experience_as_of(text, Utc::now().year())
}

/// Same as [`extract_experience`] with an explicit year for "present".
pub fn extract_experience_as_of(text: &str, current_year: i32) -> u32 {
    let lower = text.to_lowercase();

    if NO_EXPERIENCE_MARKERS.iter().any(|m| lower.contains(m)) {
        return 0;
    }

    let mut total: u32 = 0;

    if lower.contains(EXTENSIVE_EXPERIENCE_MARKER) {
        total += EXTENSIVE_EXPERIENCE_YEARS;
    }

    for caps in EXPERIENCE_MENTION.captures_iter(&lower) {
        let Some(whole) = caps.get(0) else { continue };
        if is_false_positive(&lower, whole.start(), whole.end()) {
            continue;
        }
        if let Some(years) = mention_years(&caps) {
            total = total.saturating_add(years);
        }
    }

    for caps in DATE_RANGE.captures_iter(&lower) {
        let Some(whole) = caps.get(0) else { continue };
        if is_false_positive(&lower, whole.start(), whole.end()) {
            continue;
        }
        if let Some(span) = range_span(&caps, current_year) {
            total = total.saturating_add(span);
        }
    }

    total
}

/// Value contributed by one "<N> years" mention, by capture shape.
fn mention_years(caps: &Captures<'_>) -> Option<u32> {
    if let Some(bare) = caps.get(1) {
        return bare.as_str().trim_end_matches('+').parse().ok();
    }
    if let Some(upper) = caps.get(3) {
        return upper.as_str().parse().ok();
    }
    if let Some(qualified) = caps.get(4) {
        return qualified.as_str().parse().ok();
    }
    caps.get(5)
        .and_then(|word| word_to_number(word.as_str()))
        .filter(|n| *n > 0)
}

/// Inclusive year span of a date range; `None` when malformed or reversed.
fn range_span(caps: &Captures<'_>, current_year: i32) -> Option<u32> {
    let start: i32 = caps.get(1)?.as_str().parse().ok()?;
    let end = match caps.get(2)?.as_str() {
        "present" => current_year,
        year => year.parse().ok()?,
    };
    u32::try_from(end - start).ok()
}

/// True if the text around `[start, end)` mentions ages, company history or education.
fn is_false_positive(text: &str, start: usize, end: usize) -> bool {
    FALSE_POSITIVE_CONTEXT.is_match(context_window(text, start, end))
}

/// The match plus up to `FALSE_POSITIVE_WINDOW` characters on each side.
fn context_window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(FALSE_POSITIVE_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(FALSE_POSITIVE_WINDOW)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2024;

    fn years(text: &str) -> u32 {
        extract_experience_as_of(text, YEAR)
    }

    #[test]
    fn test_bare_number_with_plus() {
        assert_eq!(years("5+ years of experience in backend development"), 5);
    }

    #[test]
    fn test_year_range_to() {
        assert_eq!(years("Worked at Acme from 2015 to 2019"), 4);
    }

    #[test]
    fn test_company_age_is_suppressed() {
        assert_eq!(years("The company has been around for 25 years"), 0);
    }

    #[test]
    fn test_fresher_overrides_everything() {
        assert_eq!(years("fresher, looking for first job"), 0);
        assert_eq!(
            years("Fresher. Interned 2 years, extensive experience with Python, 2018 to 2020"),
            0
        );
    }

    #[test]
    fn test_entry_level_overrides_everything() {
        assert_eq!(years("Entry-level role, 3 years of freelance work"), 0);
    }

    #[test]
    fn test_numeric_range_takes_upper_bound() {
        assert_eq!(years("We need 3-5 years of backend work"), 5);
        assert_eq!(years("Looking for 2–4 yrs hands-on"), 4);
    }

    #[test]
    fn test_qualifier_phrases() {
        assert_eq!(years("Requires at least 7 years building APIs"), 7);
        assert_eq!(years("minimum 8 years in fintech"), 8);
        assert_eq!(years("over 10 years writing Go"), 10);
    }

    #[test]
    fn test_worded_and_fuzzy_numbers() {
        assert_eq!(years("Three years as a data analyst"), 3);
        assert_eq!(years("several years of consulting"), 5);
        assert_eq!(years("a few years in retail"), 3);
    }

    #[test]
    fn test_extensive_experience_bonus() {
        assert_eq!(years("Extensive experience with distributed systems"), 10);
    }

    #[test]
    fn test_mentions_are_additive() {
        let text = "3 years at Foo as backend lead.\n\
                    Then 2 years at Bar as platform engineer lead.";
        // "engineer" is not "engineering", so neither mention is suppressed.
        assert_eq!(years(text), 5);
    }

    #[test]
    fn test_date_range_to_present() {
        assert_eq!(years("Acme Corp, Jan 2020 - present"), 4);
    }

    #[test]
    fn test_education_dates_are_suppressed() {
        assert_eq!(years("Attended university 2010 - 2014"), 0);
    }

    #[test]
    fn test_reversed_range_is_skipped() {
        assert_eq!(years("Role held 2019 to 2015"), 0);
    }

    #[test]
    fn test_age_is_suppressed() {
        assert_eq!(years("I am 29 years old and love hiking"), 0);
    }

    #[test]
    fn test_suppression_window_is_bounded() {
        let padding = "x".repeat(100);
        let text = format!("university {padding} 6 years of backend work");
        assert_eq!(years(&text), 6);
    }

    #[test]
    fn test_window_handles_multibyte_text() {
        let text = "Développeur — 4 years at Société Générale";
        assert_eq!(years(text), 4);
    }

    #[test]
    fn test_empty_text_is_zero() {
        assert_eq!(years(""), 0);
        assert_eq!(extract_experience(""), 0);
    }

    #[test]
    fn test_unparseable_number_is_skipped() {
        assert_eq!(years("99999999999 years of patience"), 0);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "5 years at A; 2016 to 2018 at B";
        assert_eq!(years(text), years(text));
        assert_eq!(years(text), 7);
    }

    #[test]
    fn test_context_window_clamps_to_text() {
        let text = "abc 5 years def";
        assert_eq!(context_window(text, 4, 11), text);
    }
}

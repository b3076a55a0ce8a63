//! Pattern Library — the static recognition rules shared by the degree and
//! experience extractors.
//!
//! Every regex here is compiled once on first use and never mutated afterwards.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::extraction::degree::DegreeRank;

// ────────────────────────────────────────────────────────────────────────────
// Degree rules
// ────────────────────────────────────────────────────────────────────────────

/// Recognition rules for a single degree category.
pub struct DegreePatterns {
    pub category: DegreeRank,
    /// Short credential codes. A hit is always a finding.
    pub abbreviations: Vec<Regex>,
    /// The spelled-out credential name, with an optional possessive.
    pub full_word: Regex,
}

/// Abbreviation source table: (pattern, case_sensitive).
/// `BE` / `ME` and their dotted forms collide with ordinary words, so they only
/// match in upper case.
const BACHELOR_ABBREVIATIONS: &[(&str, bool)] = &[
    (r"\bB\.?Sc\.?\b", false),
    (r"\bB\.E\.?\b", true),
    (r"\bBE\b", true),
    (r"\bB\.?Tech\.?\b", false),
    (r"\bB\.?A\.?\b", false),
    (r"\bB\.?S\.?\b", false),
];

const MASTER_ABBREVIATIONS: &[(&str, bool)] = &[
    (r"\bMBA\b", false),
    (r"\bM\.E\.?\b", true),
    (r"\bME\b", true),
    (r"\bM\.?Tech\.?\b", false),
    (r"\bM\.?A\.?\b", false),
    (r"\bM\.?S\.?\b", false),
    (r"\bM\.?Sc\.?\b", false),
];

const PHD_ABBREVIATIONS: &[(&str, bool)] = &[(r"\bPh\.?D\.?\b", false), (r"\bDPhil\b", false)];

const DIPLOMA_ABBREVIATIONS: &[(&str, bool)] = &[(r"\bDip\.?\b", false)];

const ASSOCIATE_ABBREVIATIONS: &[(&str, bool)] = &[
    (r"\bA\.A\.?\b", false),
    (r"\bA\.S\.?\b", false),
    (r"\bA\.A\.S\.?\b", false),
];

/// Registry in scan order. Findings at the same offset keep this order.
pub static DEGREE_PATTERNS: LazyLock<Vec<DegreePatterns>> = LazyLock::new(|| {
    vec![
        degree_rules(
            DegreeRank::Bachelor,
            BACHELOR_ABBREVIATIONS,
            r"\bBachelor(?:'s|’s)?\b",
        ),
        degree_rules(
            DegreeRank::Master,
            MASTER_ABBREVIATIONS,
            r"\bMaster(?:'s|’s)?\b",
        ),
        degree_rules(DegreeRank::Phd, PHD_ABBREVIATIONS, r"\bDoctorate\b"),
        degree_rules(
            DegreeRank::Diploma,
            DIPLOMA_ABBREVIATIONS,
            r"\b(?:PG )?Diploma\b",
        ),
        degree_rules(
            DegreeRank::Associate,
            ASSOCIATE_ABBREVIATIONS,
            r"\bAssociate(?:'s|’s)?\b",
        ),
    ]
});

/// Words that, following an ambiguous full-word credential, confirm it is a degree.
pub static DEGREE_CONTEXT_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "degree",
        "course",
        "program",
        "engineering",
        "science",
        "arts",
        "technology",
        "management",
    ]
    .into_iter()
    .collect()
});

/// Number of word tokens inspected after an ambiguous full-word match.
pub const DEGREE_CONTEXT_LOOKAHEAD: usize = 3;

pub static WORD_TOKEN: LazyLock<Regex> = LazyLock::new(|| compile(r"\b\w+\b", true));

fn degree_rules(category: DegreeRank, abbreviations: &[(&str, bool)], full: &str) -> DegreePatterns {
    DegreePatterns {
        category,
        abbreviations: abbreviations
            .iter()
            .map(|(pattern, case_sensitive)| compile(pattern, *case_sensitive))
            .collect(),
        full_word: compile(full, false),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience rules
// ────────────────────────────────────────────────────────────────────────────

/// Any of these means the author has no professional experience yet.
pub const NO_EXPERIENCE_MARKERS: &[&str] = &["fresher", "entry-level"];

pub const EXTENSIVE_EXPERIENCE_MARKER: &str = "extensive experience";
pub const EXTENSIVE_EXPERIENCE_YEARS: u32 = 10;

/// Characters inspected on each side of a match for disqualifying phrases.
pub const FALSE_POSITIVE_WINDOW: usize = 75;

/// Spelled-out numbers and fuzzy quantities.
pub const WORD_TO_NUMBER: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("twenty-five", 25),
    ("few", 3),
    ("several", 5),
];

pub fn word_to_number(word: &str) -> Option<u32> {
    WORD_TO_NUMBER
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, n)| *n)
}

/// "<N> years" in four shapes. Capture groups:
/// 1 = bare integer (optionally `+`), 2/3 = range bounds, 4 = qualified integer,
/// 5 = number word.
pub static EXPERIENCE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    let words = WORD_TO_NUMBER
        .iter()
        .map(|(w, _)| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?x)
        (?:
            (\d+\+?)
            |(\d+)\s*[-–]\s*(\d+)
            |(?:at\s+least|minimum|over|around)\s+(\d+)
            |\b({words})
        )\s*
        (?:years?|yrs?)"
    );
    compile(&pattern, false)
});

/// "2015 to 2019", "jan 2020 - present". Groups: 1 = start year, 2 = end year or "present".
pub static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?:\w{3,}\s+)?(\d{4})\s*(?:-|–|to)\s*(?:\w{3,}\s+)?(\d{4}|present)",
        false,
    )
});

/// Ages, company history and education context. Numbers near these are not
/// professional experience.
pub static FALSE_POSITIVE_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"years?\s+old|company\s+history|handled\s+a\s+project|founded\s+years|ago|company\s+has|been\s+around\s+for|education|school|college|degree|university|engineering|science|studies|institute|program|course",
        false,
    )
});

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn compile(pattern: &str, case_sensitive: bool) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(DEGREE_PATTERNS.len(), 5);
        LazyLock::force(&EXPERIENCE_MENTION);
        LazyLock::force(&DATE_RANGE);
        LazyLock::force(&FALSE_POSITIVE_CONTEXT);
        LazyLock::force(&WORD_TOKEN);
    }

    #[test]
    fn test_ambiguous_abbreviations_are_case_sensitive() {
        let bachelor = &DEGREE_PATTERNS[0];
        let be = &bachelor.abbreviations[2];
        assert!(be.is_match("Graduated with a BE in 2012"));
        assert!(!be.is_match("to be honest"));
    }

    #[test]
    fn test_word_to_number_fuzzy_terms() {
        assert_eq!(word_to_number("several"), Some(5));
        assert_eq!(word_to_number("few"), Some(3));
        assert_eq!(word_to_number("twenty-five"), Some(25));
        assert_eq!(word_to_number("dozens"), None);
    }

    #[test]
    fn test_experience_mention_prefers_range_over_bare_number() {
        let caps = EXPERIENCE_MENTION.captures("2-4 years").unwrap();
        assert!(caps.get(1).is_none());
        assert_eq!(&caps[3], "4");
    }

    #[test]
    fn test_number_word_requires_word_start() {
        assert!(EXPERIENCE_MENTION.captures("someone years").is_none());
        assert!(EXPERIENCE_MENTION.is_match("several years"));
    }

    #[test]
    fn test_false_positive_context_matches_age() {
        assert!(FALSE_POSITIVE_CONTEXT.is_match("i am 30 years old"));
        assert!(!FALSE_POSITIVE_CONTEXT.is_match("built payment systems"));
    }
}

//! Degree Extractor — finds educational credentials in free text and reports the highest.

use serde::{Deserialize, Serialize};

use crate::extraction::patterns::{
    DEGREE_CONTEXT_KEYWORDS, DEGREE_CONTEXT_LOOKAHEAD, DEGREE_PATTERNS, WORD_TOKEN,
};

/// Educational credential, ordered by rank: diploma < associate < bachelor < master < phd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeRank {
    Diploma = 1,
    Associate = 2,
    Bachelor = 3,
    Master = 4,
    Phd = 5,
}

impl DegreeRank {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DegreeRank::Diploma => "diploma",
            DegreeRank::Associate => "associate",
            DegreeRank::Bachelor => "bachelor",
            DegreeRank::Master => "master",
            DegreeRank::Phd => "phd",
        }
    }

    /// Bachelor, master and associate are also everyday words ("bachelor party").
    pub fn is_ambiguous(self) -> bool {
        matches!(
            self,
            DegreeRank::Bachelor | DegreeRank::Master | DegreeRank::Associate
        )
    }
}

impl std::fmt::Display for DegreeRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential found at a byte offset of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DegreeFinding {
    pub position: usize,
    pub category: DegreeRank,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeSummary {
    /// Every finding, in text order. Duplicates are kept.
    pub all: Vec<DegreeRank>,
    pub highest: Option<DegreeRank>,
}

/// Extracts all credentials from `text` and reduces them to a summary.
/// Never fails: text without credentials yields an empty summary.
pub fn extract_degrees(text: &str) -> DegreeSummary {
    let findings = find_degrees(text);
    let all: Vec<DegreeRank> = findings.iter().map(|f| f.category).collect();
    let highest = all.iter().copied().max();
    DegreeSummary { all, highest }
}

/// Returns every accepted credential match, sorted by offset.
pub fn find_degrees(text: &str) -> Vec<DegreeFinding> {
    let mut findings = Vec::new();

    for rules in DEGREE_PATTERNS.iter() {
        for abbreviation in &rules.abbreviations {
            findings.extend(abbreviation.find_iter(text).map(|m| DegreeFinding {
                position: m.start(),
                category: rules.category,
            }));
        }

        for m in rules.full_word.find_iter(text) {
            let possessive = m.as_str().contains('\'') || m.as_str().contains('’');
            if possessive
                || !rules.category.is_ambiguous()
                || has_degree_context(&text[m.end()..])
            {
                findings.push(DegreeFinding {
                    position: m.start(),
                    category: rules.category,
                });
            }
        }
    }

    // Stable: equal offsets keep registry order.
    findings.sort_by_key(|f| f.position);
    findings
}

/// True if one of the next few words after an ambiguous credential marks it as a degree.
fn has_degree_context(following: &str) -> bool {
    WORD_TOKEN
        .find_iter(following)
        .take(DEGREE_CONTEXT_LOOKAHEAD)
        .any(|w| DEGREE_CONTEXT_KEYWORDS.contains(w.as_str().to_lowercase().as_str()))
}

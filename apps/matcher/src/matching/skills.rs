//! Skill Distance Matcher — semantic, weighted matching of candidate skills
//! against a job's weighted requirements.
//!
//! Assignment is greedy and first-come: candidates are visited in input order and
//! each claims every still-unclaimed requirement within the distance threshold.
//! This is not an optimal bipartite assignment and must stay that way, since
//! scores depend on it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embeddings::{check_batch, cosine_distance, Embedder, EmbeddingError};

/// Maximum cosine distance (≈ 0.55 similarity) at which two skills match.
pub const DEFAULT_SKILL_MATCH_THRESHOLD: f64 = 0.45;

/// Weight used for a requirement the weight map does not know.
const DEFAULT_REQUIREMENT_WEIGHT: f64 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Skill tokens and weights
// ────────────────────────────────────────────────────────────────────────────

/// Lowercased, trimmed skill name. Compared by exact equality.
pub fn normalize_skill(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes, drops empties, and removes duplicates keeping first occurrence.
pub fn normalize_skills<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for skill in raw {
        let token = normalize_skill(skill.as_ref());
        if !token.is_empty() && !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// A job's required skills with importance weights, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>", into = "serde_json::Map<String, serde_json::Value>")]
pub struct WeightedSkillMap {
    entries: Vec<(String, f64)>,
}

impl WeightedSkillMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a requirement. Keys are normalized; a repeated key keeps its
    /// original position and takes the newer weight.
    pub fn insert(&mut self, skill: &str, weight: f64) {
        let token = normalize_skill(skill);
        if token.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((token, weight)),
        }
    }

    pub fn weight(&self, skill: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(t, _)| t == skill)
            .map(|(_, w)| *w)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.entries.iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights, the denominator of the normalized skill score.
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for WeightedSkillMap {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut map = WeightedSkillMap::new();
        for (skill, weight) in iter {
            map.insert(skill.as_ref(), weight);
        }
        map
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for WeightedSkillMap {
    /// Lenient: non-numeric weights are dropped, negative weights clamp to 0.
    fn from(raw: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut map = WeightedSkillMap::new();
        for (skill, value) in raw {
            let weight = match &value {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match weight.filter(|w| w.is_finite()) {
                Some(w) => map.insert(&skill, w.max(0.0)),
                None => tracing::warn!("Dropping requirement '{skill}' with non-numeric weight {value}"),
            }
        }
        map
    }
}

impl From<WeightedSkillMap> for serde_json::Map<String, serde_json::Value> {
    fn from(map: WeightedSkillMap) -> Self {
        map.entries
            .into_iter()
            .map(|(t, w)| (t, serde_json::json!(w)))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Distances and results
// ────────────────────────────────────────────────────────────────────────────

/// Candidate rows × requirement columns of cosine distances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    pub candidates: Vec<String>,
    pub requirements: Vec<String>,
    pub distances: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementDistance {
    pub requirement: String,
    pub distance: f64,
    /// False for the closest-requirement entry recorded when nothing was claimed.
    pub claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMapping {
    pub candidate: String,
    pub requirements: Vec<RequirementDistance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchResult {
    pub candidate_skills: Vec<String>,
    pub requirement_skills: Vec<String>,
    /// Claimed requirements, in claim order.
    pub matched: Vec<String>,
    /// Unclaimed requirements, in requirement order.
    pub gaps: Vec<String>,
    pub weighted_score: f64,
    pub skill_mapping: Vec<CandidateMapping>,
}

impl SkillMatchResult {
    /// Result for empty input on either side: everything is a gap.
    fn unmatched(candidate_skills: Vec<String>, requirements: &WeightedSkillMap) -> Self {
        let requirement_skills = requirements.tokens();
        Self {
            candidate_skills,
            gaps: requirement_skills.clone(),
            requirement_skills,
            ..Default::default()
        }
    }

    /// Weighted score as a percentage of `total_weight`. `None` when the total is
    /// not positive; callers must treat that as a precondition failure.
    pub fn normalized_score(&self, total_weight: f64) -> Option<f64> {
        (total_weight > 0.0).then(|| self.weighted_score / total_weight * 100.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// Embeds both skill lists in one batched call and builds the distance matrix.
pub async fn compute_skill_distances(
    candidates: &[String],
    requirements: &[String],
    embedder: &dyn Embedder,
) -> Result<DistanceMatrix, EmbeddingError> {
    let batch: Vec<String> = candidates.iter().chain(requirements).cloned().collect();
    let vectors = embedder.embed(&batch).await?;
    check_batch(&vectors, batch.len())?;

    let (candidate_vectors, requirement_vectors) = vectors.split_at(candidates.len());
    let distances = candidate_vectors
        .iter()
        .map(|c| {
            requirement_vectors
                .iter()
                .map(|r| cosine_distance(c, r))
                .collect()
        })
        .collect();

    Ok(DistanceMatrix {
        candidates: candidates.to_vec(),
        requirements: requirements.to_vec(),
        distances,
    })
}

/// Greedy first-come assignment over a precomputed matrix.
pub fn greedy_match(
    matrix: &DistanceMatrix,
    weights: &WeightedSkillMap,
    threshold: f64,
) -> SkillMatchResult {
    let mut claimed = vec![false; matrix.requirements.len()];
    let mut matched = Vec::new();
    let mut weighted_score = 0.0;
    let mut skill_mapping = Vec::with_capacity(matrix.candidates.len());

    for (candidate, row) in matrix.candidates.iter().zip(&matrix.distances) {
        let mut requirements = Vec::new();

        for (col, (requirement, &distance)) in matrix.requirements.iter().zip(row).enumerate() {
            if claimed[col] || distance > threshold {
                continue;
            }
            claimed[col] = true;
            weighted_score += weights
                .weight(requirement)
                .unwrap_or(DEFAULT_REQUIREMENT_WEIGHT);
            matched.push(requirement.clone());
            requirements.push(RequirementDistance {
                requirement: requirement.clone(),
                distance,
                claimed: true,
            });
        }

        if requirements.is_empty() {
            if let Some((col, &distance)) = row
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
            {
                requirements.push(RequirementDistance {
                    requirement: matrix.requirements[col].clone(),
                    distance,
                    claimed: false,
                });
            }
        }

        skill_mapping.push(CandidateMapping {
            candidate: candidate.clone(),
            requirements,
        });
    }

    let gaps = matrix
        .requirements
        .iter()
        .zip(&claimed)
        .filter(|(_, was_claimed)| !**was_claimed)
        .map(|(r, _)| r.clone())
        .collect();

    SkillMatchResult {
        candidate_skills: matrix.candidates.clone(),
        requirement_skills: matrix.requirements.clone(),
        matched,
        gaps,
        weighted_score,
        skill_mapping,
    }
}

/// Matches `candidate_skills` against `requirements`.
///
/// Empty input on either side skips embedding entirely and reports every
/// requirement as a gap with a zero score.
pub async fn compare(
    candidate_skills: &[String],
    requirements: &WeightedSkillMap,
    embedder: &dyn Embedder,
    threshold: f64,
) -> Result<SkillMatchResult, EmbeddingError> {
    let candidates = normalize_skills(candidate_skills);

    if candidates.is_empty() || requirements.is_empty() {
        return Ok(SkillMatchResult::unmatched(candidates, requirements));
    }

    let matrix = compute_skill_distances(&candidates, &requirements.tokens(), embedder).await?;
    let result = greedy_match(&matrix, requirements, threshold);

    debug!(
        "Skill match: {} candidates, {} requirements, {} matched, score {:.3}",
        candidates.len(),
        requirements.len(),
        result.matched.len(),
        result.weighted_score
    );

    Ok(result)
}

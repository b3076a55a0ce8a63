//! Matching Orchestrator — sequences extraction, eligibility gates, skill matching
//! and fit scoring for one resume or a batch of resumes against one job.
//!
//! Flow per resume: degrees → degree gate → experience → experience gate →
//! (skills + fit) → normalized score. The job side is prepared once into a
//! read-only [`JobProfile`] and shared across concurrent evaluations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::extraction::degree::{extract_degrees, DegreeRank, DegreeSummary};
use crate::extraction::experience::extract_experience;
use crate::matching::fit_scoring::overall_fit;
use crate::matching::skill_extractor::SkillExtractor;
use crate::matching::skills::{compare, SkillMatchResult, WeightedSkillMap};

// ────────────────────────────────────────────────────────────────────────────
// Capabilities
// ────────────────────────────────────────────────────────────────────────────

/// Read-only handles to the external capabilities plus matching settings.
/// Cheap to clone; every spawned evaluation gets its own copy.
#[derive(Clone)]
pub struct MatchContext {
    pub skills: Arc<dyn SkillExtractor>,
    pub embedder: Arc<dyn Embedder>,
    pub threshold: f64,
    pub timeout: Duration,
    /// Upper bound on resumes evaluated at once in a batch.
    pub concurrency: usize,
}

/// Bounds a capability call. Elapsed time becomes a recoverable `CapabilityTimeout`.
pub(crate) async fn with_timeout<T, E, F>(
    capability: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::CapabilityTimeout {
            capability,
            secs: limit.as_secs(),
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job profile
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct JobProfile {
    pub role: String,
    pub degrees: DegreeSummary,
    pub required_experience: u32,
    pub requirements: WeightedSkillMap,
    pub total_weight: f64,
    #[serde(skip)]
    pub text: String,
}

impl JobProfile {
    /// Extracts the job-side inputs once. A job without positively weighted
    /// requirements cannot be scored and is rejected with `NoRequirements`.
    pub async fn prepare(job_text: &str, role: &str, ctx: &MatchContext) -> Result<Self, AppError> {
        let degrees = extract_degrees(job_text);
        let required_experience = extract_experience(job_text);
        let requirements = with_timeout(
            "skill extraction",
            ctx.timeout,
            ctx.skills.extract_weighted_skills(job_text, role),
        )
        .await?;

        let total_weight = requirements.total_weight();
        if requirements.is_empty() || total_weight <= 0.0 {
            return Err(AppError::NoRequirements);
        }

        info!(
            "Prepared job profile for '{role}': degree={:?}, experience={required_experience}y, {} requirements",
            degrees.highest,
            requirements.len()
        );

        Ok(Self {
            role: role.to_string(),
            degrees,
            required_experience,
            requirements,
            total_weight,
            text: job_text.to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Why a resume failed an eligibility gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Ineligibility {
    DegreeRequirementNotMet { required: DegreeRank, found: DegreeRank },
    InsufficientExperience { required: u32, found: u32 },
}

impl std::fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ineligibility::DegreeRequirementNotMet { required, found } => {
                write!(f, "degree requirement not met: requires {required}, found {found}")
            }
            Ineligibility::InsufficientExperience { required, found } => {
                write!(f, "insufficient experience: requires {required} years, found {found}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateEvaluation {
    pub eligible: bool,
    pub reasons: Vec<Ineligibility>,
    pub degrees: DegreeSummary,
    pub experience_years: u32,
    /// Absent for ineligible candidates: skill analysis is skipped.
    pub skills: Option<SkillMatchResult>,
    /// Weighted skill score as a percentage of the job's total weight.
    pub skill_score: f64,
    pub fit_score: f64,
}

/// Degree gate: fails only when both ranks are known and the resume's is lower.
fn degree_gate(resume: &DegreeSummary, job: &DegreeSummary) -> Option<Ineligibility> {
    match (resume.highest, job.highest) {
        (Some(found), Some(required)) if found.rank() < required.rank() => {
            Some(Ineligibility::DegreeRequirementNotMet { required, found })
        }
        (None, Some(required)) => {
            warn!("No degree found in resume; passing degree gate (job requires {required})");
            None
        }
        _ => None,
    }
}

fn experience_gate(found: u32, required: u32) -> Option<Ineligibility> {
    (found < required).then_some(Ineligibility::InsufficientExperience { required, found })
}

/// Evaluates one resume against a prepared job.
///
/// Both gates always run so every failed requirement is reported. Capability
/// failures abort the evaluation; callers decide whether that is fatal.
pub async fn evaluate_candidate(
    resume_text: &str,
    job: &JobProfile,
    ctx: &MatchContext,
) -> Result<CandidateEvaluation, AppError> {
    let degrees = extract_degrees(resume_text);
    let experience_years = extract_experience(resume_text);

    let reasons: Vec<Ineligibility> = [
        degree_gate(&degrees, &job.degrees),
        experience_gate(experience_years, job.required_experience),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !reasons.is_empty() {
        return Ok(CandidateEvaluation {
            eligible: false,
            reasons,
            degrees,
            experience_years,
            skills: None,
            skill_score: 0.0,
            fit_score: 0.0,
        });
    }

    let candidate_skills = with_timeout(
        "skill extraction",
        ctx.timeout,
        ctx.skills.extract_skills(resume_text),
    )
    .await?;

    let (skills, fit_score) = tokio::try_join!(
        with_timeout(
            "embedding",
            ctx.timeout,
            compare(
                &candidate_skills,
                &job.requirements,
                ctx.embedder.as_ref(),
                ctx.threshold,
            ),
        ),
        with_timeout(
            "embedding",
            ctx.timeout,
            overall_fit(resume_text, &job.text, ctx.embedder.as_ref()),
        ),
    )?;

    let skill_score = skills
        .normalized_score(job.total_weight)
        .ok_or(AppError::NoRequirements)?;

    Ok(CandidateEvaluation {
        eligible: true,
        reasons,
        degrees,
        experience_years,
        skills: Some(skills),
        skill_score,
        fit_score,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub name: String,
    #[serde(flatten)]
    pub evaluation: CandidateEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCandidate {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RankingReport {
    /// Best skill score first; equal scores keep input order.
    pub ranked: Vec<RankedCandidate>,
    pub skipped: Vec<SkippedCandidate>,
}

enum Outcome {
    Ranked(CandidateEvaluation),
    Skipped(String),
}

/// Evaluates every resume concurrently against `job`, at most
/// `ctx.concurrency` at a time.
///
/// Empty documents and recoverable capability failures become `skipped` rows.
/// Any other error aborts the whole ranking.
pub async fn rank_candidates(
    job: Arc<JobProfile>,
    resumes: Vec<ResumeDocument>,
    ctx: MatchContext,
) -> Result<RankingReport, AppError> {
    let total = resumes.len();
    let mut names = Vec::with_capacity(total);
    let mut outcomes: Vec<Option<Outcome>> = (0..total).map(|_| None).collect();
    let mut tasks = JoinSet::new();
    let permits = Arc::new(Semaphore::new(ctx.concurrency.max(1)));

    for (index, resume) in resumes.into_iter().enumerate() {
        names.push(resume.name);
        if resume.text.trim().is_empty() {
            outcomes[index] = Some(Outcome::Skipped("no readable text".to_string()));
            continue;
        }
        let job = Arc::clone(&job);
        let ctx = ctx.clone();
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => evaluate_candidate(&resume.text, &job, &ctx).await,
                Err(e) => Err(AppError::Internal(anyhow::anyhow!("evaluation limiter closed: {e}"))),
            };
            (index, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| anyhow::anyhow!("evaluation task failed: {e}"))?;
        outcomes[index] = Some(match result {
            Ok(evaluation) => Outcome::Ranked(evaluation),
            Err(e) if e.is_recoverable() => {
                warn!("Skipping resume '{}': {e}", names[index]);
                Outcome::Skipped(e.to_string())
            }
            Err(e) => return Err(e),
        });
    }

    let mut report = RankingReport::default();
    for (name, outcome) in names.into_iter().zip(outcomes) {
        match outcome {
            Some(Outcome::Ranked(evaluation)) => report.ranked.push(RankedCandidate { name, evaluation }),
            Some(Outcome::Skipped(reason)) => report.skipped.push(SkippedCandidate { name, reason }),
            None => report.skipped.push(SkippedCandidate {
                name,
                reason: "evaluation did not complete".to_string(),
            }),
        }
    }

    // Stable sort keeps input order among equal scores.
    report
        .ranked
        .sort_by(|a, b| b.evaluation.skill_score.total_cmp(&a.evaluation.skill_score));

    info!(
        "Ranked {} of {total} resumes for '{}' ({} skipped)",
        report.ranked.len(),
        job.role,
        report.skipped.len()
    );

    Ok(report)
}

//! Axum route handlers for the extraction, matching and ranking API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::degree::{extract_degrees, DegreeSummary};
use crate::extraction::experience::extract_experience;
use crate::ingest::load_document;
use crate::matching::export::CSV_FILE_NAME;
use crate::matching::fit_scoring::overall_fit;
use crate::matching::pipeline::{
    evaluate_candidate, rank_candidates, with_timeout, CandidateEvaluation, JobProfile,
    RankingReport, ResumeDocument, SkippedCandidate,
};
use crate::matching::skills::{compare, SkillMatchResult, WeightedSkillMap};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExperienceResponse {
    pub years: u32,
}

#[derive(Debug, Deserialize)]
pub struct SkillMatchRequest {
    pub candidate_skills: Vec<String>,
    pub requirement_weights: WeightedSkillMap,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SkillMatchResponse {
    #[serde(flatten)]
    pub result: SkillMatchResult,
    pub normalized_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub text_a: String,
    pub text_b: String,
}

#[derive(Debug, Serialize)]
pub struct FitResponse {
    pub fit_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub resume_text: String,
    pub job_text: String,
    pub job_role: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub job: JobProfile,
    pub evaluation: CandidateEvaluation,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_text: String,
    pub job_role: String,
    pub resumes: Vec<ResumeDocument>,
}

/// `?format=json|csv` on the ranking endpoints. Without it, `Accept: text/csv` selects CSV.
#[derive(Debug, Default, Deserialize)]
pub struct RankQuery {
    pub format: Option<String>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract/degrees
///
/// Empty text yields the empty summary.
pub async fn handle_extract_degrees(Json(request): Json<TextRequest>) -> Json<DegreeSummary> {
    Json(extract_degrees(&request.text))
}

/// POST /api/v1/extract/experience
///
/// Empty text yields 0 years.
pub async fn handle_extract_experience(Json(request): Json<TextRequest>) -> Json<ExperienceResponse> {
    Json(ExperienceResponse {
        years: extract_experience(&request.text),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/skills
///
/// Matches caller-supplied skills against caller-supplied weights. No LLM call.
pub async fn handle_match_skills(
    State(state): State<AppState>,
    Json(request): Json<SkillMatchRequest>,
) -> Result<Json<SkillMatchResponse>, AppError> {
    let threshold = request
        .threshold
        .unwrap_or(state.config.skill_match_threshold);
    if !(0.0..=2.0).contains(&threshold) {
        return Err(AppError::Validation(
            "threshold must be a cosine distance between 0 and 2".to_string(),
        ));
    }

    let total_weight = request.requirement_weights.total_weight();
    if total_weight <= 0.0 {
        return Err(AppError::NoRequirements);
    }

    let result = with_timeout(
        "embedding",
        state.config.capability_timeout,
        compare(
            &request.candidate_skills,
            &request.requirement_weights,
            state.embedder.as_ref(),
            threshold,
        ),
    )
    .await?;

    let normalized_score = result
        .normalized_score(total_weight)
        .ok_or(AppError::NoRequirements)?;

    Ok(Json(SkillMatchResponse {
        result,
        normalized_score,
    }))
}

/// POST /api/v1/match/fit
///
/// Empty texts are allowed and score 0.
pub async fn handle_match_fit(
    State(state): State<AppState>,
    Json(request): Json<FitRequest>,
) -> Result<Json<FitResponse>, AppError> {
    let fit_score = with_timeout(
        "embedding",
        state.config.capability_timeout,
        overall_fit(&request.text_a, &request.text_b, state.embedder.as_ref()),
    )
    .await?;

    Ok(Json(FitResponse { fit_score }))
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation & ranking
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluate
///
/// Job-seeker mode: one resume against one job. Capability failures are fatal here.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("job_text", &request.job_text)?;

    let ctx = state.match_context();
    let job = JobProfile::prepare(&request.job_text, &request.job_role, &ctx).await?;
    let evaluation = evaluate_candidate(&request.resume_text, &job, &ctx).await?;

    info!(
        "Evaluated resume for '{}': eligible={}, skill_score={:.1}, fit={:.1}",
        job.role, evaluation.eligible, evaluation.skill_score, evaluation.fit_score
    );

    Ok(Json(EvaluateResponse { job, evaluation }))
}

/// POST /api/v1/rank
///
/// Recruiter mode: many resumes against one job, best skill score first.
/// Responds with JSON, or with an `ats_results.csv` attachment when CSV is requested.
pub async fn handle_rank(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
    headers: HeaderMap,
    Json(request): Json<RankRequest>,
) -> Result<Response, AppError> {
    let as_csv = wants_csv(&query, &headers)?;
    require_text("job_text", &request.job_text)?;
    if request.resumes.is_empty() {
        return Err(AppError::Validation("resumes cannot be empty".to_string()));
    }

    let ctx = state.match_context();
    let job = JobProfile::prepare(&request.job_text, &request.job_role, &ctx).await?;
    let report = rank_candidates(Arc::new(job), request.resumes, ctx).await?;

    render_report(report, as_csv)
}

/// POST /api/v1/rank/upload
///
/// Multipart variant of `/rank`: `job_text`, `job_role`, and one `resume` part per
/// file (.pdf or .txt). Unreadable files are reported as skipped. Same output
/// formats as `/rank`.
pub async fn handle_rank_upload(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let as_csv = wants_csv(&query, &headers)?;
    let mut job_text = String::new();
    let mut job_role = String::new();
    let mut resumes = Vec::new();
    let mut unreadable = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_text" => job_text = field_text(field).await?,
            "job_role" => job_role = field_text(field).await?,
            "resume" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", resumes.len() + unreadable.len() + 1));
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("could not read '{file_name}': {e}")))?;

                match load_document(&file_name, data).await {
                    Ok(text) => resumes.push(ResumeDocument {
                        name: file_name,
                        text,
                    }),
                    Err(e) => {
                        warn!("Skipping upload '{file_name}': {e}");
                        unreadable.push(SkippedCandidate {
                            name: file_name,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            other => warn!("Ignoring unknown multipart field '{other}'"),
        }
    }

    require_text("job_text", &job_text)?;
    if resumes.is_empty() && unreadable.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }

    let ctx = state.match_context();
    let job = JobProfile::prepare(&job_text, &job_role, &ctx).await?;
    let mut report = rank_candidates(Arc::new(job), resumes, ctx).await?;

    unreadable.append(&mut report.skipped);
    report.skipped = unreadable;

    render_report(report, as_csv)
}

fn wants_csv(query: &RankQuery, headers: &HeaderMap) -> Result<bool, AppError> {
    match query.format.as_deref().map(str::trim) {
        Some(format) if format.eq_ignore_ascii_case("csv") => Ok(true),
        Some(format) if format.eq_ignore_ascii_case("json") => Ok(false),
        Some(other) => Err(AppError::Validation(format!(
            "unsupported format '{other}', expected 'json' or 'csv'"
        ))),
        None => Ok(headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|accept| accept.contains("text/csv"))),
    }
}

fn render_report(report: RankingReport, as_csv: bool) -> Result<Response, AppError> {
    if !as_csv {
        return Ok(Json(report).into_response());
    }

    let body = report.to_csv()?;
    info!("Exported {} ranked and {} skipped rows as CSV", report.ranked.len(), report.skipped.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid text field: {e}")))
}

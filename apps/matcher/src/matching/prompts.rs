// LLM prompt constants for skill extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for resume skill extraction. Combined with `JSON_ONLY_SYSTEM`.
pub const RESUME_SKILLS_PERSONA: &str = "You are an expert resume parsing assistant. \
    Your ONLY task is to extract technical skills from resume text, from ANY section \
    (skills, projects, internships, certifications).";

/// Resume skill prompt. Replace: {scope_instruction}, {text}
pub const RESUME_SKILLS_PROMPT_TEMPLATE: &str = r#"{scope_instruction}

Return the result strictly as JSON in this EXACT shape (no extra fields):
{"skills": ["python", "power bi", "aws lambda"]}

RESUME TEXT:
{text}"#;

/// Persona for weighted job description skill extraction. Combined with `JSON_ONLY_SYSTEM`.
pub const JD_SKILLS_PERSONA: &str =
    "You are an expert career advisor and job description analyst.";

/// Weighted JD skill prompt. Replace: {scope_instruction}, {role}, {text}
pub const JD_SKILLS_PROMPT_TEMPLATE: &str = r#"{scope_instruction}

Assign every extracted skill an importance weight for the job role '{role}':
a number between 0 (least important) and 1 (most important).

Return a JSON object whose keys are the skills (lowercase) and whose values are the weights:
{"python": 0.9, "docker": 0.5, "deep learning": 0.7}

JOB DESCRIPTION:
{text}"#;

// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Which skills count. Shared by resume and job description extraction so both
/// sides produce comparable tokens.
pub const TECHNICAL_SKILL_SCOPE: &str = "\
    Extract ONLY technical skills: programming languages, tools, frameworks, libraries, \
    platforms, cloud services, databases, and methodologies. \
    EXCLUDE soft skills such as communication, leadership, teamwork, creativity, adaptability, \
    problem-solving, collaboration, interpersonal skills, and attention to detail. \
    Keep multi-word skills exactly as written (e.g. 'natural language processing', 'power bi'). \
    Everything must be lowercase. Remove duplicates. \
    Do NOT hallucinate, infer, or generalize: only include skills explicitly written in the text.";

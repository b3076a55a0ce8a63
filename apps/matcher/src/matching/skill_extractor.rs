//! Skill Extractor — the LLM-backed capability that turns free text into skill tokens.
//!
//! Output is treated as untrusted: valid-but-odd replies degrade (odd entries
//! are dropped), unparseable replies surface as `LlmError`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, TECHNICAL_SKILL_SCOPE};
use crate::llm_client::{LlmClient, LlmError};
use crate::matching::prompts::{
    JD_SKILLS_PERSONA, JD_SKILLS_PROMPT_TEMPLATE, RESUME_SKILLS_PERSONA,
    RESUME_SKILLS_PROMPT_TEMPLATE,
};
use crate::matching::skills::{normalize_skills, WeightedSkillMap};

/// Implement this to swap extraction backends without touching the pipeline.
///
/// Carried in `AppState` as `Arc<dyn SkillExtractor>`.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// Normalized, de-duplicated skills mentioned in `text`.
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>, LlmError>;

    /// Required skills of a job description with importance weights for `role_hint`.
    async fn extract_weighted_skills(
        &self,
        job_text: &str,
        role_hint: &str,
    ) -> Result<WeightedSkillMap, LlmError>;
}

#[derive(Debug, Deserialize)]
struct SkillsReply {
    #[serde(default)]
    skills: Vec<serde_json::Value>,
}

/// Default extractor backed by Claude.
pub struct LlmSkillExtractor(pub LlmClient);

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>, LlmError> {
        let prompt = RESUME_SKILLS_PROMPT_TEMPLATE
            .replace("{scope_instruction}", TECHNICAL_SKILL_SCOPE)
            .replace("{text}", text);
        let system = format!("{RESUME_SKILLS_PERSONA} {JSON_ONLY_SYSTEM}");

        let reply: SkillsReply = self.0.call_json(&prompt, &system).await?;
        let skills = skills_from_reply(reply);
        debug!("Extracted {} resume skills", skills.len());
        Ok(skills)
    }

    async fn extract_weighted_skills(
        &self,
        job_text: &str,
        role_hint: &str,
    ) -> Result<WeightedSkillMap, LlmError> {
        let prompt = JD_SKILLS_PROMPT_TEMPLATE
            .replace("{scope_instruction}", TECHNICAL_SKILL_SCOPE)
            .replace("{role}", role_hint)
            .replace("{text}", job_text);
        let system = format!("{JD_SKILLS_PERSONA} {JSON_ONLY_SYSTEM}");

        let weights: WeightedSkillMap = self.0.call_json(&prompt, &system).await?;
        debug!(
            "Extracted {} weighted JD skills (total weight {:.2})",
            weights.len(),
            weights.total_weight()
        );
        Ok(weights)
    }
}

/// Keeps string entries only, then normalizes and de-duplicates.
fn skills_from_reply(reply: SkillsReply) -> Vec<String> {
    let strings = reply.skills.into_iter().filter_map(|v| match v {
        serde_json::Value::String(s) => Some(s),
        other => {
            warn!("Dropping non-string skill entry: {other}");
            None
        }
    });
    normalize_skills(strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;

    #[test]
    fn test_skills_reply_is_normalized() {
        let reply: SkillsReply =
            parse_json_reply(r#"{"skills": ["Python", " power bi ", "python", 42, null]}"#).unwrap();
        assert_eq!(skills_from_reply(reply), vec!["python", "power bi"]);
    }

    #[test]
    fn test_skills_reply_missing_key_is_empty() {
        let reply: SkillsReply = parse_json_reply(r#"{"tools": ["git"]}"#).unwrap();
        assert!(skills_from_reply(reply).is_empty());
    }

    #[test]
    fn test_weighted_reply_in_code_fence() {
        let reply = "```json\n{\"Python\": 0.9, \"Docker\": 0.5}\n```";
        let weights: WeightedSkillMap = parse_json_reply(reply).unwrap();
        assert_eq!(weights.tokens(), vec!["python", "docker"]);
        assert!((weights.total_weight() - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_reply_with_prose_around_it() {
        let reply = "Sure! Here you go: {\"sql\": 1} Hope this helps.";
        let weights: WeightedSkillMap = parse_json_reply(reply).unwrap();
        assert_eq!(weights.weight("sql"), Some(1.0));
    }

    #[test]
    fn test_weighted_reply_not_an_object_is_an_error() {
        let result = parse_json_reply::<WeightedSkillMap>("[\"python\"]");
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_templates_have_placeholders() {
        assert!(RESUME_SKILLS_PROMPT_TEMPLATE.contains("{text}"));
        assert!(JD_SKILLS_PROMPT_TEMPLATE.contains("{role}"));
        assert!(JD_SKILLS_PROMPT_TEMPLATE.contains("{scope_instruction}"));
    }
}

//! Flat CSV rendering of a ranking, one row per resume, for spreadsheet review.

use anyhow::{Context, Result};

use crate::matching::pipeline::{CandidateEvaluation, RankingReport};

pub const CSV_FILE_NAME: &str = "ats_results.csv";

const HEADER: [&str; 11] = [
    "rank",
    "name",
    "status",
    "eligible",
    "skill_score",
    "fit_score",
    "experience_years",
    "highest_degree",
    "matched_skills",
    "skill_gaps",
    "notes",
];

impl RankingReport {
    /// Ranked rows first in ranking order, then skipped rows with their reason.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER).context("Failed to write CSV header")?;

        for (position, candidate) in self.ranked.iter().enumerate() {
            writer
                .write_record(ranked_row(position + 1, &candidate.name, &candidate.evaluation))
                .with_context(|| format!("Failed to write CSV row for '{}'", candidate.name))?;
        }

        for skipped in &self.skipped {
            let row = [
                "",
                skipped.name.as_str(),
                "skipped",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                skipped.reason.as_str(),
            ];
            writer
                .write_record(row)
                .with_context(|| format!("Failed to write CSV row for '{}'", skipped.name))?;
        }

        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))
    }
}

fn ranked_row(rank: usize, name: &str, evaluation: &CandidateEvaluation) -> [String; 11] {
    let (matched, gaps) = match &evaluation.skills {
        Some(skills) => (skills.matched.join("; "), skills.gaps.join("; ")),
        None => (String::new(), String::new()),
    };
    let notes = evaluation
        .reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    [
        rank.to_string(),
        name.to_string(),
        "ranked".to_string(),
        evaluation.eligible.to_string(),
        format!("{:.2}", evaluation.skill_score),
        format!("{:.2}", evaluation.fit_score),
        evaluation.experience_years.to_string(),
        evaluation
            .degrees
            .highest
            .map(|d| d.as_str().to_string())
            .unwrap_or_default(),
        matched,
        gaps,
        notes,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::degree::{DegreeRank, DegreeSummary};
    use crate::matching::pipeline::{Ineligibility, RankedCandidate, SkippedCandidate};

    fn evaluation(eligible: bool, skill_score: f64) -> CandidateEvaluation {
        CandidateEvaluation {
            eligible,
            reasons: if eligible {
                vec![]
            } else {
                vec![Ineligibility::InsufficientExperience { required: 3, found: 1 }]
            },
            degrees: DegreeSummary {
                all: vec![DegreeRank::Bachelor],
                highest: Some(DegreeRank::Bachelor),
            },
            experience_years: if eligible { 5 } else { 1 },
            skills: None,
            skill_score,
            fit_score: if eligible { 71.234 } else { 0.0 },
        }
    }

    fn rows(report: &RankingReport) -> Vec<csv::StringRecord> {
        let bytes = report.to_csv().unwrap();
        csv::Reader::from_reader(bytes.as_slice())
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_csv_lists_ranked_then_skipped() {
        let report = RankingReport {
            ranked: vec![
                RankedCandidate {
                    name: "northwind".to_string(),
                    evaluation: evaluation(true, 82.5),
                },
                RankedCandidate {
                    name: "fabrikam".to_string(),
                    evaluation: evaluation(false, 0.0),
                },
            ],
            skipped: vec![SkippedCandidate {
                name: "scan.docx".to_string(),
                reason: "unsupported file type, with a comma".to_string(),
            }],
        };

        let rows = rows(&report);

        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "northwind");
        assert_eq!(&rows[0][4], "82.50");
        assert_eq!(&rows[0][5], "71.23");
        assert_eq!(&rows[1][2], "ranked");
        assert_eq!(&rows[1][3], "false");
        assert!(rows[1][10].starts_with("insufficient experience"));
        assert_eq!(&rows[2][0], "");
        assert_eq!(&rows[2][2], "skipped");
        assert_eq!(&rows[2][10], "unsupported file type, with a comma");
    }

    #[test]
    fn test_csv_of_empty_report_is_header_only() {
        let bytes = RankingReport::default().to_csv().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("rank,name,status"));
    }
}

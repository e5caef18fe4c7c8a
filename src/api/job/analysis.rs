//! Typed view of the `analysis_data` JSONB document.
//!
//! The document is written by the AI analysis pipeline and only ever parsed
//! here, on the read path. Parsing is strict about types but lenient about
//! presence: every field is optional, and a document that fails to
//! deserialize is treated as absent rather than an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    pub experience_requirements: Option<ExperienceRequirements>,
    pub summary: Option<Summary>,
    pub key_terms_analysis: Option<KeyTermsAnalysis>,
    pub category_scores: Option<HashMap<String, CategoryScore>>,
    pub benefits: Option<Vec<String>>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub salary: Option<SalaryRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequirements {
    pub minimum_years: Option<f64>,
    pub preferred_years: Option<f64>,
    pub seniority_level: Option<String>,
    pub inference_source: Option<String>,
    pub confidence_level: Option<String>,
    pub reasoning_text: Option<String>,
    pub specific_experience: Option<Vec<String>>,
    pub ambiguity_flags: Option<Vec<String>>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub recommendation: Option<String>,
    pub key_points: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub concerns: Option<Vec<String>>,
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTermsAnalysis {
    #[serde(default)]
    pub job_required: Vec<String>,
    #[serde(default)]
    pub candidate_has: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub bonus: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub breakdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

impl AnalysisDocument {
    /// Parse the stored document defensively. `None` in, `None` out; a
    /// document that does not match the schema also degrades to `None`.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        serde_json::from_value(value?.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_document_parses() {
        let value = json!({
            "experienceRequirements": {
                "minimumYears": 5,
                "seniorityLevel": "Senior",
                "requiredSkills": ["Rust", "SQL"]
            },
            "summary": {
                "recommendation": "advance",
                "strengths": ["systems background"]
            },
            "keyTermsAnalysis": { "missing": ["Kubernetes"] },
            "categoryScores": {
                "technical": { "score": 85.0, "breakdown": "strong match" }
            }
        });
        let doc = AnalysisDocument::from_value(Some(&value)).expect("should parse");
        let experience = doc.experience_requirements.unwrap();
        assert_eq!(experience.minimum_years, Some(5.0));
        assert_eq!(experience.seniority_level.as_deref(), Some("Senior"));
        assert_eq!(doc.summary.unwrap().recommendation.as_deref(), Some("advance"));
        let key_terms = doc.key_terms_analysis.unwrap();
        assert_eq!(key_terms.missing, vec!["Kubernetes"]);
        // Lists the pipeline omitted default to empty.
        assert!(key_terms.bonus.is_empty());
    }

    #[test]
    fn absent_document_is_none() {
        assert!(AnalysisDocument::from_value(None).is_none());
    }

    #[test]
    fn wrong_shape_degrades_to_none() {
        let value = json!("not an object");
        assert!(AnalysisDocument::from_value(Some(&value)).is_none());

        let value = json!({ "experienceRequirements": { "minimumYears": "five" } });
        assert!(AnalysisDocument::from_value(Some(&value)).is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let value = json!({ "somethingNew": true, "summary": {} });
        let doc = AnalysisDocument::from_value(Some(&value)).expect("should parse");
        assert!(doc.summary.is_some());
    }
}

use serde::Serialize;

use crate::grades::{Grade, GradeSymbol};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRecord {
    pub code: String,
    pub credits: u32,
    pub grade: GradeSymbol,
}

impl CourseRecord {
    pub fn new(code: impl Into<String>, credits: u32, grade: &str) -> Self {
        Self {
            code: code.into(),
            credits,
            grade: GradeSymbol::parse(grade),
        }
    }

    /// Same course with a different outcome, e.g. a hypothetical retake.
    pub fn with_grade(&self, grade: Grade) -> Self {
        Self {
            code: self.code.clone(),
            credits: self.credits,
            grade: grade.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub current_gpa: f64,
    pub projected_gpa_after_mandatory_retakes: f64,
    pub total_credits: u64,
    pub assumed_retake_grade: Grade,
    pub must_retake: Vec<CourseRecord>,
    pub should_retake: Vec<CourseRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetakeProjection {
    pub code: String,
    pub potential_gpa: f64,
    pub improvement: f64,
}

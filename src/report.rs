use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AnalysisResult, CourseRecord, RetakeProjection};

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    projections: &'a [RetakeProjection],
}

pub fn render_json(
    result: &AnalysisResult,
    projections: &[RetakeProjection],
) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        result,
        projections,
    })?)
}

fn course_line(course: &CourseRecord) -> String {
    format!(
        "{} (Current: {}, Credits: {})",
        course.code, course.grade, course.credits
    )
}

pub fn render_summary(result: &AnalysisResult, projections: &[RetakeProjection]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Your CURRENT GPA is: {:.3}", result.current_gpa);
    let _ = writeln!(
        output,
        "POTENTIAL GPA (after retaking failed at {}): {:.3} ({:+.3})",
        result.assumed_retake_grade,
        result.projected_gpa_after_mandatory_retakes,
        result.projected_gpa_after_mandatory_retakes - result.current_gpa
    );

    if !result.must_retake.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "MUST RETAKE (Failing/Incomplete):");
        let _ = writeln!(output, "{}", "-".repeat(40));
        for course in &result.must_retake {
            let _ = writeln!(output, "- {}", course_line(course));
        }
    }

    if !result.should_retake.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "RECOMMENDED TO RETAKE (Grades below C-):");
        let _ = writeln!(output, "{}", "-".repeat(40));
        // Projections line up with `should_retake` by position; codes may repeat.
        for (index, course) in result.should_retake.iter().enumerate() {
            let _ = writeln!(output, "- {}", course_line(course));
            if let Some(projection) = projections.get(index) {
                let _ = writeln!(
                    output,
                    "  Potential GPA: {:.3} ({:+.3})",
                    projection.potential_gpa, projection.improvement
                );
            }
        }
    }

    output
}

pub fn build_report(
    source: &str,
    generated_on: NaiveDate,
    result: &AnalysisResult,
    projections: &[RetakeProjection],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# GPA Retake Report");
    let _ = writeln!(output, "Generated for {} on {}", source, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Current GPA: {:.3} across {} credits",
        result.current_gpa, result.total_credits
    );
    let _ = writeln!(
        output,
        "- Projected GPA after mandatory retakes: {:.3} ({:+.3}, assuming {} outcomes)",
        result.projected_gpa_after_mandatory_retakes,
        result.projected_gpa_after_mandatory_retakes - result.current_gpa,
        result.assumed_retake_grade
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Must Retake");

    if result.must_retake.is_empty() {
        let _ = writeln!(output, "No failing or incomplete courses.");
    } else {
        for course in &result.must_retake {
            let _ = writeln!(output, "- {}", course_line(course));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommended Retakes");

    if result.should_retake.is_empty() {
        let _ = writeln!(output, "No courses in the D range or below.");
    } else {
        let _ = writeln!(output, "| Course | Grade | Credits | Potential GPA | Change |");
        let _ = writeln!(output, "|--------|-------|---------|---------------|--------|");
        for (index, course) in result.should_retake.iter().enumerate() {
            match projections.get(index) {
                Some(projection) => {
                    let _ = writeln!(
                        output,
                        "| {} | {} | {} | {:.3} | {:+.3} |",
                        course.code,
                        course.grade,
                        course.credits,
                        projection.potential_gpa,
                        projection.improvement
                    );
                }
                None => {
                    let _ = writeln!(
                        output,
                        "| {} | {} | {} | n/a | n/a |",
                        course.code, course.grade, course.credits
                    );
                }
            }
        }
    }

    output
}

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::gpa::{total_credits, GpaEngine};
use crate::grades::Grade;
use crate::models::{AnalysisResult, CourseRecord, RetakeProjection};

/// Outcome assumed for any course that gets retaken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetakePolicy {
    pub assumed_retake_grade: Grade,
}

impl Default for RetakePolicy {
    fn default() -> Self {
        Self {
            assumed_retake_grade: Grade::D,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetakeAnalyzer {
    engine: GpaEngine,
    policy: RetakePolicy,
}

impl RetakeAnalyzer {
    pub fn new(engine: GpaEngine, policy: RetakePolicy) -> Self {
        Self { engine, policy }
    }

    /// Returns `(must_retake, should_retake)`, each ordered by credits
    /// descending then grade points ascending, input order otherwise.
    pub fn classify(&self, courses: &[CourseRecord]) -> (Vec<CourseRecord>, Vec<CourseRecord>) {
        let mut must_retake: Vec<CourseRecord> = courses
            .iter()
            .filter(|course| course.grade.is_mandatory_retake())
            .cloned()
            .collect();
        let mut should_retake: Vec<CourseRecord> = courses
            .iter()
            .filter(|course| course.grade.is_recommended_retake())
            .cloned()
            .collect();

        must_retake.sort_by(|a, b| self.retake_order(a, b));
        should_retake.sort_by(|a, b| self.retake_order(a, b));

        (must_retake, should_retake)
    }

    fn retake_order(&self, a: &CourseRecord, b: &CourseRecord) -> Ordering {
        let table = self.engine.table();
        b.credits.cmp(&a.credits).then_with(|| {
            table
                .points_for(&a.grade)
                .total_cmp(&table.points_for(&b.grade))
        })
    }

    pub fn analyze(&self, courses: &[CourseRecord]) -> AnalysisResult {
        let (must_retake, should_retake) = self.classify(courses);
        let current_gpa = self.engine.compute_gpa(courses);

        let retaken: HashSet<&str> = must_retake.iter().map(|c| c.code.as_str()).collect();
        let hypothetical: Vec<CourseRecord> = courses
            .iter()
            .filter(|course| !retaken.contains(course.code.as_str()))
            .cloned()
            .chain(
                must_retake
                    .iter()
                    .map(|course| course.with_grade(self.policy.assumed_retake_grade)),
            )
            .collect();
        let projected_gpa_after_mandatory_retakes = self.engine.compute_gpa(&hypothetical);

        AnalysisResult {
            current_gpa,
            projected_gpa_after_mandatory_retakes,
            total_credits: total_credits(courses),
            assumed_retake_grade: self.policy.assumed_retake_grade,
            must_retake,
            should_retake,
        }
    }

    /// GPA if only `course` were retaken at the assumed grade, all else fixed.
    /// `None` when `courses` carries no credits at all.
    pub fn projected_improvement(
        &self,
        courses: &[CourseRecord],
        current_gpa: f64,
        course: &CourseRecord,
    ) -> Option<RetakeProjection> {
        let total = total_credits(courses);
        if total == 0 {
            return None;
        }

        let total = total as f64;
        let credits = f64::from(course.credits);
        let excluded = HashSet::from([course.code.as_str()]);
        let new_gpa = self.engine.compute_gpa_excluding(courses, &excluded);
        let retake_points = self.engine.table().points(self.policy.assumed_retake_grade);
        let potential_gpa = (new_gpa * (total - credits) + retake_points * credits) / total;

        Some(RetakeProjection {
            code: course.code.clone(),
            potential_gpa,
            improvement: potential_gpa - current_gpa,
        })
    }

    /// One projection per `should_retake` entry, in the same order, or none
    /// at all when the courses carry no credits.
    pub fn projections(
        &self,
        courses: &[CourseRecord],
        result: &AnalysisResult,
    ) -> Vec<RetakeProjection> {
        result
            .should_retake
            .iter()
            .filter_map(|course| self.projected_improvement(courses, result.current_gpa, course))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::GradePointTable;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn codes(courses: &[CourseRecord]) -> Vec<&str> {
        courses.iter().map(|c| c.code.as_str()).collect()
    }

    #[test]
    fn failed_course_projects_to_passing_retake() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![
            CourseRecord::new("CSE101", 3, "A"),
            CourseRecord::new("CSE102", 3, "F"),
        ];

        let result = analyzer.analyze(&courses);
        assert!(close(result.current_gpa, 2.0));
        assert_eq!(codes(&result.must_retake), vec!["CSE102"]);
        assert_eq!(codes(&result.should_retake), vec!["CSE102"]);
        assert!(close(result.projected_gpa_after_mandatory_retakes, 2.5));
        assert_eq!(result.total_credits, 6);
    }

    #[test]
    fn retaking_d_plus_at_d_lowers_gpa() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![CourseRecord::new("MTH201", 4, "D+")];

        let result = analyzer.analyze(&courses);
        assert!(close(result.current_gpa, 1.3));
        assert!(result.must_retake.is_empty());
        assert_eq!(codes(&result.should_retake), vec!["MTH201"]);
        assert!(close(result.projected_gpa_after_mandatory_retakes, 1.3));

        let projection = analyzer
            .projected_improvement(&courses, result.current_gpa, &courses[0])
            .unwrap();
        assert!(close(projection.potential_gpa, 1.0));
        assert!(close(projection.improvement, -0.3));
    }

    #[test]
    fn empty_input_yields_empty_analysis() {
        let analyzer = RetakeAnalyzer::default();
        let result = analyzer.analyze(&[]);
        assert_eq!(result.current_gpa, 0.0);
        assert_eq!(result.projected_gpa_after_mandatory_retakes, 0.0);
        assert!(result.must_retake.is_empty());
        assert!(result.should_retake.is_empty());
        assert!(analyzer.projections(&[], &result).is_empty());
    }

    #[test]
    fn unrecognized_grade_is_never_a_retake() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![
            CourseRecord::new("CSE101", 3, "A"),
            CourseRecord::new("ART100", 1, "Z"),
        ];
        let result = analyzer.analyze(&courses);
        assert!(close(result.current_gpa, 3.0));
        assert!(result.must_retake.is_empty());
        assert!(result.should_retake.is_empty());
    }

    #[test]
    fn must_retake_is_subset_of_should_retake() {
        let analyzer = RetakeAnalyzer::default();
        let courses: Vec<CourseRecord> = Grade::ALL
            .iter()
            .enumerate()
            .map(|(i, grade)| CourseRecord::new(format!("C{i:02}"), (i % 4) as u32, grade.symbol()))
            .collect();

        let (must, should) = analyzer.classify(&courses);
        assert_eq!(must.len(), 4);
        assert_eq!(should.len(), 6);
        for course in &must {
            assert!(should.contains(course), "{} missing", course.code);
        }
    }

    #[test]
    fn orders_by_credits_then_worst_grade_then_input() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![
            CourseRecord::new("LOW-D", 2, "D"),
            CourseRecord::new("BIG-DP", 4, "D+"),
            CourseRecord::new("BIG-F", 4, "F"),
            CourseRecord::new("BIG-D", 4, "D"),
            CourseRecord::new("BIG-NC", 4, "NC"),
            CourseRecord::new("PASS", 5, "B"),
        ];

        let (must, should) = analyzer.classify(&courses);
        assert_eq!(codes(&must), vec!["BIG-F", "BIG-NC"]);
        assert_eq!(
            codes(&should),
            vec!["BIG-F", "BIG-NC", "BIG-D", "BIG-DP", "LOW-D"]
        );
    }

    #[test]
    fn analysis_is_repeatable() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![
            CourseRecord::new("CSE101", 3, "A-"),
            CourseRecord::new("CSE102", 3, "E"),
            CourseRecord::new("MTH201", 4, "D"),
            CourseRecord::new("PHY110", 2, "WH"),
        ];

        let first = analyzer.analyze(&courses);
        let second = analyzer.analyze(&courses);
        assert_eq!(first, second);
        assert_eq!(
            first.current_gpa.to_bits(),
            second.current_gpa.to_bits()
        );
        assert_eq!(
            analyzer.projections(&courses, &first),
            analyzer.projections(&courses, &second)
        );
    }

    #[test]
    fn policy_grade_drives_both_projections() {
        let analyzer = RetakeAnalyzer::new(
            GpaEngine::new(GradePointTable::standard()),
            RetakePolicy {
                assumed_retake_grade: Grade::C,
            },
        );
        let courses = vec![
            CourseRecord::new("CSE101", 3, "A"),
            CourseRecord::new("CSE102", 3, "F"),
        ];

        let result = analyzer.analyze(&courses);
        assert_eq!(result.assumed_retake_grade, Grade::C);
        assert!(close(result.projected_gpa_after_mandatory_retakes, 3.0));

        let projections = analyzer.projections(&courses, &result);
        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].code, "CSE102");
        assert!(close(projections[0].potential_gpa, 3.0));
        assert!(close(projections[0].improvement, 1.0));
    }

    #[test]
    fn hypothetical_retake_leaves_input_untouched() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![CourseRecord::new("CSE102", 3, "F")];
        let before = courses.clone();
        let result = analyzer.analyze(&courses);
        assert_eq!(courses, before);
        assert_eq!(result.must_retake[0].grade.to_string(), "F");
    }

    #[test]
    fn projections_follow_should_retake_order_with_repeated_codes() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![
            CourseRecord::new("CSE101", 3, "A"),
            CourseRecord::new("CSE102", 4, "D"),
            CourseRecord::new("CSE102", 1, "D+"),
        ];
        let result = analyzer.analyze(&courses);
        let projections = analyzer.projections(&courses, &result);

        assert_eq!(projections.len(), result.should_retake.len());
        assert!(close(projections[0].potential_gpa, 2.5));
        assert!(close(projections[1].potential_gpa, 3.625));
    }

    #[test]
    fn zero_credit_input_has_no_projection() {
        let analyzer = RetakeAnalyzer::default();
        let courses = vec![CourseRecord::new("SEM000", 0, "F")];
        let result = analyzer.analyze(&courses);
        assert_eq!(codes(&result.must_retake), vec!["SEM000"]);
        assert!(analyzer
            .projected_improvement(&courses, result.current_gpa, &courses[0])
            .is_none());
    }
}

use std::collections::HashSet;

use crate::grades::GradePointTable;
use crate::models::CourseRecord;

#[derive(Debug, Clone, Default)]
pub struct GpaEngine {
    table: GradePointTable,
}

impl GpaEngine {
    pub fn new(table: GradePointTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GradePointTable {
        &self.table
    }

    pub fn compute_gpa(&self, courses: &[CourseRecord]) -> f64 {
        self.compute_gpa_excluding(courses, &HashSet::new())
    }

    /// Credit-weighted mean of grade points, skipping excluded codes.
    /// Returns 0.0 when no credits remain.
    pub fn compute_gpa_excluding(&self, courses: &[CourseRecord], excluded: &HashSet<&str>) -> f64 {
        let mut total_points = 0.0;
        let mut total_credits: u64 = 0;

        for course in courses {
            if excluded.contains(course.code.as_str()) {
                continue;
            }
            total_points += self.table.points_for(&course.grade) * f64::from(course.credits);
            total_credits += u64::from(course.credits);
        }

        if total_credits == 0 {
            0.0
        } else {
            total_points / total_credits as f64
        }
    }
}

pub fn total_credits(courses: &[CourseRecord]) -> u64 {
    courses.iter().map(|course| u64::from(course.credits)).sum()
}

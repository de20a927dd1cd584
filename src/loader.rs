use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::models::CourseRecord;

/// Loads `code,credits,grade` lines. Malformed lines are skipped with a
/// warning; the load fails only when nothing usable is left.
pub fn load_courses(path: &Path) -> anyhow::Result<Vec<CourseRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let courses =
        parse_courses(file).with_context(|| format!("failed to read {}", path.display()))?;

    if courses.is_empty() {
        bail!("no valid course entries found in {}", path.display());
    }

    debug!(path = %path.display(), courses = courses.len(), "Loaded course records");
    Ok(courses)
}

pub fn parse_courses<R: Read>(input: R) -> anyhow::Result<Vec<CourseRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut courses = Vec::new();
    let mut seen_first = false;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |pos| pos.line());

        if record.iter().all(str::is_empty) {
            continue;
        }

        let first = !seen_first;
        seen_first = true;

        if record.len() < 3 {
            warn!(line, content = %join(&record), "Invalid format, skipping line");
            continue;
        }

        if first && is_header(&record) {
            debug!(line, "Skipping header row");
            continue;
        }

        courses.push(CourseRecord::new(&record[0], parse_credits(&record[1]), &record[2]));
    }

    Ok(courses)
}

/// Anything other than a plain non-negative integer counts as 0 credits.
fn parse_credits(text: &str) -> u32 {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

fn is_header(record: &StringRecord) -> bool {
    record[0].eq_ignore_ascii_case("course_code") && record[1].eq_ignore_ascii_case("credits")
}

fn join(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

//! Result rendering for text and JSON output.
//!
//! Commands return the rendered string; `main` decides where it goes.

use anyhow::Result;
use serde::Serialize;
use virtulearn_core::{
    CascadeReport, Course, CourseOverview, Created, Enrollment, Instructor, InstructorSummary,
    StoreCounts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    json: bool,
}

impl Renderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn text() -> Self {
        Self::new(false)
    }

    /// Pretty JSON of `value`, or the text produced by `text`.
    pub fn render<T, F>(&self, value: &T, text: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        if self.json {
            return Ok(serde_json::to_string_pretty(value)?);
        }
        Ok(text(value))
    }

    /// A created record followed by one `warning[...]` line per fallback.
    pub fn created<T, F>(&self, created: &Created<T>, line: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        self.render(created, |created| {
            let mut lines = vec![line(&created.record)];
            lines.extend(
                created
                    .warnings
                    .iter()
                    .map(|warning| format!("warning[{}]: {warning}", warning.code())),
            );
            lines.join("\n")
        })
    }

    /// Lists one line per item, or `empty` when there are none.
    pub fn list<T, F>(&self, items: &[T], empty: &str, line: F) -> Result<String>
    where
        T: Serialize,
        F: Fn(&T) -> String,
    {
        self.render(items, |items| {
            if items.is_empty() {
                return empty.to_string();
            }
            items.iter().map(line).collect::<Vec<_>>().join("\n")
        })
    }
}

pub fn instructor_line(instructor: &Instructor) -> String {
    format!(
        "ID: {}, Name: {}, Expertise: {}, Email: {}",
        instructor.id,
        instructor.name,
        instructor.expertise,
        instructor.email.as_deref().unwrap_or("-")
    )
}

pub fn course_line(course: &Course) -> String {
    format!(
        "ID: {}, Title: {}, Duration: {} hours, Instructor ID: {}",
        course.id,
        course.title,
        course.duration,
        optional_id(course.instructor_id)
    )
}

pub fn enrollment_line(enrollment: &Enrollment) -> String {
    format!(
        "ID: {}, Student: {}, Email: {}, Date: {}, Course ID: {}, Instructor ID: {}",
        enrollment.id,
        enrollment.student_name,
        enrollment.student_email.as_deref().unwrap_or("-"),
        enrollment.enrollment_date.format("%Y-%m-%d %H:%M:%S"),
        enrollment.course_id,
        optional_id(enrollment.instructor_id)
    )
}

pub fn overview_line(course: &CourseOverview) -> String {
    format!("Title: {}, Duration: {} hours", course.title, course.duration)
}

pub fn cascade_text(entity: &str, id: i64, report: &CascadeReport) -> String {
    format!(
        "Deleted {entity} {id} ({} courses, {} enrollments removed)",
        report.courses_deleted, report.enrollments_deleted
    )
}

pub fn summary_text(summary: &InstructorSummary) -> String {
    if summary.instructors.is_empty() {
        return "No instructors found.".to_string();
    }
    summary
        .instructors
        .iter()
        .map(|entry| {
            format!(
                "Instructor: {}, Expertise: {}, Courses: {}",
                entry.name, entry.expertise, entry.course_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn counts_text(counts: &StoreCounts) -> String {
    format!(
        "Instructors: {}\nCourses: {}\nEnrollments: {}",
        counts.instructors, counts.courses, counts.enrollments
    )
}

fn optional_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

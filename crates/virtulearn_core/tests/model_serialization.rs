use serde_json::json;
use virtulearn_core::db::open_db_in_memory;
use virtulearn_core::{
    CourseService, Created, EnrollmentRequest, EnrollmentService, InstructorService, NewCourse,
    NewInstructor, OperationWarning, ReportService,
};

#[test]
fn instructor_serializes_with_nullable_email() {
    let conn = open_db_in_memory().unwrap();
    let ada = InstructorService::new(&conn)
        .create(NewInstructor::new("Ada", "Math"))
        .unwrap();

    let value = serde_json::to_value(&ada).unwrap();
    assert_eq!(
        value,
        json!({ "id": ada.id, "name": "Ada", "expertise": "Math", "email": null })
    );
}

#[test]
fn created_course_carries_tagged_warnings() {
    let conn = open_db_in_memory().unwrap();
    let created = CourseService::new(&conn)
        .create(NewCourse::new("Calculus", 40).with_instructor(7))
        .unwrap();

    let value = serde_json::to_value(&created).unwrap();
    assert_eq!(value["record"]["title"], "Calculus");
    assert_eq!(value["record"]["instructor_id"], serde_json::Value::Null);
    assert_eq!(
        value["warnings"],
        json!([{ "code": "unknown_instructor_dropped", "instructor_id": 7 }])
    );
}

#[test]
fn enrollment_date_serializes_as_iso_datetime() {
    let conn = open_db_in_memory().unwrap();
    let course = CourseService::new(&conn)
        .create(NewCourse::new("Calculus", 40))
        .unwrap()
        .record;
    let enrollment = EnrollmentService::new(&conn)
        .enroll(EnrollmentRequest {
            enrollment_date: Some("2024-03-15".to_string()),
            ..EnrollmentRequest::new("Sam", course.id)
        })
        .unwrap()
        .record;

    let value = serde_json::to_value(&enrollment).unwrap();
    assert_eq!(value["enrollment_date"], "2024-03-15T00:00:00");
    assert_eq!(value["student_email"], serde_json::Value::Null);
}

#[test]
fn summary_serializes_map_keyed_by_name() {
    let conn = open_db_in_memory().unwrap();
    InstructorService::new(&conn)
        .create(NewInstructor::new("Grace", "Navy"))
        .unwrap();

    let summary = ReportService::new(&conn).instructor_summary().unwrap();
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["course_counts"], json!({ "Grace": 0 }));
    assert_eq!(value["instructors"][0]["course_count"], 0);
}

#[test]
fn warning_display_and_code_agree() {
    let warning = OperationWarning::UnparsableEnrollmentDate {
        input: "soon".to_string(),
    };
    assert_eq!(warning.code(), "unparsable_enrollment_date");
    assert!(warning.to_string().contains("`soon`"));

    let created = Created {
        record: 1_u8,
        warnings: vec![warning],
    };
    assert!(created.has_warnings());
}

use virtulearn_core::db::open_db_in_memory;
use virtulearn_core::model::validation::parse_duration;
use virtulearn_core::{
    ConstraintKind, CoursePatch, CourseService, EntityKind, InstructorService, NewCourse,
    NewInstructor, OperationWarning, RepoError, ValidationError,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let ada = InstructorService::new(&conn)
        .create(NewInstructor::new("Ada", "Math"))
        .unwrap();
    let service = CourseService::new(&conn);

    let created = service
        .create(NewCourse::new("Calculus", 40).with_instructor(ada.id))
        .unwrap();
    assert!(!created.has_warnings());

    let loaded = service.get(created.record.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Calculus");
    assert_eq!(loaded.duration, 40);
    assert_eq!(loaded.instructor_id, Some(ada.id));
}

#[test]
fn unknown_instructor_on_create_is_dropped_with_warning() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);

    let created = service
        .create(NewCourse::new("Orphan Studies", 10).with_instructor(42))
        .unwrap();

    assert_eq!(created.record.instructor_id, None);
    assert_eq!(
        created.warnings,
        vec![OperationWarning::UnknownInstructorDropped { instructor_id: 42 }]
    );
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn duplicate_title_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);
    service.create(NewCourse::new("Calculus", 40)).unwrap();

    let err = service.create(NewCourse::new("Calculus", 12)).unwrap_err();
    match err {
        RepoError::Constraint(violation) => {
            assert_eq!(violation.entity, EntityKind::Course);
            assert_eq!(violation.field, "title");
            assert_eq!(violation.kind, ConstraintKind::Unique);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.count().unwrap(), 1);
}

#[test]
fn padded_title_collides_with_existing_title() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);
    service.create(NewCourse::new("Rust", 10)).unwrap();

    let err = service.create(NewCourse::new(" Rust", 10)).unwrap_err();
    match err {
        RepoError::Constraint(violation) => {
            assert_eq!(violation.field, "title");
            assert_eq!(violation.kind, ConstraintKind::Unique);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.count().unwrap(), 1);

    let go = service.create(NewCourse::new("Go ", 5)).unwrap().record;
    assert_eq!(go.title, "Go");
    let updated = service
        .update(
            go.id,
            CoursePatch {
                title: Some("  Go Basics ".to_string()),
                ..CoursePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Go Basics");
}

#[test]
fn non_positive_duration_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);

    for duration in [0, -3] {
        let err = service.create(NewCourse::new("Zero", duration)).unwrap_err();
        match err {
            RepoError::Constraint(violation) => {
                assert_eq!(violation.field, "duration");
                assert_eq!(violation.kind, ConstraintKind::Positive);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn non_integer_duration_is_a_validation_error() {
    let err = parse_duration("ten").unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotAnInteger {
            field: "duration",
            value: "ten".to_string()
        }
    );
    assert_eq!(RepoError::from(err).code(), "validation_error");
}

#[test]
fn schema_check_backs_up_duration_rule() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO courses (title, duration) VALUES ('Raw', 0);",
            [],
        )
        .unwrap_err();
    match RepoError::from(err) {
        RepoError::Constraint(violation) => {
            assert_eq!(violation.entity, EntityKind::Course);
            assert_eq!(violation.field, "duration");
            assert_eq!(violation.kind, ConstraintKind::Positive);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_changes_fields_and_rejects_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);
    let course = service.create(NewCourse::new("Calculus", 40)).unwrap().record;

    let updated = service
        .update(
            course.id,
            CoursePatch {
                title: Some("Calculus II".to_string()),
                duration: Some(45),
                ..CoursePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Calculus II");
    assert_eq!(updated.duration, 45);
    assert_eq!(service.get(course.id).unwrap().unwrap(), updated);

    let err = service
        .update(
            course.id + 100,
            CoursePatch {
                duration: Some(1),
                ..CoursePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Course,
            ..
        }
    ));
}

#[test]
fn update_with_invalid_duration_leaves_row_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);
    let course = service.create(NewCourse::new("Calculus", 40)).unwrap().record;

    let err = service
        .update(
            course.id,
            CoursePatch {
                duration: Some(0),
                ..CoursePatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "constraint_violation");
    assert_eq!(service.get(course.id).unwrap().unwrap(), course);
}

#[test]
fn assign_links_relinks_and_unlinks_instructor() {
    let conn = open_db_in_memory().unwrap();
    let instructors = InstructorService::new(&conn);
    let ada = instructors.create(NewInstructor::new("Ada", "Math")).unwrap();
    let grace = instructors.create(NewInstructor::new("Grace", "Navy")).unwrap();
    let service = CourseService::new(&conn);
    let course = service.create(NewCourse::new("Calculus", 40)).unwrap().record;

    let assigned = service.assign_instructor(course.id, Some(ada.id)).unwrap();
    assert_eq!(assigned.instructor_id, Some(ada.id));

    let reassigned = service.assign_instructor(course.id, Some(grace.id)).unwrap();
    assert_eq!(reassigned.instructor_id, Some(grace.id));
    assert!(instructors.courses(ada.id).unwrap().is_empty());

    let cleared = service.assign_instructor(course.id, None).unwrap();
    assert_eq!(cleared.instructor_id, None);
}

#[test]
fn assign_unknown_instructor_is_not_found_and_keeps_link() {
    let conn = open_db_in_memory().unwrap();
    let ada = InstructorService::new(&conn)
        .create(NewInstructor::new("Ada", "Math"))
        .unwrap();
    let service = CourseService::new(&conn);
    let course = service
        .create(NewCourse::new("Calculus", 40).with_instructor(ada.id))
        .unwrap()
        .record;

    let err = service.assign_instructor(course.id, Some(9_999)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Instructor,
            id: 9_999
        }
    ));
    assert_eq!(
        service.get(course.id).unwrap().unwrap().instructor_id,
        Some(ada.id)
    );
}

#[test]
fn assign_unknown_course_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let err = CourseService::new(&conn)
        .assign_instructor(3, None)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Course,
            id: 3
        }
    ));
}

#[test]
fn delete_unknown_course_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let err = CourseService::new(&conn).delete(8).unwrap_err();
    assert_eq!(err.code(), "not_found");
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(&conn);
    service.create(NewCourse::new("Zoology", 5)).unwrap();
    service.create(NewCourse::new("Art", 6)).unwrap();

    let titles = service
        .list()
        .unwrap()
        .into_iter()
        .map(|course| course.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Zoology", "Art"]);
}

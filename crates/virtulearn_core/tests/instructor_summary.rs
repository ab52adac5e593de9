use virtulearn_core::db::open_db_in_memory;
use virtulearn_core::{
    CourseOverview, CourseService, InstructorService, NewCourse, NewInstructor, ReportService,
};

#[test]
fn summary_counts_courses_per_instructor_including_zero() {
    let conn = open_db_in_memory().unwrap();
    let instructors = InstructorService::new(&conn);
    let courses = CourseService::new(&conn);
    let ada = instructors.create(NewInstructor::new("Ada", "Math")).unwrap();
    let grace = instructors.create(NewInstructor::new("Grace", "Navy")).unwrap();
    for title in ["Calculus", "Algebra", "Geometry"] {
        courses
            .create(NewCourse::new(title, 12).with_instructor(ada.id))
            .unwrap();
    }
    courses.create(NewCourse::new("Unassigned", 3)).unwrap();

    let summary = ReportService::new(&conn).instructor_summary().unwrap();

    assert_eq!(summary.instructors.len(), 2);
    assert_eq!(summary.instructors[0].instructor_id, ada.id);
    assert_eq!(summary.instructors[0].expertise, "Math");
    assert_eq!(summary.instructors[0].course_count, 3);
    assert_eq!(summary.instructors[1].instructor_id, grace.id);
    assert_eq!(summary.instructors[1].course_count, 0);
    assert_eq!(summary.course_count("Ada"), Some(3));
    assert_eq!(summary.course_count("Grace"), Some(0));
}

#[test]
fn summary_of_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let summary = ReportService::new(&conn).instructor_summary().unwrap();
    assert!(summary.instructors.is_empty());
    assert!(summary.course_counts.is_empty());
}

#[test]
fn course_overview_lists_title_and_duration_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let ada = InstructorService::new(&conn)
        .create(NewInstructor::new("Ada", "Math"))
        .unwrap();
    let courses = CourseService::new(&conn);
    courses
        .create(NewCourse::new("Calculus", 40).with_instructor(ada.id))
        .unwrap();
    courses
        .create(NewCourse::new("Algebra", 25).with_instructor(ada.id))
        .unwrap();

    let report = ReportService::new(&conn);
    assert_eq!(
        report.instructor_course_overview(ada.id).unwrap(),
        vec![
            CourseOverview {
                title: "Calculus".to_string(),
                duration: 40
            },
            CourseOverview {
                title: "Algebra".to_string(),
                duration: 25
            },
        ]
    );
    assert!(report.instructor_course_overview(ada.id + 1).unwrap().is_empty());
}

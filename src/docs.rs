use crate::api::attendance::{AttendanceRecord, MarkAttendance, MarkAttendanceResponse};
use crate::api::students::CreateStudent;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::student::Student;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student Attendance API",
        version = "1.0.0",
        description = r#"
## Student Attendance Service

Tracks students and their daily attendance status.

### Features
- **Students**: register a student with a unique roll, list all students
- **Attendance**: mark Present/Absent per student and day (idempotent upsert),
  list records by date with students expanded, list a single student's history

### Response Format
JSON-based RESTful responses. Validation and conflict errors come back as
`400 {"message": ...}`; unexpected failures as `500 {"message": "Server error"}`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::health_check,

        crate::api::students::create_student,
        crate::api::students::list_students,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::student_attendance,
    ),
    components(
        schemas(
            Student,
            CreateStudent,
            Attendance,
            AttendanceStatus,
            MarkAttendance,
            MarkAttendanceResponse,
            AttendanceRecord
        )
    ),
    tags(
        (name = "Health", description = "Service health probe"),
        (name = "Student", description = "Student registry APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
    )
)]
pub struct ApiDoc;

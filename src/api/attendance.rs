use crate::{
    db::{ER_NO_REFERENCED_ROW, mysql_error_number},
    model::attendance::{Attendance, AttendanceStatus},
    model::student::Student,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[serde(rename = "studentId")]
    #[schema(example = 1)]
    pub student_id: Option<u64>,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: Option<String>,
    #[schema(example = "Present", value_type = String)]
    pub status: Option<String>,
}

impl MarkAttendance {
    /// Presence first, then shape: the date must be a real `YYYY-MM-DD`
    /// calendar date and the status one of the known variants.
    fn validated(&self) -> Result<(u64, NaiveDate, AttendanceStatus), &'static str> {
        let date = self.date.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (student_id, date, status) = match (self.student_id, date, status) {
            (Some(student_id), Some(date), Some(status)) => (student_id, date, status),
            _ => return Err("studentId, date, and status are required"),
        };

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| "date must be in YYYY-MM-DD format")?;
        let status = status
            .parse::<AttendanceStatus>()
            .map_err(|_| "status must be Present or Absent")?;

        Ok((student_id, date, status))
    }
}

#[derive(Serialize, ToSchema)]
pub struct MarkAttendanceResponse {
    #[schema(example = "Attendance marked")]
    pub message: String,
    pub attendance: Attendance,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Restrict results to a single YYYY-MM-DD date
    pub date: Option<String>,
}

/// Attendance row with the referenced student expanded.
#[derive(Serialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    pub student: Student,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub status: AttendanceStatus,
}

#[derive(sqlx::FromRow)]
struct AttendanceStudentRow {
    id: u64,
    date: NaiveDate,
    status: AttendanceStatus,
    student_id: u64,
    student_name: String,
    student_roll: String,
}

/// Mark attendance (upsert per student and date)
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked", body = MarkAttendanceResponse),
        (status = 200, description = "Attendance updated", body = MarkAttendanceResponse),
        (status = 400, description = "Missing or malformed fields", body = Object, example = json!({
            "message": "studentId, date, and status are required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkAttendance>,
) -> impl Responder {
    let (student_id, date, status) = match payload.validated() {
        Ok(fields) => fields,
        Err(message) => {
            return HttpResponse::BadRequest().json(json!({ "message": message }));
        }
    };

    // Single atomic upsert on the (student_id, date) unique key. Two
    // concurrent identical requests cannot produce a duplicate row;
    // rows_affected is 1 for an insert, 2 for an update, 0 when the
    // status already matched.
    let result = sqlx::query(
        "INSERT INTO attendance (student_id, date, status) VALUES (?, ?, ?) \
         ON DUPLICATE KEY UPDATE status = VALUES(status)",
    )
    .bind(student_id)
    .bind(date)
    .bind(status)
    .execute(pool.get_ref())
    .await;

    let created = match result {
        Ok(res) => res.rows_affected() == 1,

        Err(e) => {
            if mysql_error_number(&e) == Some(ER_NO_REFERENCED_ROW) {
                return HttpResponse::BadRequest().json(json!({
                    "message": "Student not found"
                }));
            }

            error!(error = %e, student_id, %date, "Failed to mark attendance");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Server error"
            }));
        }
    };

    let attendance = sqlx::query_as::<_, Attendance>(
        "SELECT id, student_id, date, status FROM attendance WHERE student_id = ? AND date = ?",
    )
    .bind(student_id)
    .bind(date)
    .fetch_one(pool.get_ref())
    .await;

    match attendance {
        Ok(attendance) if created => HttpResponse::Created().json(MarkAttendanceResponse {
            message: "Attendance marked".to_string(),
            attendance,
        }),
        Ok(attendance) => HttpResponse::Ok().json(MarkAttendanceResponse {
            message: "Attendance updated".to_string(),
            attendance,
        }),
        Err(e) => {
            error!(error = %e, student_id, %date, "Failed to read back attendance");
            HttpResponse::InternalServerError().json(json!({
                "message": "Server error"
            }))
        }
    }
}

/// List attendance, optionally for one date, with students expanded
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records ordered by date", body = [AttendanceRecord]),
        (status = 400, description = "Malformed date filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> impl Responder {
    let date_filter = match &query.date {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                return HttpResponse::BadRequest().json(json!({
                    "message": "date must be in YYYY-MM-DD format"
                }));
            }
        },
        None => None,
    };

    let base = "SELECT a.id, a.date, a.status, \
                s.id AS student_id, s.name AS student_name, s.roll AS student_roll \
                FROM attendance a \
                INNER JOIN students s ON s.id = a.student_id";

    let sql = if date_filter.is_some() {
        format!("{base} WHERE a.date = ? ORDER BY a.date ASC, a.id ASC")
    } else {
        format!("{base} ORDER BY a.date ASC, a.id ASC")
    };

    let mut rows_query = sqlx::query_as::<_, AttendanceStudentRow>(&sql);
    if let Some(date) = date_filter {
        rows_query = rows_query.bind(date);
    }

    match rows_query.fetch_all(pool.get_ref()).await {
        Ok(rows) => {
            let records: Vec<AttendanceRecord> = rows
                .into_iter()
                .map(|row| AttendanceRecord {
                    id: row.id,
                    student: Student {
                        id: row.student_id,
                        name: row.student_name,
                        roll: row.student_roll,
                    },
                    date: row.date,
                    status: row.status,
                })
                .collect();

            HttpResponse::Ok().json(records)
        }
        Err(e) => {
            error!(error = %e, "Failed to list attendance");
            HttpResponse::InternalServerError().json(json!({
                "message": "Server error"
            }))
        }
    }
}

/// List attendance for one student
#[utoipa::path(
    get,
    path = "/api/attendance/student/{id}",
    params(
        ("id", Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Attendance for the student ordered by date; empty for an unknown id", body = [Attendance]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn student_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> impl Responder {
    let student_id = path.into_inner();

    let result = sqlx::query_as::<_, Attendance>(
        "SELECT id, student_id, date, status FROM attendance \
         WHERE student_id = ? ORDER BY date ASC, id ASC",
    )
    .bind(student_id)
    .fetch_all(pool.get_ref())
    .await;

    match result {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            error!(error = %e, student_id, "Failed to list student attendance");
            HttpResponse::InternalServerError().json(json!({
                "message": "Server error"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    fn lazy_pool() -> MySqlPool {
        MySqlPool::connect_lazy("mysql://root@127.0.0.1:3306/attendance_test")
            .expect("lazy pool")
    }

    fn payload(student_id: Option<u64>, date: Option<&str>, status: Option<&str>) -> MarkAttendance {
        MarkAttendance {
            student_id,
            date: date.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[::core::prelude::v1::test]
    fn validated_accepts_complete_payload() {
        let (student_id, date, status) = payload(Some(7), Some("2024-01-01"), Some("Present"))
            .validated()
            .expect("valid payload");

        assert_eq!(student_id, 7);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(status, AttendanceStatus::Present);
    }

    #[::core::prelude::v1::test]
    fn validated_requires_every_field() {
        for p in [
            payload(None, Some("2024-01-01"), Some("Present")),
            payload(Some(7), None, Some("Present")),
            payload(Some(7), Some("2024-01-01"), None),
            payload(Some(7), Some("  "), Some("Present")),
        ] {
            assert_eq!(
                p.validated().unwrap_err(),
                "studentId, date, and status are required"
            );
        }
    }

    #[::core::prelude::v1::test]
    fn validated_rejects_malformed_date() {
        let p = payload(Some(7), Some("01-01-2024"), Some("Present"));
        assert_eq!(p.validated().unwrap_err(), "date must be in YYYY-MM-DD format");

        let p = payload(Some(7), Some("2024-02-30"), Some("Present"));
        assert_eq!(p.validated().unwrap_err(), "date must be in YYYY-MM-DD format");
    }

    #[::core::prelude::v1::test]
    fn validated_rejects_unknown_status() {
        let p = payload(Some(7), Some("2024-01-01"), Some("Late"));
        assert_eq!(p.validated().unwrap_err(), "status must be Present or Absent");
    }

    #[actix_web::test]
    async fn mark_attendance_rejects_missing_fields() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .route("/api/attendance", web::post().to(mark_attendance)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "studentId": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "studentId, date, and status are required");
    }

    #[actix_web::test]
    async fn mark_attendance_rejects_bad_status_before_any_query() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .route("/api/attendance", web::post().to(mark_attendance)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({ "studentId": 1, "date": "2024-01-01", "status": "Sick" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "status must be Present or Absent");
    }

    #[actix_web::test]
    async fn list_attendance_rejects_malformed_date_filter() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .route("/api/attendance", web::get().to(list_attendance)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/attendance?date=yesterday")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "date must be in YYYY-MM-DD format");
    }
}

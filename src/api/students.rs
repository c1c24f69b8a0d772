use crate::{
    db::{ER_DUP_ENTRY, mysql_error_number},
    model::student::Student,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateStudent {
    #[schema(example = "Ann", value_type = String)]
    pub name: Option<String>,
    #[schema(example = "R1", value_type = String)]
    pub roll: Option<String>,
}

impl CreateStudent {
    /// Both fields must be present and non-blank after trimming.
    fn validated(&self) -> Result<(&str, &str), &'static str> {
        let name = self.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let roll = self.roll.as_deref().map(str::trim).filter(|s| !s.is_empty());

        match (name, roll) {
            (Some(name), Some(roll)) => Ok((name, roll)),
            _ => Err("Name and roll are required"),
        }
    }
}

/// Add a new student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Missing fields or duplicate roll", body = Object, example = json!({
            "message": "Student with this roll already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn create_student(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateStudent>,
) -> impl Responder {
    let (name, roll) = match payload.validated() {
        Ok(fields) => fields,
        Err(message) => {
            return HttpResponse::BadRequest().json(json!({ "message": message }));
        }
    };

    // The unique key on roll decides the conflict, not a prior lookup.
    let result = sqlx::query("INSERT INTO students (name, roll) VALUES (?, ?)")
        .bind(name)
        .bind(roll)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => HttpResponse::Created().json(Student {
            id: res.last_insert_id(),
            name: name.to_string(),
            roll: roll.to_string(),
        }),

        Err(e) => {
            if mysql_error_number(&e) == Some(ER_DUP_ENTRY) {
                return HttpResponse::BadRequest().json(json!({
                    "message": "Student with this roll already exists"
                }));
            }

            error!(error = %e, roll, "Failed to add student");
            HttpResponse::InternalServerError().json(json!({
                "message": "Server error"
            }))
        }
    }
}

/// List all students
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All students ordered by roll", body = [Student]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn list_students(pool: web::Data<MySqlPool>) -> impl Responder {
    let result =
        sqlx::query_as::<_, Student>("SELECT id, name, roll FROM students ORDER BY roll ASC")
            .fetch_all(pool.get_ref())
            .await;

    match result {
        Ok(students) => HttpResponse::Ok().json(students),
        Err(e) => {
            error!(error = %e, "Failed to list students");
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
        // Never connects: the validation paths under test respond before
        // any query is issued.
        MySqlPool::connect_lazy("mysql://root@127.0.0.1:3306/attendance_test")
            .expect("lazy pool")
    }

    #[::core::prelude::v1::test]
    fn validated_accepts_trimmed_fields() {
        let payload = CreateStudent {
            name: Some("  Ann ".to_string()),
            roll: Some("R1".to_string()),
        };
        assert_eq!(payload.validated(), Ok(("Ann", "R1")));
    }

    #[::core::prelude::v1::test]
    fn validated_rejects_missing_or_blank_fields() {
        let missing_roll = CreateStudent {
            name: Some("Ann".to_string()),
            roll: None,
        };
        assert_eq!(missing_roll.validated(), Err("Name and roll are required"));

        let blank_name = CreateStudent {
            name: Some("   ".to_string()),
            roll: Some("R1".to_string()),
        };
        assert_eq!(blank_name.validated(), Err("Name and roll are required"));
    }

    #[actix_web::test]
    async fn create_student_rejects_empty_payload() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .route("/api/students", web::post().to(create_student)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Name and roll are required");
    }

    #[actix_web::test]
    async fn create_student_rejects_blank_roll() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .route("/api/students", web::post().to(create_student)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({ "name": "Ann", "roll": "  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Name and roll are required");
    }
}

use actix_web::{HttpResponse, Responder};

/// Health check
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "API is reachable", body = String, example = json!("Student Attendance API working"))
    ),
    tag = "Health"
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("Student Attendance API working")
}

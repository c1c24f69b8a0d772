use crate::{
    api::{attendance, health, students},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            // /api
            .service(web::resource("").route(web::get().to(health::health_check)))
            // /api/students
            .service(
                web::resource("/students")
                    .route(web::post().to(students::create_student))
                    .route(web::get().to(students::list_students)),
            )
            // /api/attendance
            .service(
                web::resource("/attendance")
                    .route(web::post().to(attendance::mark_attendance))
                    .route(web::get().to(attendance::list_attendance)),
            )
            // /api/attendance/student/{id}
            .service(
                web::resource("/attendance/student/{id}")
                    .route(web::get().to(attendance::student_attendance)),
            ),
    );
}

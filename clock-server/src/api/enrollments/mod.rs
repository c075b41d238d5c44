//! Enrollment API Module
//!
//! Templates stored on the sensor and their link to employees.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/enrollments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::enroll))
        .route("/register", post(handler::register))
        .route("/orphans", get(handler::orphans))
        .route("/{enrollment_id}", delete(handler::delete))
}

use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::utils::response::success;

pub mod admin;
pub mod events;
pub mod gallery;
pub mod registrations;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "eventide-api",
    };

    success(payload, "Health check successful").into_response()
}

// Field-complaint vocabulary shared by the payload validators.

pub(crate) fn required(fields: &mut Map<String, Value>, name: &str) {
    fields.insert(name.to_string(), json!("This field is required."));
}

pub(crate) fn blank(fields: &mut Map<String, Value>, name: &str) {
    fields.insert(name.to_string(), json!("This field may not be blank."));
}

pub(crate) fn too_long(fields: &mut Map<String, Value>, name: &str, max: usize) {
    fields.insert(
        name.to_string(),
        json!(format!(
            "Ensure this field has no more than {max} characters."
        )),
    );
}

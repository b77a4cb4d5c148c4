use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{appointment, auth, availability, health, holiday, patient, professional, service, slot, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Accounts (admin)
        .route("/api/v1/users", post(user::create_user).get(user::list_users))
        .route("/api/v1/users/{user_id}", delete(user::delete_user))

        // Patients
        .route("/api/v1/patients", post(patient::create_patient).get(patient::list_patients))
        .route("/api/v1/patients/{patient_id}", get(patient::get_patient))

        // Professionals
        .route("/api/v1/professionals", post(professional::create_professional).get(professional::list_professionals))
        .route("/api/v1/professionals/{professional_id}", get(professional::get_professional).put(professional::update_professional))

        // Service catalog
        .route("/api/v1/services", post(service::create_service).get(service::list_services))
        .route("/api/v1/services/{service_id}", put(service::update_service))

        // Availability rules & exceptions
        .route("/api/v1/professionals/{professional_id}/availability", post(availability::create_rule).get(availability::list_rules))
        .route("/api/v1/availability/{rule_id}", put(availability::update_rule))
        .route("/api/v1/professionals/{professional_id}/exceptions", post(availability::create_exception).get(availability::list_exceptions))
        .route("/api/v1/professionals/{professional_id}/exceptions/{exception_id}", delete(availability::delete_exception))

        // Clinic holidays
        .route("/api/v1/holidays", post(holiday::create_holiday).get(holiday::list_holidays))
        .route("/api/v1/holidays/{date}", delete(holiday::delete_holiday))

        // Slot materialization & public booking flow
        .route("/api/v1/professionals/{professional_id}/slots/generate", post(slot::generate_slots))
        .route("/api/v1/professionals/{professional_id}/slots", get(slot::list_slots))
        .route("/api/v1/professionals/{professional_id}/dates", get(slot::available_dates))
        .route("/api/v1/slots/{slot_id}/break", post(slot::mark_break))
        .route("/api/v1/slots/{slot_id}/release", post(slot::release_break))

        // Appointments
        .route("/api/v1/appointments", post(appointment::book_appointment).get(appointment::list_appointments))
        .route("/api/v1/appointments/{appointment_id}", get(appointment::get_appointment))
        .route("/api/v1/appointments/{appointment_id}/reschedule", post(appointment::reschedule_appointment))
        .route("/api/v1/appointments/{appointment_id}/cancel", post(appointment::cancel_appointment))
        .route("/api/v1/appointments/{appointment_id}/confirm", post(appointment::confirm_appointment))
        .route("/api/v1/appointments/{appointment_id}/complete", post(appointment::complete_appointment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

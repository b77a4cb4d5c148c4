mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use common::{parse_body, seed_patient, seed_schedule, TestApp, ADMIN_PASSWORD};
use serde_json::json;
use tower::ServiceExt;

fn next_weekday(target: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != target {
        date += Duration::days(1);
    }
    date
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"username": "admin", "password": "wrong"}).to_string()))
            .unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"username": "admin", "password": ADMIN_PASSWORD}).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let refresh_cookie = res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .find(|c| c.contains("refresh_token="))
        .expect("No refresh_token cookie returned");

    let start = refresh_cookie.find("refresh_token=").unwrap() + 14;
    let end = refresh_cookie[start..].find(';').unwrap_or(refresh_cookie.len() - start);
    let refresh_token = &refresh_cookie[start..start + end];

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/refresh")
            .header(header::COOKIE, format!("refresh_token={}", refresh_token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(parse_body(res).await["csrf_token"].is_string());

    // The old refresh token was burned on rotation.
    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/refresh")
            .header(header::COOKIE, format!("refresh_token={}", refresh_token))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutations_require_csrf_header() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/patients")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"full_name": "P", "email": "p@p.com"}).to_string()))
            .unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unauthenticated_requests_are_rejected() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/patients")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"full_name": "P", "email": "p@p.com"}).to_string()))
            .unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patient_role_boundaries() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;
    let (professional_id, service_id) = seed_schedule(&app, &admin, "FREQ=WEEKLY;BYDAY=MO", "09:00", "12:00", 60).await;

    let own_patient_id = seed_patient(&app, &admin).await;
    let other_res = app.post(&admin, "/api/v1/patients", json!({
        "full_name": "Other Patient",
        "email": "other@example.com"
    })).await;
    let other_patient_id = parse_body(other_res).await["id"].as_str().unwrap().to_string();

    let user_res = app.post(&admin, "/api/v1/users", json!({
        "username": "pat",
        "password": "pat-password",
        "role": "PATIENT",
        "patient_id": own_patient_id
    })).await;
    assert_eq!(user_res.status(), StatusCode::OK);

    let monday = next_weekday(Weekday::Mon);
    app.post(&admin, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": monday,
        "end_date": monday
    })).await;
    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, monday)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();

    let patient_auth = app.login("pat", "pat-password").await;

    // Patients cannot touch staff surfaces.
    let res = app.post(&patient_auth, "/api/v1/professionals", json!({
        "full_name": "Dr. Rogue",
        "specialty": "None"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Patients cannot book for somebody else.
    let res = app.post(&patient_auth, "/api/v1/appointments", json!({
        "time_slot_id": slots[0]["id"],
        "service_id": service_id,
        "patient_id": other_patient_id,
        "reason": "Checkup"
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Booking for themself is fine.
    let res = app.post(&patient_auth, "/api/v1/appointments", json!({
        "time_slot_id": slots[0]["id"],
        "service_id": service_id,
        "patient_id": own_patient_id,
        "reason": "Checkup"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // And they only see their own appointments.
    let res = app.get_authed(&patient_auth, "/api/v1/appointments").await;
    let appointments = parse_body(res).await;
    assert_eq!(appointments.as_array().unwrap().len(), 1);
}

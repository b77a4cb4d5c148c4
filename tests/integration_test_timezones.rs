mod common;

use axum::http::StatusCode;
use common::{parse_body, seed_patient, TestApp, AuthHeaders};
use serde_json::json;

async fn seed_professional(app: &TestApp, auth: &AuthHeaders) -> String {
    let res = app.post(auth, "/api/v1/professionals", json!({
        "full_name": "Dr. Zoned",
        "specialty": "General"
    })).await;
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_berlin_rule_materializes_as_utc_instants() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let professional_id = seed_professional(&app, &auth).await;

    let res = app.post(&auth, &format!("/api/v1/professionals/{}/availability", professional_id), json!({
        "recurrence": "FREQ=WEEKLY;BYDAY=MO",
        "start_time": "09:00",
        "end_time": "12:00",
        "timezone": "Europe/Berlin",
        "slot_duration_min": 60
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    // 2027-06-07 is a Monday; Berlin is UTC+2 in June.
    let gen = app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": "2027-06-07",
        "end_date": "2027-06-07"
    })).await;
    assert_eq!(parse_body(gen).await["created"], 3);

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date=2027-06-07", professional_id)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();

    assert_eq!(slots.len(), 3);
    assert!(slots[0]["start_at"].as_str().unwrap().contains("T07:00:00"));
    assert!(slots[2]["start_at"].as_str().unwrap().contains("T09:00:00"));
}

#[tokio::test]
async fn test_dst_spring_forward_gap() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let professional_id = seed_professional(&app, &auth).await;

    // Berlin springs forward on 2026-03-29 (a Sunday): 02:00 local jumps to
    // 03:00 local. The window covers the gap.
    app.post(&auth, &format!("/api/v1/professionals/{}/availability", professional_id), json!({
        "recurrence": "FREQ=WEEKLY;BYDAY=SU",
        "start_time": "01:00",
        "end_time": "06:00",
        "timezone": "Europe/Berlin",
        "slot_duration_min": 30
    })).await;

    let gen = app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": "2026-03-29",
        "end_date": "2026-03-29"
    })).await;
    // 01:00 CET (00:00Z) through 06:00 CEST (04:00Z): four real hours, eight
    // half-hour slots. The skipped wall-clock hour costs nothing in instants.
    assert_eq!(parse_body(gen).await["created"], 8);

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date=2026-03-29", professional_id)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 8);

    // 01:30 local before the jump...
    assert!(slots.iter().any(|s| s["start_at"].as_str().unwrap().contains("T00:30:00")));
    // ...and 03:00 local right after it.
    assert!(slots.iter().any(|s| s["start_at"].as_str().unwrap().contains("T01:00:00")));
}

#[tokio::test]
async fn test_booking_works_across_zones() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let professional_id = seed_professional(&app, &auth).await;
    let patient_id = seed_patient(&app, &auth).await;

    let s_res = app.post(&auth, "/api/v1/services", json!({
        "name": "Consultation",
        "price_cents": 5000
    })).await;
    let service_id = parse_body(s_res).await["id"].as_str().unwrap().to_string();

    app.post(&auth, &format!("/api/v1/professionals/{}/availability", professional_id), json!({
        "recurrence": "FREQ=WEEKLY;BYDAY=MO",
        "start_time": "09:00",
        "end_time": "10:00",
        "timezone": "America/New_York",
        "slot_duration_min": 60
    })).await;

    app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": "2027-06-07",
        "end_date": "2027-06-07"
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date=2027-06-07", professional_id)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 1);
    // 09:00 EDT == 13:00 UTC.
    assert!(slots[0]["start_at"].as_str().unwrap().contains("T13:00:00"));

    let book = app.post(&auth, "/api/v1/appointments", json!({
        "time_slot_id": slots[0]["id"],
        "service_id": service_id,
        "patient_id": patient_id,
        "reason": "Remote consult"
    })).await;
    assert_eq!(book.status(), StatusCode::CREATED);
}

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use common::{parse_body, seed_patient, seed_schedule, TestApp, AuthHeaders};
use serde_json::json;

fn next_weekday(target: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != target {
        date += Duration::days(1);
    }
    date
}

/// Seeds a 09:00-12:00 hourly schedule and books the 11:00 slot, leaving
/// 09:00 (gap of 60 min to the booking) and 10:00 (gap of 0) open.
async fn seed_and_book_eleven(app: &TestApp, auth: &AuthHeaders, date: NaiveDate) -> String {
    let (professional_id, service_id) = seed_schedule(app, auth, "FREQ=WEEKLY;BYDAY=WE", "09:00", "12:00", 60).await;
    let patient_id = seed_patient(app, auth).await;

    app.post(auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": date,
        "end_date": date
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    let eleven = slots.iter()
        .find(|s| s["start_at"].as_str().unwrap().contains("T11:00:00"))
        .unwrap()["id"].as_str().unwrap().to_string();

    let book = app.post(auth, "/api/v1/appointments", json!({
        "time_slot_id": eleven,
        "service_id": service_id,
        "patient_id": patient_id,
        "reason": "Checkup"
    })).await;
    assert_eq!(book.status(), StatusCode::CREATED);

    professional_id
}

#[tokio::test]
async fn test_gap_equal_to_buffer_is_excluded() {
    // Buffer 60: the 09:00-10:00 slot ends exactly 60 minutes before the
    // 11:00 booking and must be filtered out, as must the adjacent 10:00.
    let app = TestApp::with_buffer(60).await;
    let auth = app.login_admin().await;
    let date = next_weekday(Weekday::Wed);

    let professional_id = seed_and_book_eleven(&app, &auth, date).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert!(slots.is_empty(), "expected no bookable slots, got {:?}", slots);
}

#[tokio::test]
async fn test_gap_greater_than_buffer_is_included() {
    // Buffer 59: the 09:00-10:00 slot leaves 60 > 59 minutes and survives;
    // the adjacent 10:00-11:00 slot still violates.
    let app = TestApp::with_buffer(59).await;
    let auth = app.login_admin().await;
    let date = next_weekday(Weekday::Wed);

    let professional_id = seed_and_book_eleven(&app, &auth, date).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 1);
    assert!(slots[0]["start_at"].as_str().unwrap().contains("T09:00:00"));
}

#[tokio::test]
async fn test_zero_buffer_only_hides_the_booked_slot() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let date = next_weekday(Weekday::Wed);

    let professional_id = seed_and_book_eleven(&app, &auth, date).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 2);
    assert!(!slots.iter().any(|s| s["start_at"].as_str().unwrap().contains("T11:00:00")));
}

#[tokio::test]
async fn test_buffer_does_not_pad_generation() {
    // Slots are generated back-to-back regardless of the buffer; the gap
    // policy only bites at read time once something is booked.
    let app = TestApp::with_buffer(60).await;
    let auth = app.login_admin().await;
    let (professional_id, _) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=WE", "09:00", "12:00", 60).await;
    let date = next_weekday(Weekday::Wed);

    let gen_res = app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": date,
        "end_date": date
    })).await;
    assert_eq!(parse_body(gen_res).await["created"], 3);

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    assert_eq!(parse_body(res).await["slots"].as_array().unwrap().len(), 3);
}

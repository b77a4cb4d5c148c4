mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use common::{parse_body, seed_patient, seed_schedule, TestApp, AuthHeaders};
use serde_json::{json, Value};

fn next_weekday(target: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != target {
        date += Duration::days(1);
    }
    date
}

/// Generates the day's slots and books the one at `index`, returning
/// (appointment, ordered slot list).
async fn book_nth_slot(
    app: &TestApp,
    auth: &AuthHeaders,
    professional_id: &str,
    service_id: &str,
    patient_id: &str,
    date: NaiveDate,
    index: usize,
) -> (Value, Vec<Value>) {
    app.post(auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": date,
        "end_date": date
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();

    let book_res = app.post(auth, "/api/v1/appointments", json!({
        "time_slot_id": slots[index]["id"],
        "service_id": service_id,
        "patient_id": patient_id,
        "reason": "Checkup"
    })).await;
    assert_eq!(book_res.status(), StatusCode::CREATED);

    (parse_body(book_res).await, slots)
}

#[tokio::test]
async fn test_reschedule_moves_appointment_and_swaps_slots() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, service_id) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=TH", "09:00", "12:00", 60).await;
    let patient_id = seed_patient(&app, &auth).await;
    let date = next_weekday(Weekday::Thu);

    let (appointment, slots) = book_nth_slot(&app, &auth, &professional_id, &service_id, &patient_id, date, 0).await;
    let old_slot_id = slots[0]["id"].as_str().unwrap();
    let new_slot_id = slots[1]["id"].as_str().unwrap();

    let res = app.post(&auth, &format!("/api/v1/appointments/{}/reschedule", appointment["id"].as_str().unwrap()), json!({
        "new_time_slot_id": new_slot_id
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["time_slot_id"], new_slot_id);

    // Old slot is back in the pool, new slot is gone.
    let list = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let open = parse_body(list).await["slots"].as_array().unwrap().clone();
    assert!(open.iter().any(|s| s["id"] == old_slot_id));
    assert!(!open.iter().any(|s| s["id"] == new_slot_id));
}

#[tokio::test]
async fn test_failed_reschedule_keeps_old_slot_booked() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, service_id) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=TH", "09:00", "12:00", 60).await;
    let patient_id = seed_patient(&app, &auth).await;
    let date = next_weekday(Weekday::Thu);

    let (appointment, slots) = book_nth_slot(&app, &auth, &professional_id, &service_id, &patient_id, date, 0).await;
    let old_slot_id = slots[0]["id"].as_str().unwrap();
    let target_slot_id = slots[1]["id"].as_str().unwrap();

    // A third party takes the target slot first.
    let steal = app.post(&auth, "/api/v1/appointments", json!({
        "time_slot_id": target_slot_id,
        "service_id": service_id,
        "patient_id": patient_id,
        "reason": "Other visit"
    })).await;
    assert_eq!(steal.status(), StatusCode::CREATED);

    let res = app.post(&auth, &format!("/api/v1/appointments/{}/reschedule", appointment["id"].as_str().unwrap()), json!({
        "new_time_slot_id": target_slot_id
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;

    // The courtesy list points at the remaining open slot.
    let alternatives = body["alternatives"].as_array().unwrap();
    assert!(alternatives.iter().any(|s| s["id"] == slots[2]["id"]));

    // Atomicity: the old slot must NOT have been released.
    let appt_res = app.get_authed(&auth, &format!("/api/v1/appointments/{}", appointment["id"].as_str().unwrap())).await;
    assert_eq!(parse_body(appt_res).await["time_slot_id"], old_slot_id);

    let list = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, date)).await;
    let open = parse_body(list).await["slots"].as_array().unwrap().clone();
    assert!(!open.iter().any(|s| s["id"] == old_slot_id), "old slot leaked back to AVAILABLE");
}

#[tokio::test]
async fn test_reschedule_to_current_slot_is_noop() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, service_id) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=TH", "09:00", "12:00", 60).await;
    let patient_id = seed_patient(&app, &auth).await;

    let (appointment, slots) = book_nth_slot(&app, &auth, &professional_id, &service_id, &patient_id, next_weekday(Weekday::Thu), 0).await;

    let res = app.post(&auth, &format!("/api/v1/appointments/{}/reschedule", appointment["id"].as_str().unwrap()), json!({
        "new_time_slot_id": slots[0]["id"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["time_slot_id"], slots[0]["id"]);
}

#[tokio::test]
async fn test_closed_appointment_cannot_be_rescheduled() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, service_id) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=TH", "09:00", "12:00", 60).await;
    let patient_id = seed_patient(&app, &auth).await;

    let (appointment, slots) = book_nth_slot(&app, &auth, &professional_id, &service_id, &patient_id, next_weekday(Weekday::Thu), 0).await;
    let appointment_id = appointment["id"].as_str().unwrap();

    app.post(&auth, &format!("/api/v1/appointments/{}/cancel", appointment_id), json!({})).await;

    let res = app.post(&auth, &format!("/api/v1/appointments/{}/reschedule", appointment_id), json!({
        "new_time_slot_id": slots[1]["id"]
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reschedule_across_professionals_adopts_new_professional() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_a, service_id) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=TH", "09:00", "11:00", 60).await;
    let patient_id = seed_patient(&app, &auth).await;
    let date = next_weekday(Weekday::Thu);

    let (appointment, _) = book_nth_slot(&app, &auth, &professional_a, &service_id, &patient_id, date, 0).await;

    // Second professional with their own open slot.
    let p_res = app.post(&auth, "/api/v1/professionals", json!({
        "full_name": "Dr. Second",
        "specialty": "General"
    })).await;
    let professional_b = parse_body(p_res).await["id"].as_str().unwrap().to_string();

    app.post(&auth, &format!("/api/v1/professionals/{}/availability", professional_b), json!({
        "recurrence": "FREQ=WEEKLY;BYDAY=TH",
        "start_time": "14:00",
        "end_time": "16:00",
        "timezone": "UTC",
        "slot_duration_min": 60
    })).await;
    app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_b), json!({
        "start_date": date,
        "end_date": date
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_b, date)).await;
    let b_slots = parse_body(res).await["slots"].as_array().unwrap().clone();

    let res = app.post(&auth, &format!("/api/v1/appointments/{}/reschedule", appointment["id"].as_str().unwrap()), json!({
        "new_time_slot_id": b_slots[0]["id"]
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await;
    assert_eq!(updated["professional_id"], professional_b.as_str());
    assert_eq!(updated["time_slot_id"], b_slots[0]["id"]);
}

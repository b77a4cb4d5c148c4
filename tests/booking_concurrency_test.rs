mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use common::{parse_body, seed_patient, seed_schedule, TestApp};
use serde_json::json;
use tower::ServiceExt;

fn next_weekday(target: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != target {
        date += Duration::days(1);
    }
    date
}

/// The single-slot race: many bookers, one winner. The conditional update in
/// the booking transaction is the only synchronization, so every loser must
/// observe a zero-row update and surface 409.
#[tokio::test]
async fn test_concurrent_bookings_one_winner() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, service_id) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=MO", "09:00", "10:00", 60).await;
    let patient_id = seed_patient(&app, &auth).await;
    let monday = next_weekday(Weekday::Mon);

    app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": monday,
        "end_date": monday
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, monday)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 1);
    let slot_id = slots[0]["id"].as_str().unwrap().to_string();

    let attempts = 5;
    let mut handles = Vec::new();

    for i in 0..attempts {
        let router = app.router.clone();
        let access_token = auth.access_token.clone();
        let csrf_token = auth.csrf_token.clone();
        let slot_id = slot_id.clone();
        let service_id = service_id.clone();
        let patient_id = patient_id.clone();

        handles.push(tokio::spawn(async move {
            let payload = json!({
                "time_slot_id": slot_id,
                "service_id": service_id,
                "patient_id": patient_id,
                "reason": format!("Race attempt {}", i)
            });

            let response = router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/appointments")
                    .header(header::COOKIE, format!("access_token={}", access_token))
                    .header("X-CSRF-Token", csrf_token)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap()
            ).await.unwrap();

            response.status()
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status from racing booking: {}", other),
        }
    }

    assert_eq!(created, 1, "exactly one booking must win the race");
    assert_eq!(conflicts, attempts - 1);

    // At most one non-cancelled appointment references the slot.
    let res = app.get_authed(&auth, "/api/v1/appointments").await;
    let appointments = parse_body(res).await;
    let referencing: Vec<_> = appointments.as_array().unwrap().iter()
        .filter(|a| a["time_slot_id"] == slot_id.as_str() && a["status"] != "CANCELLED")
        .collect();
    assert_eq!(referencing.len(), 1);
}

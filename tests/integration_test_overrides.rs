mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use common::{parse_body, seed_schedule, TestApp};
use serde_json::json;

fn next_weekday(target: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != target {
        date += Duration::days(1);
    }
    date
}

#[tokio::test]
async fn test_holiday_suppresses_generation() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, _) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=MO", "09:00", "12:00", 60).await;

    let monday = next_weekday(Weekday::Mon);

    let hol_res = app.post(&auth, "/api/v1/holidays", json!({
        "date": monday,
        "name": "Founding Day"
    })).await;
    assert_eq!(hol_res.status(), StatusCode::OK);

    // An exception on the same date changes nothing: the holiday wins.
    app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": monday,
        "is_unavailable": false,
        "alt_start_time": "10:00",
        "alt_end_time": "14:00"
    })).await;

    let gen_res = app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": monday,
        "end_date": monday
    })).await;
    assert_eq!(parse_body(gen_res).await["created"], 0);

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, monday)).await;
    assert!(parse_body(res).await["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_negative_exception_blocks_single_day() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, _) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=MO,WE,FR", "09:00", "12:00", 60).await;

    let monday = next_weekday(Weekday::Mon);
    let wednesday = monday + Duration::days(2);
    let friday = monday + Duration::days(4);

    app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": wednesday,
        "is_unavailable": true,
        "reason": "staff meeting"
    })).await;

    app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": monday,
        "end_date": friday
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, wednesday)).await;
    assert!(parse_body(res).await["slots"].as_array().unwrap().is_empty());

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, monday)).await;
    assert_eq!(parse_body(res).await["slots"].as_array().unwrap().len(), 3);

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, friday)).await;
    assert_eq!(parse_body(res).await["slots"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_substitute_exception_replaces_day_window() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, _) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=MO,WE,FR", "09:00", "12:00", 60).await;

    let monday = next_weekday(Weekday::Mon);
    let wednesday = monday + Duration::days(2);

    // "Staff meeting 09:00-10:00" is expressed as a substitute window for
    // the remainder of the day.
    app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": wednesday,
        "is_unavailable": false,
        "alt_start_time": "10:00",
        "alt_end_time": "12:00",
        "reason": "staff meeting"
    })).await;

    app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": monday,
        "end_date": monday + Duration::days(4)
    })).await;

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, wednesday)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 2);
    assert!(slots[0]["start_at"].as_str().unwrap().contains("T10:00:00"));
    assert!(slots[1]["start_at"].as_str().unwrap().contains("T11:00:00"));

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, monday)).await;
    assert_eq!(parse_body(res).await["slots"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_blocking_exception_rejects_substitute_times() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, _) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=MO", "09:00", "12:00", 60).await;

    let res = app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": next_weekday(Weekday::Mon),
        "is_unavailable": true,
        "alt_start_time": "10:00",
        "alt_end_time": "12:00"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Half a substitute window is rejected too.
    let res = app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": next_weekday(Weekday::Mon),
        "is_unavailable": false,
        "alt_start_time": "10:00"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_newest_exception_wins_over_older_one() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let (professional_id, _) = seed_schedule(&app, &auth, "FREQ=WEEKLY;BYDAY=MO", "09:00", "12:00", 60).await;

    let monday = next_weekday(Weekday::Mon);

    app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": monday,
        "is_unavailable": true
    })).await;

    // Second thoughts: the day is open after all, but shorter.
    app.post(&auth, &format!("/api/v1/professionals/{}/exceptions", professional_id), json!({
        "date": monday,
        "is_unavailable": false,
        "alt_start_time": "11:00",
        "alt_end_time": "12:00"
    })).await;

    let gen_res = app.post(&auth, &format!("/api/v1/professionals/{}/slots/generate", professional_id), json!({
        "start_date": monday,
        "end_date": monday
    })).await;
    assert_eq!(parse_body(gen_res).await["created"], 1);

    let res = app.get(&format!("/api/v1/professionals/{}/slots?date={}", professional_id, monday)).await;
    let slots = parse_body(res).await["slots"].as_array().unwrap().clone();
    assert_eq!(slots.len(), 1);
    assert!(slots[0]["start_at"].as_str().unwrap().contains("T11:00:00"));
}

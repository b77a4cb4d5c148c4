use clinic_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::{load_templates, seed_admin_user},
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_availability_repo::SqliteAvailabilityRepo,
        sqlite_holiday_repo::SqliteHolidayRepo,
        sqlite_job_repo::SqliteJobRepo,
        sqlite_patient_repo::SqlitePatientRepo,
        sqlite_professional_repo::SqliteProfessionalRepo,
        sqlite_service_repo::SqliteServiceRepo,
        sqlite_slot_repo::SqliteTimeSlotRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    domain::services::auth_service::AuthService,
    domain::ports::EmailService,
    error::AppError,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_PASSWORD: &str = "bootstrap-admin-secret";

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_body: &str,
        _attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>
    ) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_buffer(0).await
    }

    pub async fn with_buffer(buffer_minutes: i64) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            clinic_name: "Test Clinic".to_string(),
            clinic_timezone: "UTC".to_string(),
            buffer_minutes,
            bootstrap_admin_password: ADMIN_PASSWORD.to_string(),
        };

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));

        seed_admin_user(user_repo.as_ref(), &config).await;

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo,
            auth_repo,
            patient_repo: Arc::new(SqlitePatientRepo::new(pool.clone())),
            professional_repo: Arc::new(SqliteProfessionalRepo::new(pool.clone())),
            service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            holiday_repo: Arc::new(SqliteHolidayRepo::new(pool.clone())),
            slot_repo: Arc::new(SqliteTimeSlotRepo::new(pool.clone())),
            appointment_repo: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            auth_service,
            email_service: Arc::new(MockEmailService),
            templates: Arc::new(load_templates()),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = json!({
            "username": username,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start+end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login("admin", ADMIN_PASSWORD).await
    }

    /// Authenticated POST with CSRF, returning the raw response.
    pub async fn post(&self, auth: &AuthHeaders, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn put(&self, auth: &AuthHeaders, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    pub async fn get_authed(&self, auth: &AuthHeaders, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a professional, a service and one weekly availability rule,
/// returning (professional_id, service_id).
pub async fn seed_schedule(app: &TestApp, auth: &AuthHeaders, recurrence: &str, start: &str, end: &str, duration_min: i32) -> (String, String) {
    let p_res = app.post(auth, "/api/v1/professionals", json!({
        "full_name": "Dr. Example",
        "specialty": "General"
    })).await;
    let professional_id = parse_body(p_res).await["id"].as_str().unwrap().to_string();

    let s_res = app.post(auth, "/api/v1/services", json!({
        "name": "Consultation",
        "description": "Standard visit",
        "price_cents": 5000
    })).await;
    let service_id = parse_body(s_res).await["id"].as_str().unwrap().to_string();

    let r_res = app.post(auth, &format!("/api/v1/professionals/{}/availability", professional_id), json!({
        "recurrence": recurrence,
        "start_time": start,
        "end_time": end,
        "timezone": "UTC",
        "slot_duration_min": duration_min
    })).await;
    assert!(r_res.status().is_success(), "rule creation failed: {}", r_res.status());

    (professional_id, service_id)
}

/// Creates a patient record, returning its id.
pub async fn seed_patient(app: &TestApp, auth: &AuthHeaders) -> String {
    let res = app.post(auth, "/api/v1/patients", json!({
        "full_name": "Pat Example",
        "email": "pat@example.com"
    })).await;
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

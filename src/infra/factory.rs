use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::PgPoolOptions, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool};
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use tracing::info;
use tera::Tera;

use crate::config::Config;
use crate::domain::models::user::{User, ROLE_ADMIN};
use crate::domain::ports::UserRepository;
use crate::domain::services::auth_service::AuthService;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_availability_repo::PostgresAvailabilityRepo, postgres_holiday_repo::PostgresHolidayRepo,
    postgres_job_repo::PostgresJobRepo, postgres_patient_repo::PostgresPatientRepo,
    postgres_professional_repo::PostgresProfessionalRepo, postgres_service_repo::PostgresServiceRepo,
    postgres_slot_repo::PostgresTimeSlotRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_holiday_repo::SqliteHolidayRepo,
    sqlite_job_repo::SqliteJobRepo, sqlite_patient_repo::SqlitePatientRepo,
    sqlite_professional_repo::SqliteProfessionalRepo, sqlite_service_repo::SqliteServiceRepo,
    sqlite_slot_repo::SqliteTimeSlotRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("confirmation.html", include_str!("templates/confirmation.html"))
        .expect("Failed to load confirmation template");
    tera.add_raw_template("reminder.html", include_str!("templates/reminder.html"))
        .expect("Failed to load reminder template");
    tera.add_raw_template("cancellation.html", include_str!("templates/cancellation.html"))
        .expect("Failed to load cancellation template");
    tera.add_raw_template("reschedule.html", include_str!("templates/reschedule.html"))
        .expect("Failed to load reschedule template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let templates = Arc::new(load_templates());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));

        seed_admin_user(user_repo.as_ref(), config).await;

        AppState {
            config: config.clone(),
            user_repo,
            auth_repo,
            patient_repo: Arc::new(PostgresPatientRepo::new(pool.clone())),
            professional_repo: Arc::new(PostgresProfessionalRepo::new(pool.clone())),
            service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
            availability_repo: Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            holiday_repo: Arc::new(PostgresHolidayRepo::new(pool.clone())),
            slot_repo: Arc::new(PostgresTimeSlotRepo::new(pool.clone())),
            appointment_repo: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            auth_service,
            email_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));

        seed_admin_user(user_repo.as_ref(), config).await;

        AppState {
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
            email_service,
            templates,
        }
    }
}

/// First boot of an empty database gets one ADMIN account so the clinic can
/// log in and create everything else.
pub async fn seed_admin_user(user_repo: &dyn UserRepository, config: &Config) {
    let count = user_repo.count().await.expect("Failed to count users");
    if count > 0 {
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(config.bootstrap_admin_password.as_bytes(), &salt)
        .expect("Failed to hash bootstrap admin password")
        .to_string();

    let admin = User::new("admin".to_string(), password_hash, ROLE_ADMIN.to_string());
    user_repo.create(&admin).await.expect("Failed to seed admin user");
    info!("Seeded bootstrap admin user");
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

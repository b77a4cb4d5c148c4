use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use chrono_tz::Tz;
use tokio::time::sleep;
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::job::{Job, JOB_CANCELLATION, JOB_CONFIRMATION, JOB_REMINDER, JOB_RESCHEDULE};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use crate::state::AppState;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let span = info_span!(
                        "background_job",
                        job_id = %job.id,
                        job_type = %job.job_type,
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job.job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            },
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    let appointment_id = &job.payload.appointment_id;

    let appointment = state.appointment_repo.find_by_id(appointment_id).await?
        .ok_or(AppError::NotFound(format!("Appointment {} not found", appointment_id)))?;

    // A reminder for an appointment that got cancelled in the meantime is
    // simply dropped.
    if job.job_type == JOB_REMINDER && !appointment.is_open() {
        info!("Skipping reminder for closed appointment {}", appointment.id);
        return Ok(());
    }

    let patient = state.patient_repo.find_by_id(&appointment.patient_id).await?
        .ok_or(AppError::NotFound(format!("Patient {} not found", appointment.patient_id)))?;
    let professional = state.professional_repo.find_by_id(&appointment.professional_id).await?
        .ok_or(AppError::NotFound(format!("Professional {} not found", appointment.professional_id)))?;
    let slot = state.slot_repo.find_by_id(&appointment.time_slot_id).await?
        .ok_or(AppError::NotFound(format!("Slot {} not found", appointment.time_slot_id)))?;

    let tz: Tz = state.config.clinic_timezone.parse().unwrap_or(chrono_tz::UTC);
    let local_start = slot.start_at.with_timezone(&tz);

    let mut context = tera::Context::new();
    context.insert("clinic_name", &state.config.clinic_name);
    context.insert("patient_name", &patient.full_name);
    context.insert("professional_name", &professional.full_name);
    context.insert("service_name", &appointment.service_name);
    context.insert("start_time", &local_start.format("%Y-%m-%d %H:%M").to_string());
    context.insert("timezone", &state.config.clinic_timezone);

    let (template, subject) = match job.job_type.as_str() {
        JOB_CONFIRMATION => ("confirmation.html", format!("Appointment received: {}", appointment.service_name)),
        JOB_REMINDER => ("reminder.html", format!("Reminder: {} tomorrow", appointment.service_name)),
        JOB_CANCELLATION => ("cancellation.html", format!("Appointment cancelled: {}", appointment.service_name)),
        JOB_RESCHEDULE => ("reschedule.html", format!("Appointment moved: {}", appointment.service_name)),
        other => {
            warn!("Unknown job type {}", other);
            return Err(AppError::InternalWithMsg(format!("Unknown job type {}", other)));
        }
    };

    let html = state.templates.render(template, &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

    let (attachment_name, attachment_data) = if job.job_type == JOB_CONFIRMATION {
        let ics = generate_ics(&appointment, &professional, &slot);
        (Some("invite.ics"), Some(ics.into_bytes()))
    } else {
        (None, None)
    };

    info!("Sending {} email to {}", job.job_type, patient.email);
    state.email_service.send(&patient.email, &subject, &html, attachment_name, attachment_data.as_deref()).await?;

    if job.job_type == JOB_REMINDER {
        state.appointment_repo.mark_reminder_sent(&appointment.id, Utc::now()).await?;
    }

    Ok(())
}

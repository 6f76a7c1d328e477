use actix_web::{web, HttpResponse, Responder};
use diesel::prelude::*;
use serde_json::json;

use crate::config::Config;
use crate::db::{self, DbPool};
use crate::error::ApiError;
use crate::models::{
    Appointment, AppointmentRecord, NewAppointment, NewPatient, Patient,
};
use crate::schema::{appointments, patients};

/// Liveness only: reports the process is up without touching the database.
/// Deployment probes rely on this being cheap and unconditional.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

pub async fn list_patients(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref().clone();
    let rows: Vec<Patient> = db::run_bounded(config.request_timeout(), move || {
        let mut conn = pool.get()?;
        Ok(patients::table
            .select(Patient::as_select())
            .load(&mut conn)?)
    })
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create_patient(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<NewPatient>,
) -> Result<HttpResponse, ApiError> {
    let new_patient = payload.into_inner().validate()?;
    let pool = pool.get_ref().clone();
    let created: Patient = db::run_bounded(config.request_timeout(), move || {
        let mut conn = pool.get()?;
        Ok(diesel::insert_into(patients::table)
            .values(&new_patient)
            .returning(Patient::as_returning())
            .get_result(&mut conn)?)
    })
    .await?;
    tracing::info!(id = created.id, "created patient");
    Ok(HttpResponse::Ok().json(created))
}

pub async fn list_appointments(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref().clone();
    let rows: Vec<Appointment> = db::run_bounded(config.request_timeout(), move || {
        let mut conn = pool.get()?;
        Ok(appointments::table
            .select(Appointment::as_select())
            .load(&mut conn)?)
    })
    .await?;
    let records: Vec<AppointmentRecord> =
        rows.into_iter().map(AppointmentRecord::from).collect();
    Ok(HttpResponse::Ok().json(records))
}

pub async fn create_appointment(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<NewAppointment>,
) -> Result<HttpResponse, ApiError> {
    let new_appointment = payload.into_inner().validate()?;
    let pool = pool.get_ref().clone();
    let created: Appointment = db::run_bounded(config.request_timeout(), move || {
        let mut conn = pool.get()?;
        Ok(diesel::insert_into(appointments::table)
            .values(&new_appointment)
            .returning(Appointment::as_returning())
            .get_result(&mut conn)?)
    })
    .await?;
    tracing::info!(id = created.id, "created appointment");
    Ok(HttpResponse::Ok().json(AppointmentRecord::from(created)))
}

/// Routes owned by the patient service.
pub fn patient_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/patients", web::get().to(list_patients))
        .route("/patients", web::post().to(create_patient))
        .route("/health", web::get().to(health));
}

/// Routes owned by the appointment service.
pub fn appointment_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/appointments", web::get().to(list_appointments))
        .route("/appointments", web::post().to(create_appointment))
        .route("/health", web::get().to(health));
}

/// Map body deserialization failures into the shared error envelope so a
/// malformed JSON body gets the same 400 shape as a failed validation.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::validation("body", err.to_string()).into())
}

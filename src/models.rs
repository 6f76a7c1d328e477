//! Row types, request payloads, and the validation layer.
//!
//! Request payloads keep every field optional so that a missing field is
//! reported as a field-level `bad_request`, never as a database failure.
//! `validate()` is the only way to turn a payload into an insertable row.

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::schema::{appointments, patients};

/// Listed date format, fixed regardless of driver representation.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Listed time format, 24-hour, no seconds.
pub const TIME_FORMAT: &str = "%H:%M";

const MAX_TEXT_LEN: usize = 255;
const MAX_AGE: i32 = 150;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Patient {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

/// `POST /patients` request body.
#[derive(Debug, Deserialize)]
pub struct NewPatient {
    pub name: Option<String>,
    pub age: Option<i32>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = patients)]
pub struct PatientInsert {
    pub name: String,
    pub age: i32,
}

impl NewPatient {
    pub fn validate(self) -> Result<PatientInsert, ApiError> {
        let name = required_text("name", self.name)?;
        let age = self
            .age
            .ok_or_else(|| ApiError::validation("age", "is required"))?;
        if !(0..=MAX_AGE).contains(&age) {
            return Err(ApiError::validation(
                "age",
                format!("must be between 0 and {MAX_AGE}"),
            ));
        }
        Ok(PatientInsert { name, age })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Appointment {
    pub id: i32,
    pub patient_id: i32,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Wire shape of an appointment. Date and time are rendered as fixed-width
/// strings (`YYYY-MM-DD`, `HH:MM`); downstream consumers match on these
/// exact formats.
#[derive(Debug, Serialize)]
pub struct AppointmentRecord {
    pub id: i32,
    pub patient_id: i32,
    pub doctor: String,
    pub date: String,
    pub time: String,
}

impl From<Appointment> for AppointmentRecord {
    fn from(row: Appointment) -> Self {
        AppointmentRecord {
            id: row.id,
            patient_id: row.patient_id,
            doctor: row.doctor,
            date: row.date.format(DATE_FORMAT).to_string(),
            time: row.time.format(TIME_FORMAT).to_string(),
        }
    }
}

/// `POST /appointments` request body. `patient_id` is not checked against
/// the patients table; referential integrity is intentionally not enforced.
#[derive(Debug, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Option<i32>,
    pub doctor: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = appointments)]
pub struct AppointmentInsert {
    pub patient_id: i32,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl NewAppointment {
    pub fn validate(self) -> Result<AppointmentInsert, ApiError> {
        let patient_id = self
            .patient_id
            .ok_or_else(|| ApiError::validation("patient_id", "is required"))?;
        let doctor = required_text("doctor", self.doctor)?;
        let date = self
            .date
            .ok_or_else(|| ApiError::validation("date", "is required"))?;
        let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|_| ApiError::validation("date", "must be formatted YYYY-MM-DD"))?;
        let time = self
            .time
            .ok_or_else(|| ApiError::validation("time", "is required"))?;
        let time = parse_time(&time)
            .ok_or_else(|| ApiError::validation("time", "must be formatted HH:MM"))?;
        Ok(AppointmentInsert {
            patient_id,
            doctor,
            date,
            time,
        })
    }
}

// Stored values may carry seconds; accept them on input too.
fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ApiError> {
    let value = value.ok_or_else(|| ApiError::validation(field, "is required"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::validation(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

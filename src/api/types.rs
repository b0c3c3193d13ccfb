use serde::Serialize;

use crate::models::inmate::{Inmate, split_name_parts};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LandingDto {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct InmateDto {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
    pub security_level: String,
    pub date_apprehended: Option<String>,
    pub date_added: String,
    pub evidence_file: Option<String>,
}

impl From<Inmate> for InmateDto {
    fn from(inmate: Inmate) -> Self {
        Self {
            id: inmate.id,
            name: inmate.name,
            age: inmate.age,
            gender: inmate.gender,
            nationality: inmate.nationality,
            security_level: inmate.security_level,
            date_apprehended: inmate
                .date_apprehended
                .map(|d| d.format("%Y-%m-%d").to_string()),
            date_added: inmate.date_added.format("%Y-%m-%d").to_string(),
            evidence_file: inmate.evidence_file,
        }
    }
}

/// Everything the record listing/creation form needs in one payload.
#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub inmates: Vec<InmateDto>,
    pub nationalities: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
}

/// Edit-form payload: the record plus its name split back into the three
/// form parts.
#[derive(Debug, Serialize)]
pub struct EditFormDto {
    pub inmate: InmateDto,
    pub last: String,
    pub first: String,
    pub initial: String,
    pub nationalities: &'static [&'static str],
}

impl EditFormDto {
    #[must_use]
    pub fn new(inmate: Inmate) -> Self {
        let (last, first, initial) = split_name_parts(&inmate.name);
        Self {
            inmate: inmate.into(),
            last,
            first,
            initial,
            nationalities: crate::constants::NATIONALITIES,
        }
    }
}

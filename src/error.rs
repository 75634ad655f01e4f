use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::source::SourceError;
use crate::traffic::FilterError;

#[derive(thiserror::Error, Debug)]
pub enum BikeFlowError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Filter(#[from] FilterError),

    #[error("Trip data is not available ({0})")]
    NotReady(String),
}

impl ResponseError for BikeFlowError {
    fn error_response(&self) -> HttpResponse {
        match self {
            BikeFlowError::Filter(_) | BikeFlowError::NotReady(_) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
            }
            other => {
                log::error!("{}", other);
                HttpResponse::InternalServerError().finish()
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BikeFlowError::Filter(_) => StatusCode::BAD_REQUEST,
            BikeFlowError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type BikeFlowResult<T> = Result<T, BikeFlowError>;

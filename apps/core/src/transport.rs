use serde::{Deserialize, Serialize};

use crate::contract::{CoreRequest, CoreResponse};
use crate::core_service::{CafeService, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    CafeNotFound,
    Profile,
    Store,
    Catalog,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub fn handle_request(service: &CafeService, request: CoreRequest) -> TransportResponse {
    match service.handle_command(request) {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => {
            tracing::warn!(%error, "command failed");
            TransportResponse::Err {
                error: map_service_error(error),
            }
        }
    }
}

pub fn handle_json(service: &CafeService, payload: &str) -> String {
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(service, request),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).expect("transport response should serialize")
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    let code = match &error {
        ServiceError::InvalidRequest(_) => ErrorCode::InvalidRequest,
        ServiceError::CafeNotFound(_) => ErrorCode::CafeNotFound,
        ServiceError::Profile(_) => ErrorCode::Profile,
        ServiceError::Store(_) => ErrorCode::Store,
        ServiceError::Catalog(_) => ErrorCode::Catalog,
        ServiceError::Config(_) => ErrorCode::Config,
    };
    let message = match error {
        ServiceError::InvalidRequest(message)
        | ServiceError::CafeNotFound(message)
        | ServiceError::Config(message) => message,
        other => other.to_string(),
    };
    ErrorResponse { code, message }
}

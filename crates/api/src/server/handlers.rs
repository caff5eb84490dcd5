//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cipher_core::{CipherError, Encoded};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse, RootResponse,
};
use common::ServiceError;
use tracing::{debug, info, warn};

use super::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `GET /` — welcome message and service version.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the SecureCipher API!".into(),
        version: VERSION.into(),
    })
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` when at least one algorithm has a key configured.
/// Returns `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let algorithms: Vec<String> = state
        .cipher
        .factory()
        .configured()
        .into_iter()
        .map(|alg| alg.to_string())
        .collect();

    let (status_code, status_str) = if algorithms.is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    let body = HealthResponse {
        status: status_str.into(),
        version: VERSION.into(),
        algorithms,
    };
    (status_code, Json(body)).into_response()
}

/// `POST /encrypt` — encrypt `text` with the requested (or default) algorithm.
pub async fn encrypt(
    State(state): State<AppState>,
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return error_response(&rejected_body(&rejection)),
    };
    if req.text.chars().count() < state.min_text_length {
        return error_response(&ServiceError::BadRequest(format!(
            "text must contain at least {} characters",
            state.min_text_length
        )));
    }

    let algorithm = req
        .crypto_type
        .as_deref()
        .unwrap_or(state.default_crypto_type.as_str());

    match state.cipher.encrypt(req.text.as_bytes(), algorithm) {
        Ok(sealed) => {
            info!(algorithm = %sealed.algorithm, "text encrypted");
            let body = EncryptResponse {
                token: sealed.token,
                crypto_type: sealed.algorithm.to_string(),
                version: VERSION.into(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(&to_service_error(e)),
    }
}

/// `POST /decrypt` — verify and decrypt a token produced by `POST /encrypt`.
///
/// Every verification failure yields the same `400 invalid_token` response.
pub async fn decrypt(
    State(state): State<AppState>,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return error_response(&rejected_body(&rejection)),
    };
    let algorithm = req
        .crypto_type
        .as_deref()
        .unwrap_or(state.default_crypto_type.as_str());

    let opened = match state.cipher.decrypt(&req.token, algorithm) {
        Ok(o) => o,
        Err(e) => return error_response(&to_service_error(e)),
    };

    // Plaintext that is not UTF-8 was not produced by this API.
    let Ok(text) = String::from_utf8(opened.plaintext) else {
        return error_response(&ServiceError::InvalidToken);
    };

    info!(algorithm = %opened.algorithm, "token decrypted");
    let body = DecryptResponse {
        text,
        crypto_type: opened.algorithm.to_string(),
        version: VERSION.into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Translate a cipher-layer error into the caller-facing taxonomy.
///
/// Operator-side failures are logged with their detail and reported to the
/// caller without it.
fn to_service_error(err: CipherError) -> ServiceError {
    if err.is_client_error() {
        debug!(error = %err, "request rejected by cipher layer");
    } else {
        warn!(error = %err, "cipher operation failed");
    }

    match &err {
        CipherError::UnsupportedAlgorithm(_) => ServiceError::BadRequest(err.to_string()),
        CipherError::AuthenticationFailure | CipherError::InvalidEncoding(Encoded::Envelope) => {
            ServiceError::InvalidToken
        }
        CipherError::MissingKey(alg) => ServiceError::Unavailable(format!("{alg} is not configured")),
        CipherError::InvalidEncoding(Encoded::Key(_)) | CipherError::InvalidKeyLength { .. } => {
            ServiceError::Internal("cipher key misconfigured".into())
        }
        CipherError::RandomnessFailure | CipherError::AeadFailure => {
            ServiceError::EncryptionFailure(err.to_string())
        }
    }
}

/// Body rejections become `400 bad_request`. The extractor's own text can
/// quote request content, so only a fixed description is returned.
fn rejected_body(rejection: &JsonRejection) -> ServiceError {
    debug!(status = %rejection.status(), "request body rejected");
    let message = match rejection {
        JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
        JsonRejection::JsonDataError(_) => "request body does not match the expected fields",
        JsonRejection::MissingJsonContentType(_) => "expected `Content-Type: application/json`",
        _ => "failed to read request body",
    };
    ServiceError::BadRequest(message.into())
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

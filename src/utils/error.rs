use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    InvalidRequest(String),
    // 400 do header Authorization: responde como InvalidRequest, mas leva o desafio Bearer
    MalformedAuthHeader(String),
    Unauthorized(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::MalformedAuthHeader(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) | AppError::MalformedAuthHeader(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Detalhes internos ficam no log, nunca na resposta
        let message = match self {
            AppError::DatabaseError(msg) | AppError::Internal(msg) => {
                log::error!("❌ {}", msg);
                "Internal server error".to_string()
            }
            AppError::NotFound(msg)
            | AppError::InvalidRequest(msg)
            | AppError::MalformedAuthHeader(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
        };

        let mut response = HttpResponse::build(self.status_code());

        if matches!(
            self,
            AppError::Unauthorized(_) | AppError::MalformedAuthHeader(_)
        ) {
            response.insert_header(("WWW-Authenticate", "Bearer"));
        }

        response.json(serde_json::json!({
            "success": false,
            "error": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::DatabaseError("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("Post not found".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidRequest("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("Invalid credentials".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::Unauthorized("Invalid credentials".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let header = response.headers().get("WWW-Authenticate");
        assert_eq!(header.map(|v| v.to_str().unwrap()), Some("Bearer"));
    }

    #[test]
    fn test_malformed_auth_header_sets_www_authenticate() {
        let response =
            AppError::MalformedAuthHeader("Authorization header is malformed".to_string())
                .error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let header = response.headers().get("WWW-Authenticate");
        assert_eq!(header.map(|v| v.to_str().unwrap()), Some("Bearer"));
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let response = AppError::DatabaseError("connection refused on 5432".to_string());
        let display = format!("{}", response);
        assert!(display.contains("connection refused"));
        // A resposta HTTP não carrega o detalhe
        assert_eq!(
            response.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine::{ErrorKind, GameError};
use std::fmt;

#[derive(Debug)]
pub enum ApiError
{
    SessionNotFound(String),
    Game(GameError),
}

impl ApiError
{
    pub fn status(&self) -> StatusCode
    {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Game(GameError::NoPlayers) => StatusCode::CONFLICT,
            ApiError::Game(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Unsupported => StatusCode::NOT_IMPLEMENTED,
                ErrorKind::Format | ErrorKind::State => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl fmt::Display for ApiError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            ApiError::SessionNotFound(id) => write!(f, "No game found for session {}", id),
            ApiError::Game(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<GameError> for ApiError
{
    fn from(e: GameError) -> Self
    {
        ApiError::Game(e)
    }
}

impl IntoResponse for ApiError
{
    fn into_response(self) -> Response
    {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("rejected: {}", self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn status_codes()
    {
        assert_eq!(ApiError::from(GameError::EmptyPlayerName).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(GameError::NoPlayers).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(GameError::Unsupported { operation: "x" }).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(ApiError::from(GameError::MissingRule { rank: 3 }).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::SessionNotFound("abc".into()).status(), StatusCode::NOT_FOUND);
    }
}

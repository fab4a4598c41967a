// Curio Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurioError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    #[error("Aggregation failed: {0}")]
    Aggregation(#[source] rusqlite::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Template in use: {1} item(s) still reference template {0}")]
    TemplateInUse(String, i64),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for CurioError {
    fn from(err: anyhow::Error) -> Self {
        CurioError::Other(err.to_string())
    }
}

impl CurioError {
    /// Stable mapping to a transport status code. Invalid metrics are a
    /// caller error, not a server failure; zeroed aggregates are never
    /// errors at all and so never reach this mapping.
    pub fn status_code(&self) -> u16 {
        match self {
            CurioError::TemplateNotFound(_) | CurioError::ItemNotFound(_) => 404,
            CurioError::InvalidMetric(_) => 400,
            CurioError::Validation(_) => 422,
            CurioError::TemplateInUse(_, _) => 409,
            CurioError::Database(_)
            | CurioError::Io(_)
            | CurioError::Json(_)
            | CurioError::Aggregation(_)
            | CurioError::Other(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, CurioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping_is_stable() {
        assert_eq!(CurioError::TemplateNotFound("Sneakers".into()).status_code(), 404);
        assert_eq!(CurioError::ItemNotFound(7).status_code(), 404);
        assert_eq!(CurioError::InvalidMetric("roi".into()).status_code(), 400);
        assert_eq!(CurioError::Validation("missing field".into()).status_code(), 422);
        assert_eq!(CurioError::TemplateInUse("Comics".into(), 3).status_code(), 409);
        assert_eq!(
            CurioError::Aggregation(rusqlite::Error::InvalidQuery).status_code(),
            500
        );
        assert_eq!(CurioError::Other("boom".into()).status_code(), 500);
    }
}

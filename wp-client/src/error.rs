use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `wp-client`.
pub enum WpError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Сервер ответил статусом, отличным от 2xx.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP-статус ответа.
        status: reqwest::StatusCode,
        /// Сообщение сервера или описание статуса.
        message: String,
    },

    /// Запрошенная сущность не найдена.
    #[error("not found")]
    NotFound,

    /// Ответ пришёл не в формате JSON.
    #[error("unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// Тело ответа не соответствует ожидаемой модели.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Некорректная конфигурация клиента.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Результат операций `wp-client`.
pub type WpResult<T> = Result<T, WpError>;

impl WpError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::Status { status, message }
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = WpError::from_http_status(reqwest::StatusCode::NOT_FOUND, None);
        assert!(matches!(err, WpError::NotFound));
    }

    #[test]
    fn other_status_keeps_message() {
        let err = WpError::from_http_status(
            reqwest::StatusCode::FORBIDDEN,
            Some("rest_forbidden".to_string()),
        );
        match err {
            WpError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert_eq!(message, "rest_forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_without_message_uses_status_text() {
        let err = WpError::from_http_status(reqwest::StatusCode::BAD_GATEWAY, None);
        assert_eq!(
            err.to_string(),
            "unexpected status 502 Bad Gateway: http status 502 Bad Gateway"
        );
    }
}

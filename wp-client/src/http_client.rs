use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{WpError, WpResult};
use crate::models::{Comment, NewComment};

const JSON: &str = "application/json";

#[derive(Debug, Serialize)]
struct CreateCommentDto<'a> {
    post: u64,
    author_name: &'a str,
    author_email: &'a str,
    author_url: &'a str,
    content: &'a str,
    parent: u64,
    status: &'static str,
}

impl<'a> From<&'a NewComment> for CreateCommentDto<'a> {
    fn from(value: &'a NewComment) -> Self {
        Self {
            post: value.post,
            author_name: &value.author_name,
            author_email: &value.author_email,
            author_url: &value.author_url,
            content: &value.content,
            parent: value.parent,
            // Новые комментарии всегда уходят на модерацию.
            status: "hold",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-транспорт к WordPress REST API.
///
/// Принимает только JSON-ответы и помечает каждый запрос окном ревалидации.
pub(crate) struct HttpClient {
    api_url: String,
    cache_control: HeaderValue,
    client: Client,
}

impl HttpClient {
    /// Создаёт транспорт по конфигурации клиента.
    pub(crate) fn new(config: &ClientConfig) -> WpResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let cache_control = HeaderValue::from_str(&format!("max-age={}", config.revalidate_secs))
            .map_err(|err| WpError::Config(err.to_string()))?;

        Ok(Self {
            api_url: config.api_url(),
            cache_control,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: Response) -> WpError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => match (body.code, body.message) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (None, Some(message)) => message,
                (Some(code), None) => code,
                (None, None) => format!("http status {status}"),
            },
            Err(_) => format!("http status {status}"),
        };
        WpError::from_http_status(status, Some(message))
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> WpResult<T> {
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains(JSON) {
            return Err(WpError::UnexpectedContentType(content_type));
        }

        let body = response.bytes().await.map_err(WpError::from_reqwest)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// `GET` запрос; `path` может содержать query-строку.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> WpResult<T> {
        let url = self.endpoint(path);
        debug!(%url, "fetching");

        let response = self
            .client
            .request(Method::GET, url)
            .header(ACCEPT, JSON)
            .header(CACHE_CONTROL, self.cache_control.clone())
            .send()
            .await
            .map_err(WpError::from_reqwest)?;

        Self::decode_json(response).await
    }

    /// универсальный helper для отправки запросов с json-payload
    async fn send_json<TReq, TRes>(&self, method: Method, path: &str, body: &TReq) -> WpResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%url, %method, "sending");

        let response = self
            .client
            .request(method, url)
            .header(ACCEPT, JSON)
            .json(body)
            .send()
            .await
            .map_err(WpError::from_reqwest)?;

        Self::decode_json(response).await
    }

    /// Отправляет комментарий на модерацию (`POST /comments`).
    pub(crate) async fn create_comment(&self, comment: &NewComment) -> WpResult<Comment> {
        let payload = CreateCommentDto::from(comment);
        self.send_json(Method::POST, "/comments", &payload).await
    }
}

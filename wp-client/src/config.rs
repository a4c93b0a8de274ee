use crate::error::{WpError, WpResult};

/// Адрес WordPress по умолчанию (локальная dev-установка).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8884";
/// Префикс REST API WordPress.
pub const DEFAULT_API_PATH: &str = "/wp-json/wp/v2";
/// Окно ревалидации по умолчанию, в секундах.
pub const DEFAULT_REVALIDATE_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Конфигурация `WpClient`.
///
/// Передаётся один раз при создании клиента; глобального изменяемого
/// состояния нет.
pub struct ClientConfig {
    /// Базовый URL сайта, например `https://blog.example.com`.
    pub base_url: String,
    /// Путь REST API относительно `base_url`.
    pub api_path: String,
    /// Допустимая «несвежесть» ответа, передаётся транспорту как `max-age`.
    pub revalidate_secs: u64,
    /// Таймаут установки соединения.
    pub connect_timeout_secs: u64,
    /// Таймаут всего запроса.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            revalidate_secs: DEFAULT_REVALIDATE_SECS,
            connect_timeout_secs: 5,
            request_timeout_secs: 15,
        }
    }
}

impl ClientConfig {
    /// Создаёт конфигурацию с указанным базовым URL и значениями по умолчанию.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Читает конфигурацию из переменных окружения.
    ///
    /// - `WP_API_BASE` (по умолчанию `http://localhost:8884`)
    /// - `WP_API_PATH` (по умолчанию `/wp-json/wp/v2`)
    /// - `WP_REVALIDATE_SECS`, `WP_CONNECT_TIMEOUT_SECS`, `WP_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> WpResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> WpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("WP_API_BASE")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.base_url);
        let api_path = lookup("WP_API_PATH")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.api_path);

        let config = Self {
            base_url,
            api_path,
            revalidate_secs: parse_u64(&lookup, "WP_REVALIDATE_SECS", defaults.revalidate_secs)?,
            connect_timeout_secs: parse_u64(
                &lookup,
                "WP_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            request_timeout_secs: parse_u64(
                &lookup,
                "WP_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Проверяет, что URL содержит схему, а таймауты положительны.
    pub fn validate(&self) -> WpResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(WpError::Config(format!(
                "base url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(WpError::Config("timeouts must be > 0".to_string()));
        }
        Ok(())
    }

    /// Базовый URL сайта без завершающего `/`.
    pub fn site_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Полный URL REST API, например `http://localhost:8884/wp-json/wp/v2`.
    pub fn api_url(&self) -> String {
        format!(
            "{}/{}",
            self.site_url(),
            self.api_path.trim_matches('/')
        )
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> WpResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| WpError::Config(format!("failed to parse {key}, expecting positive integer")))?;
    if value == 0 {
        return Err(WpError::Config(format!("{key} must be > 0")));
    }
    Ok(value)
}

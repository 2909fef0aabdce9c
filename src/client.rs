//! Блокирующий HTTPS-клиент Tinkoff OpenAPI.
//!
//! Каждый запрос выполняется последовательно и возвращает полностью
//! буферизованное тело ответа; потоковой обработки и повторов нет.

use chrono::DateTime;
use log::debug;

use crate::error::ApiError;

/// Хост API по умолчанию.
pub const DEFAULT_HOST: &str = "api-invest.tinkoff.ru";

/// Параметры подключения к API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Хост API без схемы.
    pub host: String,
    /// Bearer-токен доступа.
    pub token: String,
}

/// Запрос списка операций за период.
#[derive(Debug, Clone)]
pub struct OperationsRequest {
    /// Начало периода, RFC 3339.
    pub from: String,
    /// Конец периода, RFC 3339.
    pub to: String,
    /// Необязательный фильтр по FIGI; пустое значение не попадает в запрос.
    pub figi: String,
}

impl OperationsRequest {
    /// Создаёт запрос, проверяя границы периода как даты RFC 3339.
    pub fn new(from: &str, to: &str, figi: &str) -> Result<Self, ApiError> {
        validate_period(from)?;
        validate_period(to)?;
        Ok(Self {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
            figi: figi.trim().to_string(),
        })
    }
}

fn validate_period(value: &str) -> Result<(), ApiError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|_| ())
        .map_err(|_| ApiError::Date {
            value: value.trim().to_string(),
        })
}

/// HTTP-клиент API: один GET на каждый вид ответа.
#[derive(Debug)]
pub struct InvestApiClient {
    http: reqwest::blocking::Client,
    config: ApiConfig,
}

impl InvestApiClient {
    /// Создаёт клиент с указанной конфигурацией.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Запрашивает справочник акций.
    pub fn market_stocks(&self) -> Result<String, ApiError> {
        self.get("/openapi/market/stocks", &[])
    }

    /// Запрашивает операции за период; пустые параметры запроса опускаются.
    pub fn operations(&self, request: &OperationsRequest) -> Result<String, ApiError> {
        let params = [
            ("from", request.from.as_str()),
            ("to", request.to.as_str()),
            ("figi", request.figi.as_str()),
        ];
        self.get("/openapi/operations", &params)
    }

    fn get(&self, target: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let url = format!("https://{}{}", self.config.host, target);
        debug!("GET {url}");

        let query: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let mut builder = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }

        Ok(response.text()?)
    }
}

//! Маршрутизация сырых тел ответов к декодерам и обработчику.

use log::{debug, info, warn};
use serde_json::Value;

use crate::decode::{Decoded, decode_instruments, decode_operations, decode_portfolio};
use crate::error::ApiError;
use crate::types::{Instrument, Operation};
use crate::utils::syntax_error_offset;

/// Какой ответ API лежит в сыром теле.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Ответ `/openapi/portfolio`; декодируется только для журнала.
    Portfolio,
    /// Ответ `/openapi/operations`.
    Operations,
    /// Ответ `/openapi/market/stocks`.
    MarketStocks,
}

/// Потребитель декодированных ответов, по методу на вид ответа.
pub trait ResponseHandler {
    /// Принимает декодированный справочник инструментов.
    fn on_instruments(&mut self, instruments: Vec<Instrument>);
    /// Принимает декодированные операции.
    fn on_operations(&mut self, operations: Vec<Operation>);
}

/// Маршрутизатор: проверяет синтаксис JSON и передаёт результат декодера
/// зарегистрированному обработчику.
#[derive(Debug, Default)]
pub struct ResponseRouter<H> {
    handler: Option<H>,
}

impl<H: ResponseHandler> ResponseRouter<H> {
    /// Создаёт маршрутизатор с обработчиком.
    #[inline]
    pub const fn new(handler: H) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    /// Создаёт маршрутизатор без обработчика: декодированные ответы
    /// молча отбрасываются, это не ошибка.
    #[inline]
    pub const fn detached() -> Self {
        Self { handler: None }
    }

    /// Разбирает тело ответа и отправляет результат обработчику.
    ///
    /// Синтаксически некорректный JSON и отсутствие структурных ключей
    /// возвращаются как ошибки; декодеры при ошибке синтаксиса не вызываются.
    pub fn route(&mut self, body: &str, kind: ResponseKind) -> Result<(), ApiError> {
        let document: Value = serde_json::from_str(body).map_err(|error| ApiError::Json {
            message: error.to_string(),
            offset: syntax_error_offset(body, error.line(), error.column()),
        })?;

        match kind {
            ResponseKind::Portfolio => {
                let positions = decode_portfolio(&document)?;
                info!("Portfolio response: {} positions", positions.len());
            }
            ResponseKind::Operations => {
                let operations = report_missing(decode_operations(&document)?);
                info!("Operations response: {} operations", operations.len());
                if let Some(handler) = self.handler.as_mut() {
                    handler.on_operations(operations);
                }
            }
            ResponseKind::MarketStocks => {
                let instruments = report_missing(decode_instruments(&document)?);
                info!("Market stocks response: {} instruments", instruments.len());
                if let Some(handler) = self.handler.as_mut() {
                    handler.on_instruments(instruments);
                }
            }
        }

        Ok(())
    }

    /// Доступ к обработчику.
    #[inline]
    pub const fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Забирает обработчик из маршрутизатора.
    #[inline]
    pub fn into_handler(self) -> Option<H> {
        self.handler
    }
}

/// Журналирует пропуски необязательных полей и отдаёт записи дальше.
fn report_missing<T>(decoded: Decoded<T>) -> Vec<T> {
    for diagnostic in &decoded.diagnostics {
        warn!(
            "No '{}' in element {}",
            diagnostic.field, diagnostic.element
        );
    }
    debug!(
        "{} records, {} missing fields",
        decoded.records.len(),
        decoded.diagnostics.len()
    );
    decoded.records
}

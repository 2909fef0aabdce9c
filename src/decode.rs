//! Декодеры полезной нагрузки ответов API в доменные записи.
//!
//! Поля инструментов и операций необязательны по отдельности: пропуск
//! фиксируется диагностикой, запись декодируется дальше. Поля вложенных
//! исполнений (`trades`), напротив, обязательны все — их пропуск прерывает
//! декодирование всего вызова.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::types::{Commission, Figi, Instrument, Money, Operation, Trade};
use crate::utils::decimal_from_json;

/// Диагностика: в элементе массива отсутствует необязательное поле.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Индекс элемента в массиве полезной нагрузки.
    pub element: usize,
    /// Имя пропущенного поля.
    pub field: &'static str,
}

/// Результат терпимого декодирования: записи и диагностика пропусков.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// Декодированные записи в порядке массива.
    pub records: Vec<T>,
    /// Пропуски необязательных полей, по одному на поле.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// Чтение необязательных полей одного элемента массива.
///
/// Элемент, не являющийся объектом, читается как объект без полей.
struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    element: usize,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> FieldReader<'a> {
    fn new(value: &'a Value, element: usize, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            object: value.as_object(),
            element,
            diagnostics,
        }
    }

    fn note(&mut self, field: &'static str) {
        self.diagnostics.push(Diagnostic {
            element: self.element,
            field,
        });
    }

    /// Строковое поле: пропуск или нестроковое значение — пустая строка.
    fn text(&mut self, field: &'static str) -> String {
        match self.object.and_then(|object| object.get(field)) {
            Some(Value::String(text)) => text.clone(),
            _ => {
                self.note(field);
                String::new()
            }
        }
    }

    /// Числовое поле: пропуск — ноль, нечисловое значение — ошибка.
    fn money(&mut self, field: &'static str) -> Result<Money, ApiError> {
        match self.object.and_then(|object| object.get(field)) {
            Some(value) => decimal_from_json(value, field),
            None => {
                self.note(field);
                Ok(Money::ZERO)
            }
        }
    }
}

fn payload_array<'a>(document: &'a Value, key: &'static str) -> Result<&'a [Value], ApiError> {
    let payload = document
        .get("payload")
        .ok_or(ApiError::MissingKey { key: "payload" })?;
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(ApiError::MissingKey { key })
}

fn require_text(object: &Map<String, Value>, field: &'static str) -> Result<String, ApiError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ApiError::MissingField { field })
}

fn require_money(object: &Map<String, Value>, field: &'static str) -> Result<Money, ApiError> {
    let value = object.get(field).ok_or(ApiError::MissingField { field })?;
    decimal_from_json(value, field)
}

/// Декодирует справочник акций из `payload.instruments`.
///
/// Отсутствие `payload` или `instruments` — жёсткая ошибка всего вызова.
/// Порядок и дубликаты массива сохраняются, дедупликация — дело потребителя.
pub fn decode_instruments(document: &Value) -> Result<Decoded<Instrument>, ApiError> {
    let elements = payload_array(document, "instruments")?;

    let mut decoded = Decoded::default();
    for (element, value) in elements.iter().enumerate() {
        let mut reader = FieldReader::new(value, element, &mut decoded.diagnostics);
        let instrument = Instrument {
            figi: Figi(reader.text("figi")),
            ticker: reader.text("ticker"),
            isin: reader.text("isin"),
            min_price_increment: reader.money("minPriceIncrement")?,
            lot: reader.money("lot")?,
            currency: reader.text("currency"),
            name: reader.text("name"),
            kind: reader.text("type"),
        };
        decoded.records.push(instrument);
    }

    Ok(decoded)
}

/// Декодирует операции из `payload.operations`.
///
/// Скалярные поля операции и вложенная комиссия читаются терпимо. Ключ
/// `trades` может отсутствовать — операция выйдет без исполнений; но уже
/// присутствующие исполнения декодируются строго, и пропуск любого их поля
/// прерывает весь вызов.
pub fn decode_operations(document: &Value) -> Result<Decoded<Operation>, ApiError> {
    let elements = payload_array(document, "operations")?;

    let mut decoded = Decoded::default();
    for (element, value) in elements.iter().enumerate() {
        let mut reader = FieldReader::new(value, element, &mut decoded.diagnostics);
        let id = reader.text("id");
        let status = reader.text("status");
        let operation_type = reader.text("operationType");
        let figi = Figi(reader.text("figi"));
        let instrument_type = reader.text("instrumentType");
        let price = reader.money("price")?;
        let quantity = reader.money("quantity")?;
        let currency = reader.text("currency");
        let date = reader.text("date");
        let payment = reader.money("payment")?;

        let commission = match value.get("commission") {
            Some(nested) => {
                let mut reader = FieldReader::new(nested, element, &mut decoded.diagnostics);
                Commission {
                    currency: reader.text("currency"),
                    value: reader.money("value")?,
                }
            }
            None => {
                decoded.diagnostics.push(Diagnostic {
                    element,
                    field: "commission",
                });
                Commission::default()
            }
        };

        let trades = match value.get("trades") {
            Some(list) => decode_trades(list)?,
            None => {
                decoded.diagnostics.push(Diagnostic {
                    element,
                    field: "trades",
                });
                Vec::new()
            }
        };

        decoded.records.push(Operation {
            id,
            status,
            operation_type,
            figi,
            instrument_type,
            price,
            quantity,
            payment,
            currency,
            date,
            commission,
            trades,
        });
    }

    Ok(decoded)
}

fn decode_trades(value: &Value) -> Result<Vec<Trade>, ApiError> {
    let elements = value
        .as_array()
        .ok_or(ApiError::MissingKey { key: "trades" })?;

    elements
        .iter()
        .map(|element| {
            let object = element
                .as_object()
                .ok_or(ApiError::MissingField { field: "tradeId" })?;
            Ok(Trade {
                trade_id: require_text(object, "tradeId")?,
                date: require_text(object, "date")?,
                price: require_money(object, "price")?,
                quantity: require_money(object, "quantity")?,
            })
        })
        .collect()
}

/// Декодирует позиции портфеля из `payload.positions`.
///
/// У каждой позиции обязателен `figi`; результат используется только для
/// журналирования и дальше по конвейеру не передаётся.
pub fn decode_portfolio(document: &Value) -> Result<Vec<Figi>, ApiError> {
    let elements = payload_array(document, "positions")?;

    elements
        .iter()
        .map(|position| {
            position
                .get("figi")
                .and_then(Value::as_str)
                .map(Figi::from)
                .ok_or(ApiError::MissingField { field: "figi" })
        })
        .collect()
}

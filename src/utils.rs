//! Вспомогательные разборы чисел и вычисление смещений в тексте.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::Money;

/// Разбирает числовое JSON-значение в `Money`.
///
/// Число конвертируется через его текстовое представление, минуя двоичный
/// `f64`. Строка с числом также принимается. Любое другое значение — ошибка
/// с именем поля.
pub fn decimal_from_json(value: &Value, field: &'static str) -> Result<Money, ApiError> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    };
    Decimal::from_str(&text).map_err(|_| ApiError::Number { value: text, field })
}

/// Переводит позицию `строка:колонка` (1-based) в байтовое смещение.
///
/// Колонка считается в байтах в пределах строки; выход за границы текста
/// ограничивается его длиной.
pub fn syntax_error_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0usize;
    for (index, row) in text.split('\n').enumerate() {
        if index + 1 == line {
            offset += column.saturating_sub(1).min(row.len());
            return offset.min(text.len());
        }
        offset += row.len() + 1;
    }
    text.len()
}

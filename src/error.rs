//! Ошибки запросов к API, разбора ответов и записи отчётов.

/// Ошибка обращения к API или обработки его ответа.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Ошибка ввода-вывода при записи отчёта.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Транспортная ошибка HTTP-клиента.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Сервер вернул неуспешный HTTP-статус.
    #[error("HTTP status {status}")]
    Http {
        /// Код статуса ответа.
        status: u16,
    },
    /// Тело ответа не является синтаксически корректным JSON.
    #[error("JSON syntax error: {message}, offset {offset}")]
    Json {
        /// Причина ошибки в человекочитаемом виде.
        message: String,
        /// Байтовое смещение места ошибки в теле ответа.
        offset: usize,
    },
    /// В документе отсутствует обязательный структурный ключ.
    #[error("Key '{key}' missing")]
    MissingKey {
        /// Имя ключа.
        key: &'static str,
    },
    /// В элементе отсутствует обязательное поле.
    #[error("Required field '{field}' missing")]
    MissingField {
        /// Имя пропавшего поля.
        field: &'static str,
    },
    /// Ошибка разбора числового значения.
    #[error("Invalid number '{value}' in field '{field}'")]
    Number {
        /// Некорректное исходное значение.
        value: String,
        /// Имя поля.
        field: &'static str,
    },
    /// Ошибка разбора даты.
    #[error("Invalid date '{value}'")]
    Date {
        /// Некорректная дата.
        value: String,
    },
}

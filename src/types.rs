//! Доменные типы: инструменты, операции, сделки и строки отчётов.

use std::fmt;

use rust_decimal::Decimal;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Глобальный идентификатор финансового инструмента (FIGI).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Figi(pub String);

impl fmt::Display for Figi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Figi {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Торгуемый инструмент из справочника акций.
#[derive(Debug, Clone, Default)]
pub struct Instrument {
    /// Идентификатор FIGI.
    pub figi: Figi,
    /// Биржевой тикер.
    pub ticker: String,
    /// ISIN.
    pub isin: String,
    /// Минимальный шаг цены.
    pub min_price_increment: Money,
    /// Размер лота.
    pub lot: Money,
    /// Валюта инструмента.
    pub currency: String,
    /// Название инструмента.
    pub name: String,
    /// Тип инструмента (поле `type` в ответе API).
    pub kind: String,
}

/// Одно исполнение операции: сделка по конкретной цене и количеству.
#[derive(Debug, Clone, Default)]
pub struct Trade {
    /// Идентификатор сделки.
    pub trade_id: String,
    /// Дата сделки в формате ISO-8601, как получена от API.
    pub date: String,
    /// Цена исполнения.
    pub price: Money,
    /// Количество.
    pub quantity: Money,
}

/// Комиссия операции, знак сохраняется как получен.
#[derive(Debug, Clone, Default)]
pub struct Commission {
    /// Валюта комиссии.
    pub currency: String,
    /// Величина комиссии.
    pub value: Money,
}

/// Операция по брокерскому счёту: сделка, комиссия, дивиденд и т.п.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    /// Идентификатор операции; сентинел `-1` означает отсутствие операции.
    pub id: String,
    /// Статус операции, например `Done` или `Declined`.
    pub status: String,
    /// Тип операции, например `Buy`, `Sell`, `BuyCard`.
    pub operation_type: String,
    /// FIGI инструмента; инструмент может быть ещё не известен.
    pub figi: Figi,
    /// Тип инструмента, например `Stock`.
    pub instrument_type: String,
    /// Цена из операции (для отчёта авторитетны цены исполнений).
    pub price: Money,
    /// Количество из операции.
    pub quantity: Money,
    /// Денежный эффект операции со знаком.
    pub payment: Money,
    /// Валюта операции.
    pub currency: String,
    /// Дата операции в формате ISO-8601.
    pub date: String,
    /// Комиссия операции.
    pub commission: Commission,
    /// Исполнения операции; операция без исполнений не попадает в отчёты.
    pub trades: Vec<Trade>,
}

/// Направление сделки в отчёте.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Покупка; `BuyCard` нормализуется сюда же.
    Buy,
    /// Продажа.
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("Buy"),
            Self::Sell => f.write_str("Sell"),
        }
    }
}

/// Строка отчёта по сделкам: одно исполнение одной операции.
#[derive(Debug, Clone)]
pub struct TradeRow {
    /// Название инструмента; пустое, если FIGI не найден в справочнике.
    pub instrument_name: String,
    /// Направление сделки.
    pub side: Side,
    /// Цена исполнения.
    pub price: Money,
    /// Количество исполнения.
    pub amount: Money,
    /// Комиссия родительской операции, общая для всех её исполнений.
    pub commission: Commission,
}

/// Строка отчёта о прибылях и убытках по одному инструменту.
#[derive(Debug, Clone)]
pub struct ProfitLossRow {
    /// Название инструмента.
    pub instrument_name: String,
    /// Валюта инструмента.
    pub currency: String,
    /// Финансовый результат: минус сумма платежей по операциям.
    pub financial_result: Money,
    /// Сумма модулей комиссий по операциям.
    pub commission: Money,
    /// Итог: финансовый результат за вычетом комиссий.
    pub profit_loss: Money,
}

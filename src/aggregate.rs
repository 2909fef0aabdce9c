//! Агрегация инструментов и операций в строки отчётов.

use std::collections::BTreeMap;

use log::warn;

use crate::router::ResponseHandler;
use crate::types::{Figi, Instrument, Money, Operation, ProfitLossRow, Side, TradeRow};

/// Собирает справочник инструментов, строки сделок и корзины операций
/// для расчёта прибылей и убытков.
///
/// Порядок поступления партий произволен: операции, пришедшие раньше своего
/// инструмента, получают пустое название в строке сделки, а не ошибку.
#[derive(Debug, Clone, Default)]
pub struct TradesAggregator {
    /// Справочник инструментов по FIGI, последняя запись выигрывает.
    pub figi_to_instrument: BTreeMap<Figi, Instrument>,
    /// Строки отчёта по сделкам в порядке поступления.
    pub trades: Vec<TradeRow>,
    /// Отчётные операции по FIGI, внутри — по числовому значению `id`.
    pub operations_by_figi: BTreeMap<Figi, BTreeMap<i64, Operation>>,
}

impl TradesAggregator {
    /// Создаёт пустой агрегатор.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Считает прибыли и убытки по каждому инструменту с операциями.
    ///
    /// Инструмент, которого нет в справочнике, делает расчёт своей корзины
    /// невозможным: корзина пропускается с записью в журнал, остальные
    /// считаются дальше. Строки идут в порядке ключей справочника.
    pub fn profit_loss(&self) -> Vec<ProfitLossRow> {
        let mut rows = Vec::new();

        for (figi, operations) in &self.operations_by_figi {
            let Some(instrument) = self.figi_to_instrument.get(figi) else {
                warn!("ProfitLoss. Unknown instrument {figi}, bucket skipped");
                continue;
            };

            let mut financial_result = Money::ZERO;
            let mut commission = Money::ZERO;
            for operation in operations.values() {
                financial_result -= operation.payment;
                commission += operation.commission.value.abs();
            }

            rows.push(ProfitLossRow {
                instrument_name: instrument.name.clone(),
                currency: instrument.currency.clone(),
                financial_result,
                commission,
                profit_loss: financial_result - commission,
            });
        }

        rows
    }
}

/// Пригодна ли операция для отчёта по сделкам и расчёта P&L.
fn is_reportable(operation: &Operation) -> bool {
    matches!(operation.operation_type.as_str(), "Buy" | "Sell" | "BuyCard")
        && operation.status != "Declined"
        && !operation.trades.is_empty()
        && operation.instrument_type == "Stock"
        && operation.id != "-1"
}

/// Числовой ключ упорядочивания операции.
fn numeric_id(operation: &Operation) -> Option<i64> {
    operation.id.parse().ok()
}

impl ResponseHandler for TradesAggregator {
    fn on_instruments(&mut self, instruments: Vec<Instrument>) {
        for instrument in instruments {
            debug_assert!(
                !instrument.figi.0.is_empty() && !instrument.name.is_empty(),
                "instrument without figi or name"
            );
            self.figi_to_instrument
                .insert(instrument.figi.clone(), instrument);
        }
    }

    fn on_operations(&mut self, operations: Vec<Operation>) {
        for operation in operations {
            if !is_reportable(&operation) {
                continue;
            }

            let instrument_name = match self.figi_to_instrument.get(&operation.figi) {
                Some(instrument) => instrument.name.clone(),
                None => {
                    warn!("Unknown instrument {} for operation {}", operation.figi, operation.id);
                    String::new()
                }
            };

            let side = if operation.operation_type == "Sell" {
                Side::Sell
            } else {
                Side::Buy
            };

            for trade in &operation.trades {
                // TODO: разносить комиссию по исполнениям, а не копировать целиком
                self.trades.push(TradeRow {
                    instrument_name: instrument_name.clone(),
                    side,
                    price: trade.price,
                    amount: trade.quantity,
                    commission: operation.commission.clone(),
                });
            }

            let Some(id) = numeric_id(&operation) else {
                warn!("Non-numeric operation id '{}', excluded from P&L", operation.id);
                continue;
            };
            self.operations_by_figi
                .entry(operation.figi.clone())
                .or_default()
                .entry(id)
                .or_insert(operation);
        }
    }
}

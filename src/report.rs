//! Запись отчётов по сделкам и прибылям/убыткам в текстовые файлы.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::ApiError;
use crate::types::{ProfitLossRow, TradeRow};

/// Заголовок отчёта по сделкам.
const TRADES_HEADER: &str = "Instrument Name;Side;Price;Amount;Commission Currency;Commission Value";

/// Заголовок отчёта о прибылях и убытках.
const PROFIT_LOSS_HEADER: &str =
    "Instrument Name;Result(without commission);Commission(only trades commission);Profit & Loss;Currency";

/// Куда писать файлы отчётов.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Каталог для выходных файлов.
    pub output_dir: PathBuf,
}

/// Пишет накопленные строки отчётов в файлы с разделителем `;`.
///
/// Файлы записываются целиком за один вызов, без восстановления после
/// частичной записи.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    /// Создаёт писатель с указанной конфигурацией путей.
    #[inline]
    pub const fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Сохраняет отчёт по сделкам в `trades.output`.
    ///
    /// Пустой список сделок файла не создаёт. Каждая строка данных
    /// предваряется переводом строки; пустые строковые поля выводятся
    /// литералом `""`, чтобы отличать их от пропавших колонок.
    pub fn write_trades(&self, trades: &[TradeRow]) -> Result<Option<PathBuf>, ApiError> {
        if trades.is_empty() {
            warn!("SaveTrades. No trades");
            return Ok(None);
        }

        let mut buffer = String::from(TRADES_HEADER);
        for trade in trades {
            buffer.push('\n');
            buffer.push_str(&format_trade(trade));
        }

        let path = self.config.output_dir.join("trades.output");
        fs::write(&path, buffer)?;
        info!("Trades saved to {}", path.display());
        Ok(Some(path))
    }

    /// Сохраняет отчёт о прибылях и убытках; границы периода входят в имя
    /// файла.
    ///
    /// Пустой список строк файла не создаёт.
    pub fn write_profit_loss(
        &self,
        rows: &[ProfitLossRow],
        from_time: &str,
        to_time: &str,
    ) -> Result<Option<PathBuf>, ApiError> {
        if rows.is_empty() {
            warn!("SaveProfitLoss. No operations");
            return Ok(None);
        }

        let mut buffer = String::from(PROFIT_LOSS_HEADER);
        for row in rows {
            buffer.push('\n');
            buffer.push_str(&format_profit_loss(row));
        }

        let path = self
            .config
            .output_dir
            .join(format!("profit-loss-{from_time}-{to_time}.output"));
        fs::write(&path, buffer)?;
        info!("Profit and loss saved to {}", path.display());
        Ok(Some(path))
    }
}

/// Пустую строку показывает как литерал `""`.
fn show_empty(value: &str) -> &str {
    if value.is_empty() { "\"\"" } else { value }
}

fn format_trade(trade: &TradeRow) -> String {
    format!(
        "{};{};{};{};{};{}",
        show_empty(&trade.instrument_name),
        trade.side,
        trade.price,
        trade.amount,
        show_empty(&trade.commission.currency),
        trade.commission.value,
    )
}

fn format_profit_loss(row: &ProfitLossRow) -> String {
    format!(
        "{};{};{};{};{}",
        show_empty(&row.instrument_name),
        row.financial_result,
        row.commission,
        row.profit_loss,
        show_empty(&row.currency),
    )
}

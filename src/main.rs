//! CLI: одним прогоном забирает справочник акций и операции за период и
//! сохраняет отчёты по сделкам и прибылям/убыткам.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use tinkoff_trades_report::{
    ApiConfig, DEFAULT_HOST, InvestApiClient, OperationsRequest, ReportConfig, ReportWriter,
    ResponseKind, ResponseRouter, TradesAggregator,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bearer-токен Tinkoff OpenAPI
    token: String,

    /// Начало периода операций, RFC 3339
    #[arg(long, default_value = "2019-01-01T00:00:01.000000+03:00")]
    from: String,

    /// Конец периода операций, RFC 3339
    #[arg(long, default_value = "2020-04-24T00:00:01.000000+03:00")]
    to: String,

    /// Ограничить операции одним FIGI
    #[arg(long, default_value = "")]
    figi: String,

    /// Хост API
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Каталог для файлов отчётов
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let request = OperationsRequest::new(&args.from, &args.to, &args.figi)?;
    let client = InvestApiClient::new(ApiConfig {
        host: args.host,
        token: args.token,
    })?;

    let mut router = ResponseRouter::new(TradesAggregator::new());

    let stocks = client
        .market_stocks()
        .context("market stocks request failed")?;
    if let Err(err) = router.route(&stocks, ResponseKind::MarketStocks) {
        error!("Market stocks response dropped: {err}");
    }

    let operations = client
        .operations(&request)
        .context("operations request failed")?;
    if let Err(err) = router.route(&operations, ResponseKind::Operations) {
        error!("Operations response dropped: {err}");
    }

    let aggregator = router.into_handler().unwrap_or_default();
    let writer = ReportWriter::new(ReportConfig {
        output_dir: args.out_dir,
    });
    writer.write_trades(&aggregator.trades)?;
    writer.write_profit_loss(&aggregator.profit_loss(), &request.from, &request.to)?;

    Ok(())
}

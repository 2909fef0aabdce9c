use tinkoff_trades_report::{
    Commission, Figi, Instrument, Money, Operation, ReportConfig, ReportWriter, ResponseHandler,
    ResponseKind, ResponseRouter, Side, Trade, TradeRow, TradesAggregator,
};

fn money(value: &str) -> Money {
    value.parse().expect("valid decimal")
}

fn instrument(figi: &str, name: &str, currency: &str) -> Instrument {
    Instrument {
        figi: Figi::from(figi),
        name: name.to_string(),
        currency: currency.to_string(),
        ..Instrument::default()
    }
}

fn execution(trade_id: &str, price: &str, quantity: &str) -> Trade {
    Trade {
        trade_id: trade_id.to_string(),
        date: "2020-01-01T10:00:00.000000+03:00".to_string(),
        price: money(price),
        quantity: money(quantity),
    }
}

fn stock_operation(
    id: &str,
    operation_type: &str,
    figi: &str,
    payment: &str,
    commission_value: &str,
    trades: Vec<Trade>,
) -> Operation {
    Operation {
        id: id.to_string(),
        status: "Done".to_string(),
        operation_type: operation_type.to_string(),
        figi: Figi::from(figi),
        instrument_type: "Stock".to_string(),
        payment: money(payment),
        currency: "USD".to_string(),
        date: "2020-01-01T10:00:00.000000+03:00".to_string(),
        commission: Commission {
            currency: "USD".to_string(),
            value: money(commission_value),
        },
        trades,
        ..Operation::default()
    }
}

#[test]
fn filter_excludes_ineligible_operations() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);

    let eligible = stock_operation("1", "Buy", "F1", "-10", "0.1", vec![execution("t", "10", "1")]);

    let mut declined = eligible.clone();
    declined.id = "2".to_string();
    declined.status = "Declined".to_string();

    let mut transaction = eligible.clone();
    transaction.id = "3".to_string();
    transaction.operation_type = "Transaction".to_string();

    let mut bond = eligible.clone();
    bond.id = "4".to_string();
    bond.instrument_type = "Bond".to_string();

    let mut sentinel = eligible.clone();
    sentinel.id = "-1".to_string();

    let mut without_trades = eligible.clone();
    without_trades.id = "6".to_string();
    without_trades.trades.clear();

    aggregator.on_operations(vec![eligible, declined, transaction, bond, sentinel, without_trades]);

    assert_eq!(aggregator.trades.len(), 1);
    let bucket = &aggregator.operations_by_figi[&Figi::from("F1")];
    assert_eq!(bucket.len(), 1);
    assert!(bucket.contains_key(&1));
}

#[test]
fn buycard_and_sell_side_mapping() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);
    aggregator.on_operations(vec![
        stock_operation("1", "BuyCard", "F1", "-10", "0", vec![execution("t1", "10", "1")]),
        stock_operation("2", "Sell", "F1", "10", "0", vec![execution("t2", "10", "1")]),
    ]);

    assert_eq!(aggregator.trades[0].side, Side::Buy);
    assert_eq!(aggregator.trades[1].side, Side::Sell);
}

#[test]
fn trade_rows_take_execution_values_and_share_commission() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);

    let mut operation = stock_operation(
        "1",
        "Buy",
        "F1",
        "-500",
        "-0.25",
        vec![execution("t1", "250", "1"), execution("t2", "251", "1")],
    );
    operation.price = money("999");
    operation.quantity = money("999");
    aggregator.on_operations(vec![operation]);

    assert_eq!(aggregator.trades.len(), 2);
    assert_eq!(aggregator.trades[0].price, money("250"));
    assert_eq!(aggregator.trades[1].price, money("251"));
    assert_eq!(aggregator.trades[0].amount, money("1"));
    assert_eq!(aggregator.trades[0].commission.value, money("-0.25"));
    assert_eq!(aggregator.trades[1].commission.value, money("-0.25"));
}

#[test]
fn unknown_instrument_gives_empty_name_but_skips_pl_bucket() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_operations(vec![stock_operation(
        "1",
        "Buy",
        "F9",
        "-10",
        "0.1",
        vec![execution("t", "10", "1")],
    )]);

    assert_eq!(aggregator.trades.len(), 1);
    assert!(aggregator.trades[0].instrument_name.is_empty());
    assert!(aggregator.profit_loss().is_empty());
}

#[test]
fn reingesting_instruments_is_idempotent_and_last_write_wins() {
    let batch = vec![
        instrument("F1", "Acme", "USD"),
        instrument("F2", "Globex", "RUB"),
    ];

    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(batch.clone());
    aggregator.on_instruments(batch);
    assert_eq!(aggregator.figi_to_instrument.len(), 2);
    assert_eq!(aggregator.figi_to_instrument[&Figi::from("F1")].name, "Acme");

    aggregator.on_instruments(vec![
        instrument("F1", "Acme Old", "USD"),
        instrument("F1", "Acme New", "USD"),
    ]);
    assert_eq!(
        aggregator.figi_to_instrument[&Figi::from("F1")].name,
        "Acme New"
    );
}

#[test]
fn operations_order_numerically_not_lexicographically() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);
    aggregator.on_operations(vec![
        stock_operation("10", "Buy", "F1", "-10", "0", vec![execution("t1", "10", "1")]),
        stock_operation("2", "Buy", "F1", "-10", "0", vec![execution("t2", "10", "1")]),
    ]);

    let ids: Vec<i64> = aggregator.operations_by_figi[&Figi::from("F1")]
        .keys()
        .copied()
        .collect();
    assert_eq!(ids, [2, 10]);
}

#[test]
fn duplicate_numeric_id_keeps_first_operation() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);
    aggregator.on_operations(vec![
        stock_operation("7", "Buy", "F1", "-10", "0", vec![execution("t1", "10", "1")]),
        stock_operation("7", "Buy", "F1", "-99", "0", vec![execution("t2", "99", "1")]),
    ]);

    let bucket = &aggregator.operations_by_figi[&Figi::from("F1")];
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[&7].payment, money("-10"));
}

#[test]
fn non_numeric_id_is_excluded_from_pl_but_not_from_trades() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);
    aggregator.on_operations(vec![stock_operation(
        "abc",
        "Buy",
        "F1",
        "-10",
        "0",
        vec![execution("t", "10", "1")],
    )]);

    assert_eq!(aggregator.trades.len(), 1);
    assert!(aggregator.operations_by_figi.is_empty());
}

#[test]
fn profit_loss_arithmetic() {
    let mut aggregator = TradesAggregator::new();
    aggregator.on_instruments(vec![instrument("F1", "Acme", "USD")]);
    aggregator.on_operations(vec![
        stock_operation("1", "Buy", "F1", "-100", "1.5", vec![execution("t1", "100", "1")]),
        stock_operation("2", "Buy", "F1", "-50", "-2.0", vec![execution("t2", "50", "1")]),
    ]);

    let rows = aggregator.profit_loss();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].financial_result, money("150"));
    assert_eq!(rows[0].commission, money("3.5"));
    assert_eq!(rows[0].profit_loss, money("146.5"));
    assert_eq!(rows[0].instrument_name, "Acme");
    assert_eq!(rows[0].currency, "USD");
}

#[test]
fn end_to_end_reports_from_raw_bodies() {
    let stocks = r#"{ "payload": { "instruments": [
        { "figi": "F1", "name": "Acme", "currency": "USD" }
    ] } }"#;
    let operations = r#"{ "payload": { "operations": [
        { "id": "5", "operationType": "Buy", "status": "Done",
          "instrumentType": "Stock", "figi": "F1", "payment": -10,
          "commission": { "value": 1, "currency": "USD" },
          "trades": [ { "tradeId": "t1", "date": "2020-01-01", "price": 10, "quantity": 1 } ] }
    ] } }"#;

    let mut router = ResponseRouter::new(TradesAggregator::new());
    router
        .route(stocks, ResponseKind::MarketStocks)
        .expect("route stocks");
    router
        .route(operations, ResponseKind::Operations)
        .expect("route operations");
    let aggregator = router.into_handler().expect("handler");

    let dir = tempfile::tempdir().expect("tempdir");
    let writer = ReportWriter::new(ReportConfig {
        output_dir: dir.path().to_path_buf(),
    });

    let trades_path = writer
        .write_trades(&aggregator.trades)
        .expect("write trades")
        .expect("trades file");
    let trades_text = std::fs::read_to_string(trades_path).expect("read trades");
    assert_eq!(
        trades_text,
        "Instrument Name;Side;Price;Amount;Commission Currency;Commission Value\n\
         Acme;Buy;10;1;USD;1"
    );

    let pl_path = writer
        .write_profit_loss(&aggregator.profit_loss(), "2020-01-01", "2020-02-01")
        .expect("write profit loss")
        .expect("profit loss file");
    assert_eq!(
        pl_path.file_name().and_then(|name| name.to_str()),
        Some("profit-loss-2020-01-01-2020-02-01.output")
    );
    let pl_text = std::fs::read_to_string(pl_path).expect("read profit loss");
    assert_eq!(
        pl_text,
        "Instrument Name;Result(without commission);Commission(only trades commission);Profit & Loss;Currency\n\
         Acme;10;1;9;USD"
    );
}

#[test]
fn empty_inputs_produce_no_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = ReportWriter::new(ReportConfig {
        output_dir: dir.path().to_path_buf(),
    });

    assert!(writer.write_trades(&[]).expect("write").is_none());
    assert!(
        writer
            .write_profit_loss(&[], "2020-01-01", "2020-02-01")
            .expect("write")
            .is_none()
    );
    assert!(!dir.path().join("trades.output").exists());
}

#[test]
fn empty_string_fields_render_as_quote_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = ReportWriter::new(ReportConfig {
        output_dir: dir.path().to_path_buf(),
    });

    let row = TradeRow {
        instrument_name: String::new(),
        side: Side::Buy,
        price: money("10"),
        amount: money("1"),
        commission: Commission::default(),
    };
    let path = writer
        .write_trades(&[row])
        .expect("write")
        .expect("file");
    let text = std::fs::read_to_string(path).expect("read");
    assert!(text.ends_with("\n\"\";Buy;10;1;\"\";0"));
}

use std::sync::Arc;

use angelfetch_core::{
    normalize_interval, Candle, CandleRow, CandleTable, ClientConfig, ClientError, Credentials,
    DateFormat, FromCandles, HistoricalData, HistoricalFetcher, HistoryQuery, ReqwestHttpClient,
    SessionProvider, SmartApiGateway, TableOptions, CANDLE_FIELDS,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{labels, load_catalog, plan, CommandResult};

pub async fn run(args: &HistoryArgs) -> Result<CommandResult, CliError> {
    let fetcher = HistoricalData::new(&args.exchange, &args.token)?;
    let queries = build_queries(args)?;
    for query in &queries {
        fetcher.prepare(query)?;
    }

    let config = ClientConfig::from_env()?;
    let credentials = Credentials::from_env()?;
    let catalog = load_catalog(config.error_catalog.as_deref())?;

    let http_client = ReqwestHttpClient::try_new()
        .map_err(|error| CliError::Client(ClientError::Transport(error)))?;
    let gateway = SmartApiGateway::new(Arc::new(http_client), config);
    let session = gateway
        .login(&credentials)
        .await
        .map_err(|error| CliError::from_client(error, &catalog))?;
    let client = gateway.client(session);

    let total = queries.len();
    let mut rows = Vec::new();
    for (index, query) in queries.into_iter().enumerate() {
        debug!(chunk = index + 1, total, "fetching window");
        let chunk = fetcher
            .fetch_as::<Vec<CandleRow>>(query, &client, ())
            .await
            .map_err(|error| CliError::from_core(error, &catalog))?;
        rows.extend(chunk);
    }

    info!(
        instrument = %fetcher.instrument(),
        rows = rows.len(),
        requests = total,
        "history fetched"
    );
    shape(rows, args)
}

/// One query per request window; a single window unless `--chunked`.
fn build_queries(args: &HistoryArgs) -> Result<Vec<HistoryQuery>, CliError> {
    let window = &args.window;
    let date_format = DateFormat::parse(&window.date_format)?;

    let bounds = if args.chunked {
        let interval = normalize_interval(&window.interval)?;
        plan::windows(window, interval, &date_format)?
    } else {
        vec![(window.from.clone(), window.to.clone())]
    };

    Ok(bounds
        .into_iter()
        .map(|(from, to)| {
            HistoryQuery::new(window.interval.as_str(), from, to)
                .with_date_format(date_format.clone())
        })
        .collect())
}

fn shape(rows: Vec<CandleRow>, args: &HistoryArgs) -> Result<CommandResult, CliError> {
    if args.typed {
        let candles = Vec::<Candle>::from_candles(rows, ())?;
        let data = serde_json::to_value(&candles)?;
        let table_rows = match &data {
            Value::Array(items) => items
                .iter()
                .map(|item| CANDLE_FIELDS.iter().map(|field| item[*field].clone()).collect())
                .collect(),
            _ => Vec::new(),
        };
        return Ok(CommandResult::new(data, labels(&CANDLE_FIELDS), table_rows));
    }

    if let Some(columns) = &args.columns {
        let table = CandleTable::from_candles(rows, TableOptions::with_columns(columns.clone()))?;
        let table_rows = table.rows().iter().map(|row| row.cells().to_vec()).collect();
        return Ok(CommandResult::new(
            serde_json::to_value(&table)?,
            table.columns().to_vec(),
            table_rows,
        ));
    }

    let table_rows: Vec<Vec<Value>> = Vec::<Vec<Value>>::from_candles(rows, ())?;
    Ok(CommandResult::new(
        Value::from(table_rows.clone()),
        labels(&CANDLE_FIELDS),
        table_rows,
    ))
}

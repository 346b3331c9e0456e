use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use option_chain_recorder::data::load_rows;
use option_chain_recorder::fetch::{FetchError, SnapshotSource};
use option_chain_recorder::model::{COLUMNS, RawSnapshot};
use option_chain_recorder::record::{Recorder, RecorderConfig, RunSummary};

// ── Mock source ─────────────────────────────────────────────────────

enum Reply {
    Snapshot(Value),
    Status(u16),
    BadBody,
}

/// Serves canned replies per symbol and records the call order.
struct MockSource {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    fn new(replies: Vec<(&str, Reply)>) -> Self {
        MockSource {
            replies: replies.into_iter().map(|(s, r)| (s.to_string(), r)).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotSource for MockSource {
    async fn fetch(&self, symbol: &str) -> Result<RawSnapshot, FetchError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        match self.replies.get(symbol) {
            Some(Reply::Snapshot(v)) => Ok(serde_json::from_value(v.clone())?),
            Some(Reply::Status(code)) => Err(FetchError::HttpStatus { code: *code }),
            Some(Reply::BadBody) | None => {
                Err(serde_json::from_str::<RawSnapshot>("<html>blocked</html>").unwrap_err().into())
            }
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn leg(strike: f64) -> Value {
    json!({
        "strikePrice": strike, "openInterest": 10, "changeinOpenInterest": 1,
        "pchangeinOpenInterest": 11.1, "totalTradedVolume": 5, "impliedVolatility": 12.5,
        "lastPrice": 101.5, "change": 2.5, "pChange": 2.5, "totalBuyQuantity": 100,
        "totalSellQuantity": 150, "bidQty": 25, "bidprice": 101.0, "askQty": 50,
        "askPrice": 102.0, "underlyingValue": 18000.0
    })
}

/// One expiry, `strikes` strikes, each with both legs.
fn chain(strikes: usize) -> Reply {
    let data: Vec<Value> = (0..strikes)
        .map(|i| {
            let strike = 18000.0 + 50.0 * i as f64;
            json!({"expiryDate": "29-Dec-2022", "strikePrice": strike,
                   "CE": leg(strike), "PE": leg(strike)})
        })
        .collect();
    Reply::Snapshot(json!({"records": {"expiryDates": ["29-Dec-2022"], "data": data}}))
}

fn config(symbols: &[&str], output: &Path) -> RecorderConfig {
    RecorderConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        output: output.to_path_buf(),
        pace: Duration::ZERO,
        ..RecorderConfig::default()
    }
}

fn symbols_in(path: &Path) -> Vec<String> {
    load_rows(path).unwrap().into_iter().map(|r| r.symbol).collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_records_every_symbol_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");
    let source = MockSource::new(vec![("NIFTY", chain(2)), ("BANKNIFTY", chain(1))]);

    let summary = Recorder::new(config(&["NIFTY", "BANKNIFTY"], &out))
        .run(&source)
        .await
        .unwrap();

    assert_eq!(
        summary,
        RunSummary { succeeded: 2, failed: 0, rows_written: 6 }
    );
    assert_eq!(source.calls(), vec!["NIFTY", "BANKNIFTY"]);
    assert_eq!(
        symbols_in(&out),
        vec!["NIFTY", "NIFTY", "NIFTY", "NIFTY", "BANKNIFTY", "BANKNIFTY"]
    );
}

#[tokio::test]
async fn test_fetch_failure_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");
    let source = MockSource::new(vec![
        ("NIFTY", chain(1)),
        ("FINNIFTY", Reply::Status(403)),
        ("BANKNIFTY", chain(1)),
    ]);

    let summary = Recorder::new(config(&["NIFTY", "FINNIFTY", "BANKNIFTY"], &out))
        .run(&source)
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(source.calls(), vec!["NIFTY", "FINNIFTY", "BANKNIFTY"]);
    assert_eq!(symbols_in(&out), vec!["NIFTY", "NIFTY", "BANKNIFTY", "BANKNIFTY"]);
}

#[tokio::test]
async fn test_malformed_body_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");
    let source = MockSource::new(vec![("NIFTY", Reply::BadBody), ("BANKNIFTY", chain(1))]);

    let summary = Recorder::new(config(&["NIFTY", "BANKNIFTY"], &out))
        .run(&source)
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(symbols_in(&out), vec!["BANKNIFTY", "BANKNIFTY"]);
}

#[tokio::test]
async fn test_malformed_leg_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");
    let broken = Reply::Snapshot(json!({"records": {
        "expiryDates": ["29-Dec-2022"],
        "data": [{"expiryDate": "29-Dec-2022", "strikePrice": 18000, "CE": {"lastPrice": 1.0}}]
    }}));
    let source = MockSource::new(vec![("NIFTY", broken), ("BANKNIFTY", chain(1))]);

    let summary = Recorder::new(config(&["NIFTY", "BANKNIFTY"], &out))
        .run(&source)
        .await
        .unwrap();

    assert_eq!(summary, RunSummary { succeeded: 1, failed: 1, rows_written: 2 });
    assert_eq!(symbols_in(&out), vec!["BANKNIFTY", "BANKNIFTY"]);
}

#[tokio::test]
async fn test_sink_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing-dir").join("chain.csv");
    let source = MockSource::new(vec![("NIFTY", chain(1)), ("BANKNIFTY", chain(1))]);

    let result = Recorder::new(config(&["NIFTY", "BANKNIFTY"], &out))
        .run(&source)
        .await;

    assert!(result.is_err());
    assert_eq!(source.calls(), vec!["NIFTY"]);
}

#[tokio::test]
async fn test_header_once_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");

    for _ in 0..2 {
        let source = MockSource::new(vec![("NIFTY", chain(1)), ("BANKNIFTY", chain(1))]);
        Recorder::new(config(&["NIFTY", "BANKNIFTY"], &out))
            .run(&source)
            .await
            .unwrap();
    }

    let contents = std::fs::read_to_string(&out).unwrap();
    let header = COLUMNS.join(",");
    assert_eq!(contents.lines().filter(|l| *l == header).count(), 1);
    assert_eq!(load_rows(&out).unwrap().len(), 8);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");
    let source = MockSource::new(vec![("NIFTY", chain(3))]);

    let summary = Recorder::new(RecorderConfig {
        dry_run: true,
        ..config(&["NIFTY"], &out)
    })
    .run(&source)
    .await
    .unwrap();

    assert_eq!(summary, RunSummary { succeeded: 1, failed: 0, rows_written: 0 });
    assert!(!out.exists());
}

#[tokio::test]
async fn test_pace_between_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chain.csv");
    let source = MockSource::new(vec![("NIFTY", chain(1)), ("BANKNIFTY", chain(1))]);

    let started = std::time::Instant::now();
    Recorder::new(RecorderConfig {
        pace: Duration::from_millis(150),
        ..config(&["NIFTY", "BANKNIFTY"], &out)
    })
    .run(&source)
    .await
    .unwrap();

    // One gap for two symbols; no trailing wait.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(150), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
}

//! Soroban RPC client. Polls `getEvents` for the watched sale contracts and
//! decodes their events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, SaleEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// `getEvents` accepts at most this many ids per contract filter.
const MAX_IDS_PER_FILTER: usize = 5;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `contract_ids` : contracts to watch; split into filters of five.
/// * `start_ledger` : the ledger sequence to scan from (inclusive).
/// * `cursor`       : optional opaque pagination cursor from a previous response.
/// * `limit`        : maximum number of events to return.
///
/// Returns `(events, next_cursor, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<String>, Option<u64>)> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_ids, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    if let Some(hard) = hard_error(&err) {
                        return Err(hard);
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok((result.events, result.cursor, result.latest_ledger));
            }
        }
    }
}

fn build_params(
    contract_ids: &[String],
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Value {
    let filters: Vec<Value> = contract_ids
        .chunks(MAX_IDS_PER_FILTER)
        .map(|ids| {
            json!({
                "type": "contract",
                "contractIds": ids,
            })
        })
        .collect();

    let mut params = json!({
        "filters": filters,
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`SaleEvent`] structs.
///
/// Events from failed contract calls and events without a contract id are
/// dropped.
pub fn decode_events(raw: &[RawEvent]) -> Vec<SaleEvent> {
    raw.iter().filter_map(decode_single).collect()
}

fn decode_single(raw: &RawEvent) -> Option<SaleEvent> {
    if raw.in_successful_contract_call == Some(false) {
        debug!("Skipping event from failed call: {:?}", raw.id);
        return None;
    }
    let contract_id = raw.contract_id.clone()?;

    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let subject = raw.topic.get(1).map(|t| extract_topic_value(t));
    let decoded = decode_data(&raw.value, kind);

    let event_id = raw
        .id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{ledger}-{}-{}-{}",
                raw.tx_hash.as_deref().unwrap_or("notx"),
                kind.as_str(),
                subject.as_deref().unwrap_or("")
            )
        });

    Some(SaleEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        subject,
        actor: decoded.actor,
        amount: decoded.amount,
        tokens: decoded.tokens,
        ledger,
        timestamp,
        contract_id,
        tx_hash: raw.tx_hash.clone(),
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Decoded {
    actor: Option<String>,
    amount: Option<String>,
    tokens: Option<String>,
}

/// Pull apart the JSON `value` blob that Soroban returns for event data.
/// Struct payloads arrive as objects keyed by field name; scalar payloads
/// arrive bare or wrapped as `{"type":…, "value":…}`.
/// Code -32600 / -32601 are hard failures; everything else is retried.
fn hard_error(err: &RpcError) -> Option<IndexerError> {
    matches!(err.code, -32600 | -32601).then(|| IndexerError::RpcRejected {
        code: err.code,
        message: err.message.clone(),
    })
}

fn decode_data(value: &Value, kind: EventKind) -> Decoded {
    match kind {
        EventKind::TokensPurchased => Decoded {
            actor: extract_field(value, &["contributor"]),
            amount: extract_field(value, &["value"]),
            tokens: extract_field(value, &["amount"]),
        },
        EventKind::SaleFinalized => Decoded {
            amount: extract_field(value, &["raised"]),
            ..Decoded::default()
        },
        EventKind::RefundClaimed | EventKind::RateChanged | EventKind::EndTimeExtended => {
            Decoded {
                amount: scalar(value),
                ..Decoded::default()
            }
        }
        EventKind::CapDiluted => Decoded {
            tokens: scalar(value),
            ..Decoded::default()
        },
        EventKind::EscrowOpened => Decoded {
            actor: extract_field(value, &["main"]),
            ..Decoded::default()
        },
        EventKind::Deposited | EventKind::Withdrawn => Decoded {
            actor: extract_field(value, &["contributor"]),
            amount: extract_field(value, &["amount"]),
            ..Decoded::default()
        },
        EventKind::EscrowClosed => Decoded {
            actor: extract_field(value, &["beneficiary"]),
            amount: extract_field(value, &["amount"]),
            ..Decoded::default()
        },
        EventKind::Minted => Decoded {
            actor: extract_field(value, &["caller"]),
            tokens: extract_field(value, &["amount"]),
            ..Decoded::default()
        },
        EventKind::AdminReplaced => Decoded {
            actor: extract_field(value, &["new"]),
            ..Decoded::default()
        },
        EventKind::ContractsSet => Decoded {
            actor: extract_field(value, &["token"]),
            ..Decoded::default()
        },
        EventKind::FrontsLinked
        | EventKind::FrontRegistered
        | EventKind::RefundsEnabled
        | EventKind::AdminAdded
        | EventKind::AdminRemoved
        | EventKind::ControllerPaused
        | EventKind::ControllerUnpaused
        | EventKind::ControllerKilled
        | EventKind::OwnerChanged => Decoded {
            actor: scalar(value),
            ..Decoded::default()
        },
        EventKind::MintingFinished | EventKind::MintingStarted | EventKind::Unknown => {
            Decoded::default()
        }
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            if let Some(s) = scalar(v) {
                return Some(s);
            }
        }
    }
    None
}

/// Render a bare or `{"type":…, "value":…}`-wrapped scalar as a string.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar),
        _ => None,
    }
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"purchase"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    // Fallback: treat the raw string as the symbol
    raw.to_string()
}

/// Extract an address or number from a topic entry that might be a JSON
/// object or a raw string.
fn extract_topic_value(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| scalar(&v))
        .unwrap_or_else(|| raw.to_string())
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

//! Canonical event types emitted by the crowdsale contracts.
//!
//! These mirror the `events.rs` module of each contract: `sale_campaign`,
//! `refund_escrow` and `sale_controller`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds across the three contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // ── Campaign fronts ──
    /// Tokens bought on a front (`purchase` topic).
    TokensPurchased,
    /// A front was finalized (`finalized` topic).
    SaleFinalized,
    /// A contributor reclaimed an escrowed contribution (`refunded` topic).
    RefundClaimed,
    /// Rate pushed to a front, or broadcast by the controller (`rate` topic).
    RateChanged,
    /// Sale end time moved out (`extended` topic).
    EndTimeExtended,
    /// Cap switched to its diluted unit (`diluted` topic).
    CapDiluted,
    /// Main front linked a Secondary (`linked` topic).
    FrontsLinked,

    // ── Refund escrow ──
    EscrowOpened,
    FrontRegistered,
    Deposited,
    EscrowClosed,
    RefundsEnabled,
    Withdrawn,

    // ── Controller ──
    Minted,
    AdminAdded,
    AdminRemoved,
    AdminReplaced,
    ControllerPaused,
    ControllerUnpaused,
    MintingFinished,
    MintingStarted,
    ContractsSet,
    ControllerKilled,
    OwnerChanged,

    /// An event from a watched contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "purchase" => Self::TokensPurchased,
            "finalized" => Self::SaleFinalized,
            "refunded" => Self::RefundClaimed,
            "rate" => Self::RateChanged,
            "extended" => Self::EndTimeExtended,
            "diluted" => Self::CapDiluted,
            "linked" => Self::FrontsLinked,
            "opened" => Self::EscrowOpened,
            "front" => Self::FrontRegistered,
            "deposited" => Self::Deposited,
            "closed" => Self::EscrowClosed,
            "refunds" => Self::RefundsEnabled,
            "withdrawn" => Self::Withdrawn,
            "minted" => Self::Minted,
            "admin_add" => Self::AdminAdded,
            "admin_del" => Self::AdminRemoved,
            "admin_rep" => Self::AdminReplaced,
            "paused" => Self::ControllerPaused,
            "unpaused" => Self::ControllerUnpaused,
            "mint_fin" => Self::MintingFinished,
            "mint_on" => Self::MintingStarted,
            "contracts" => Self::ContractsSet,
            "killed" => Self::ControllerKilled,
            "owner" => Self::OwnerChanged,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokensPurchased => "tokens_purchased",
            Self::SaleFinalized => "sale_finalized",
            Self::RefundClaimed => "refund_claimed",
            Self::RateChanged => "rate_changed",
            Self::EndTimeExtended => "end_time_extended",
            Self::CapDiluted => "cap_diluted",
            Self::FrontsLinked => "fronts_linked",
            Self::EscrowOpened => "escrow_opened",
            Self::FrontRegistered => "front_registered",
            Self::Deposited => "deposited",
            Self::EscrowClosed => "escrow_closed",
            Self::RefundsEnabled => "refunds_enabled",
            Self::Withdrawn => "withdrawn",
            Self::Minted => "minted",
            Self::AdminAdded => "admin_added",
            Self::AdminRemoved => "admin_removed",
            Self::AdminReplaced => "admin_replaced",
            Self::ControllerPaused => "controller_paused",
            Self::ControllerUnpaused => "controller_unpaused",
            Self::MintingFinished => "minting_finished",
            Self::MintingStarted => "minting_started",
            Self::ContractsSet => "contracts_set",
            Self::ControllerKilled => "controller_killed",
            Self::OwnerChanged => "owner_changed",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(s: &str) -> Option<Self> {
        ALL_KINDS.iter().copied().find(|k| k.as_str() == s)
    }
}

/// A fully decoded contract event, ready to be stored in the database.
///
/// Amounts are `i128` on chain, so they travel as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleEvent {
    /// RPC event id; unique per emitted event.
    pub event_id: String,
    pub event_type: String,
    /// Second topic: beneficiary, contributor, front or admin address.
    pub subject: Option<String>,
    pub actor: Option<String>,
    /// Contribution units (or the scalar payload for rate / time events).
    pub amount: Option<String>,
    /// Sale tokens involved, when the event carries a token amount.
    pub tokens: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub subject: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub tokens: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Per-contract totals aggregated from indexed purchase and refund events.
///
/// A `refunded` event is emitted by whichever front the contributor calls,
/// not necessarily the front that took the deposit, so refunds split across
/// fronts do not line up with their purchases. The escrow's own `withdrawn`
/// events are counted too: the escrow's summary carries the campaign-wide
/// refund total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractSummary {
    pub contract_id: String,
    pub purchases: usize,
    pub contributors: usize,
    pub raised: String,
    pub minted: String,
    pub refunded: String,
    pub finalized: bool,
    pub last_ledger: Option<i64>,
}

impl ContractSummary {
    /// Fold a contract's events (any order) into its summary.
    ///
    /// Amounts that fail to parse are skipped.
    pub fn from_records(contract_id: &str, records: &[EventRecord]) -> Self {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.parse::<i128>().ok());

        let mut contributors = std::collections::BTreeSet::new();
        let mut purchases = 0usize;
        let (mut raised, mut minted, mut refunded) = (0i128, 0i128, 0i128);
        let mut finalized = false;

        for record in records {
            match EventKind::from_stored(&record.event_type) {
                Some(EventKind::TokensPurchased) => {
                    purchases += 1;
                    raised = raised.saturating_add(parse(&record.amount).unwrap_or(0));
                    minted = minted.saturating_add(parse(&record.tokens).unwrap_or(0));
                    if let Some(actor) = &record.actor {
                        contributors.insert(actor.clone());
                    }
                }
                Some(EventKind::RefundClaimed | EventKind::Withdrawn) => {
                    refunded = refunded.saturating_add(parse(&record.amount).unwrap_or(0));
                }
                Some(EventKind::SaleFinalized) => finalized = true,
                _ => {}
            }
        }

        ContractSummary {
            contract_id: contract_id.to_string(),
            purchases,
            contributors: contributors.len(),
            raised: raised.to_string(),
            minted: minted.to_string(),
            refunded: refunded.to_string(),
            finalized,
            last_ledger: records.iter().map(|r| r.ledger).max(),
        }
    }
}

const ALL_KINDS: [EventKind; 25] = [
    EventKind::TokensPurchased,
    EventKind::SaleFinalized,
    EventKind::RefundClaimed,
    EventKind::RateChanged,
    EventKind::EndTimeExtended,
    EventKind::CapDiluted,
    EventKind::FrontsLinked,
    EventKind::EscrowOpened,
    EventKind::FrontRegistered,
    EventKind::Deposited,
    EventKind::EscrowClosed,
    EventKind::RefundsEnabled,
    EventKind::Withdrawn,
    EventKind::Minted,
    EventKind::AdminAdded,
    EventKind::AdminRemoved,
    EventKind::AdminReplaced,
    EventKind::ControllerPaused,
    EventKind::ControllerUnpaused,
    EventKind::MintingFinished,
    EventKind::MintingStarted,
    EventKind::ContractsSet,
    EventKind::ControllerKilled,
    EventKind::OwnerChanged,
    EventKind::Unknown,
];

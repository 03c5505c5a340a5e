//! Wallet model and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::Client;

/// Wallet entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Reference hourly rate, decimal-safe string
    pub hourly_rate_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wallet with its computed balance, as returned by wallet endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletWithBalance {
    #[serde(flatten)]
    pub wallet: Wallet,
    /// Current balance in hours, decimal-safe string
    pub balance: String,
}

/// New wallet creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWallet {
    pub client_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate_reference: Option<String>,
}

/// Wallet update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWallet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate_reference: Option<String>,
}

//! Client model and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wallet::WalletWithBalance;

/// Client entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub notes: Option<String>,
    /// Sum of the client's wallet balances, present on detail responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_balance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallets: Option<Vec<WalletWithBalance>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New client creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Client update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateClient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

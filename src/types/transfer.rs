use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub source_rib: String,
    pub destination_rib: String,
    pub amount: f64,
    pub motif: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_transaction_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_transaction_id: Option<i64>,
}

impl TransferRequest {
    /// Checks done before the request leaves; the server re-validates anyway.
    pub fn validate(&self) -> Result<()> {
        if self.source_rib.is_empty() {
            bail!("source RIB cannot be empty");
        }
        if self.destination_rib.is_empty() {
            bail!("destination RIB cannot be empty");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            bail!("amount must be a positive number, found {}", self.amount);
        }
        Ok(())
    }
}

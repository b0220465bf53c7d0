use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

use super::date::{format_optional_date, ApiDate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    #[serde(default)]
    pub accounts: Vec<AccountSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_rib: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_account_balance: Option<f64>,

    #[serde(default)]
    pub total_transactions: u64,

    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,

    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub rib: String,

    #[serde(default)]
    pub balance: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transaction_date: Option<ApiDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// `CREDIT` or `DEBIT`.
    #[serde(default)]
    pub transaction_type: String,

    #[serde(default)]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<ApiDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<ApiDate>,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.transaction_type.eq_ignore_ascii_case("CREDIT")
    }

    pub fn signed_amount(&self) -> String {
        let sign = if self.is_credit() { '+' } else { '-' };
        format!("{sign}{:.2}", self.amount.abs())
    }

    fn when(&self) -> String {
        match self.created_at {
            Some(_) => format_optional_date(&self.created_at),
            None => format_optional_date(&self.date),
        }
    }
}

impl TerminalDisplay for AccountSummary {
    fn table_titles() -> Vec<&'static str> {
        vec!["RIB", "Balance", "Last Transaction"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.rib,
            format!("{:.2}", self.balance),
            format_optional_date(&self.last_transaction_date),
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["rib", "balance"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![("rib", self.rib), ("balance", self.balance.to_string())]
            .into_iter()
            .collect()
    }
}

impl TerminalDisplay for Transaction {
    fn table_titles() -> Vec<&'static str> {
        vec!["Type", "Amount", "Motif", "Date"]
    }

    fn table_row(self) -> Vec<String> {
        let amount = self.signed_amount();
        let when = self.when();
        vec![
            self.transaction_type,
            amount,
            self.motif.unwrap_or_default(),
            when,
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["id", "type", "amount", "motif"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("id", self.id.map(|id| id.to_string()).unwrap_or_default()),
            ("amount", self.signed_amount()),
            ("type", self.transaction_type),
            ("motif", self.motif.unwrap_or_default()),
        ]
        .into_iter()
        .collect()
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

use super::customer::Customer;
use super::date::{format_optional_date, ApiDate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccountRequest {
    pub rib: String,
    pub identity_number: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub rib: String,

    #[serde(default)]
    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<ApiDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl TerminalDisplay for BankAccount {
    fn table_titles() -> Vec<&'static str> {
        vec!["RIB", "Balance", "Status", "Owner", "Created"]
    }

    fn table_row(self) -> Vec<String> {
        let owner = match self.customer {
            Some(customer) => customer.identity_number,
            None => String::from("-"),
        };
        vec![
            self.rib,
            format!("{:.2}", self.amount),
            self.account_status.unwrap_or_else(|| String::from("-")),
            owner,
            format_optional_date(&self.created_at),
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["rib", "balance", "status", "owner"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        let owner = self
            .customer
            .map(|c| c.identity_number)
            .unwrap_or_default();
        vec![
            ("rib", self.rib),
            ("balance", self.amount.to_string()),
            ("status", self.account_status.unwrap_or_default()),
            ("owner", owner),
        ]
        .into_iter()
        .collect()
    }
}

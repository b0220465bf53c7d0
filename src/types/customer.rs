use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

use super::date::{format_optional_date, ApiDate};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub firstname: String,
    pub lastname: String,
    pub identity_number: String,
    pub birth_date: DateTime<Utc>,
    pub email: String,
    pub postal_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default)]
    pub firstname: String,

    #[serde(default)]
    pub lastname: String,

    #[serde(default)]
    pub identity_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<ApiDate>,
}

impl TerminalDisplay for Customer {
    fn table_titles() -> Vec<&'static str> {
        vec!["Identity", "Name", "Email", "Birth"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.identity_number,
            format!("{} {}", self.firstname, self.lastname),
            self.email.unwrap_or_default(),
            format_optional_date(&self.birth_date),
        ]
    }

    fn csv_titles() -> Vec<&'static str> {
        vec!["identity", "firstname", "lastname", "email", "address"]
    }

    fn csv_row(self) -> HashMap<&'static str, String> {
        vec![
            ("identity", self.identity_number),
            ("firstname", self.firstname),
            ("lastname", self.lastname),
            ("email", self.email.unwrap_or_default()),
            ("address", self.postal_address.unwrap_or_default()),
        ]
        .into_iter()
        .collect()
    }
}

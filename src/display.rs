use std::collections::HashMap;

use anyhow::{bail, Result};
use clap::ValueEnum;
use console::style;
use serde::Serialize;

use crate::router::{Page, View};
use crate::table::Table;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DisplayStyle {
    Table,
    Json,
    Csv,
}

pub trait TerminalDisplay {
    fn table_titles() -> Vec<&'static str>;
    fn table_row(self) -> Vec<String>;

    fn csv_titles() -> Vec<&'static str>;
    fn csv_row(self) -> HashMap<&'static str, String>;
}

pub fn display_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

pub fn display_list<T: Serialize + TerminalDisplay>(
    list: Vec<T>,
    style: DisplayStyle,
    headless: bool,
) -> Result<()> {
    match style {
        DisplayStyle::Table => {
            if list.is_empty() {
                println!("<empty list>");
                return Ok(());
            }
            let mut table = Table::with_capacity(list.len(), headless);
            let titles = T::table_titles();
            table.add(titles.iter().map(|s| s.to_string()).collect())?;

            for item in list {
                table.add(item.table_row())?;
            }

            table.show();
        }
        DisplayStyle::Csv => {
            let titles = T::csv_titles();
            if !headless {
                println!("{}", titles.join(","));
            }
            for item in list {
                let mut row = item.csv_row();
                let mut values = Vec::with_capacity(titles.len());
                for title in titles.iter() {
                    match row.remove(*title) {
                        Some(value) => values.push(value),
                        None => bail!("missing csv column '{title}'"),
                    }
                }
                println!("{}", values.join(","));
            }
        }
        DisplayStyle::Json => {
            let json = serde_json::to_string_pretty(&list)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Prints a view that is not the page the command wanted to show.
pub fn display_view(view: View, location: &str) {
    match view {
        View::AccessDenied(page) => {
            println!("{}", style("Access denied").yellow().bold());
            println!(
                "You are not allowed to use '{page}' ({location}). Please contact your administrator."
            );
        }
        View::Content(Page::Login) => {
            println!("Please login first: ebank login <username>");
        }
        View::Content(page) => {
            println!("{page} ({location})");
        }
    }
}

pub fn display_success(message: &str) {
    println!("{}", style(message).green());
}

pub fn display_error(message: &str) {
    eprintln!("{}", style(message).red());
}

pub fn display_notice(message: &str) {
    eprintln!("{}", style(message).yellow());
}

#[cfg(test)]
mod tests {
    use crate::types::account::BankAccount;

    use super::*;

    fn account(rib: &str) -> BankAccount {
        serde_json::from_value(serde_json::json!({"rib": rib, "amount": 12.5})).unwrap()
    }

    #[test]
    fn test_display_outputs() {
        for style in [DisplayStyle::Table, DisplayStyle::Json, DisplayStyle::Csv] {
            display_list(vec![account("RIB-1"), account("RIB-2")], style, false).unwrap();
            display_list(Vec::<BankAccount>::new(), style, true).unwrap();
        }

        display_view(View::AccessDenied(Page::Transfer), "/client/transfer");
        display_view(View::Content(Page::Login), "/login");
        display_error("Error: Transfer failed");
        display_notice("Session invalid, please authenticate");
    }
}

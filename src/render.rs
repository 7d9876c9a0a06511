use std::collections::BTreeMap;

use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::error::{Result, StashLogError};
use crate::fmt;
use crate::models::{Action, MovementPair, ProcessedEntry};
use crate::settings::{OutputFormat, Timezone};

const LOG_COLUMNS: [&str; 8] = [
    "timestamp",
    "stash_name",
    "account_name",
    "action",
    "number",
    "item_name",
    "display_number",
    "original_number",
];

#[derive(Serialize)]
struct QuantityRow<'a> {
    stash_name: &'a str,
    item_name: &'a str,
    quantity: i64,
}

/// Table cells for one log row; `added` rows are green, `removed` rows red.
fn log_row(p: &ProcessedEntry, tz: Timezone) -> Vec<String> {
    let cells = [
        fmt::timestamp(p.entry.timestamp, tz),
        p.entry.stash_name.clone(),
        p.entry.account_name.clone(),
        p.entry.action.as_str().to_string(),
        p.display_number.clone(),
        p.entry.item_name.clone(),
    ];
    cells
        .into_iter()
        .map(|text| match p.entry.action {
            Action::Added => text.green().to_string(),
            Action::Removed => text.red().to_string(),
            Action::Modified => text,
        })
        .collect()
}

fn csv_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| StashLogError::Other(e.to_string()))
}

// ---------------------------------------------------------------------------
// Reconciled log
// ---------------------------------------------------------------------------

pub fn log(entries: &[ProcessedEntry], format: OutputFormat, tz: Timezone) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(log_table(entries, tz)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
        OutputFormat::Csv => log_csv(entries),
    }
}

fn log_table(entries: &[ProcessedEntry], tz: Timezone) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Timestamp", "Stash", "Account", "Action", "Number", "Item"]);
    for p in entries {
        table.add_row(log_row(p, tz));
    }
    table.to_string()
}

fn log_csv(entries: &[ProcessedEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(LOG_COLUMNS)?;
    for p in entries {
        wtr.write_record([
            p.entry.timestamp.to_string(),
            p.entry.stash_name.clone(),
            p.entry.account_name.clone(),
            p.entry.action.as_str().to_string(),
            p.entry.number.to_string(),
            p.entry.item_name.clone(),
            p.display_number.clone(),
            p.original_number.to_string(),
        ])?;
    }
    csv_string(wtr)
}

// ---------------------------------------------------------------------------
// Cancelled movements
// ---------------------------------------------------------------------------

pub fn movements(pairs: &[MovementPair], format: OutputFormat, tz: Timezone) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(movements_table(pairs, tz)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(pairs)?),
        OutputFormat::Csv => movements_csv(pairs),
    }
}

fn movements_table(pairs: &[MovementPair], tz: Timezone) -> String {
    let mut table = Table::new();
    table.set_header(vec!["First", "Second", "Minutes", "Account", "Item", "Number", "From", "To"]);
    for pair in pairs {
        let (from, to) = if pair.first.action == Action::Removed {
            (&pair.first.stash_name, &pair.second.stash_name)
        } else {
            (&pair.second.stash_name, &pair.first.stash_name)
        };
        table.add_row(vec![
            Cell::new(fmt::timestamp(pair.first.timestamp, tz)),
            Cell::new(fmt::timestamp(pair.second.timestamp, tz)),
            Cell::new(format!("{:.1}", pair.minutes_apart())),
            Cell::new(&pair.first.account_name),
            Cell::new(&pair.first.item_name),
            Cell::new(pair.first.number),
            Cell::new(from),
            Cell::new(to),
        ]);
    }
    table.to_string()
}

fn movements_csv(pairs: &[MovementPair]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "first_timestamp",
        "first_action",
        "first_stash",
        "second_timestamp",
        "second_action",
        "second_stash",
        "account_name",
        "item_name",
        "number",
    ])?;
    for pair in pairs {
        wtr.write_record([
            pair.first.timestamp.to_string(),
            pair.first.action.as_str().to_string(),
            pair.first.stash_name.clone(),
            pair.second.timestamp.to_string(),
            pair.second.action.as_str().to_string(),
            pair.second.stash_name.clone(),
            pair.first.account_name.clone(),
            pair.first.item_name.clone(),
            pair.first.number.to_string(),
        ])?;
    }
    csv_string(wtr)
}

// ---------------------------------------------------------------------------
// Running quantities
// ---------------------------------------------------------------------------

pub fn quantities(totals: &BTreeMap<(String, String), i64>, format: OutputFormat) -> Result<String> {
    let rows: Vec<QuantityRow> = totals
        .iter()
        .map(|((stash, item), qty)| QuantityRow {
            stash_name: stash,
            item_name: item,
            quantity: *qty,
        })
        .collect();
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec!["Stash", "Item", "Quantity"]);
            for row in &rows {
                let qty = if row.quantity < 0 {
                    row.quantity.to_string().red().to_string()
                } else {
                    row.quantity.to_string()
                };
                table.add_row(vec![Cell::new(row.stash_name), Cell::new(row.item_name), Cell::new(qty)]);
            }
            Ok(table.to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(Vec::new());
            wtr.write_record(["stash_name", "item_name", "quantity"])?;
            for row in &rows {
                wtr.write_record([row.stash_name, row.item_name, row.quantity.to_string().as_str()])?;
            }
            csv_string(wtr)
        }
    }
}

//! Derived figures for a partition: currency totals, the per-category
//! breakdown and the budget summary.
//!
//! Every figure is recomputed from the partition's entries on each read,
//! nothing here is cached or stored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{category::CATEGORIES, entry::Entry};

/// The sum of each currency column over a partition's entries.
///
/// The three currencies are independent, unconverted inputs, so the totals
/// never mix columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrencyTotals {
    /// Total amount in Vietnamese dong.
    pub vnd: f64,
    /// Total amount in euros.
    pub eur: f64,
    /// Total amount in US dollars.
    pub usd: f64,
}

/// One category's summed euro amount and its share of a partition's euro
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStat {
    /// The summed euro amount of entries in the category.
    pub amount: f64,
    /// The category's share of the partition's euro total, as an integer
    /// percentage.
    pub percent: i64,
}

/// A partition's budget and how much of it remains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BudgetSummary {
    /// The budget for the month, in euros.
    pub amount: f64,
    /// The unspent share of the budget as an integer percentage. Negative
    /// once the month's euro total exceeds the budget.
    pub percent: i64,
}

/// A percentage figure as it may arrive from the backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PctValue<'a> {
    /// Already formatted text, e.g. `"45%"`.
    Text(&'a str),
    /// A plain number, either a fraction of one or a percentage count.
    Number(f64),
}

/// Normalize a percentage figure to an integer percentage on the 0-100 scale.
///
/// Text ending in a percent sign is stripped and parsed directly. A nonzero
/// number with absolute value under ten is taken as a fraction of one and
/// multiplied by 100; any other number is rounded as-is. The numeric rule is
/// a heuristic: a percentage under ten stored as a plain count, e.g. 5
/// meaning 5%, cannot be told apart from a fraction and reads as 500.
pub fn parse_pct(value: PctValue) -> i64 {
    match value {
        PctValue::Text(text) => match text.trim().strip_suffix('%') {
            Some(stripped) => stripped
                .trim()
                .parse::<f64>()
                .map(|number| number.round() as i64)
                .unwrap_or(0),
            None => text
                .trim()
                .parse::<f64>()
                .map(|number| parse_pct(PctValue::Number(number)))
                .unwrap_or(0),
        },
        PctValue::Number(number) => {
            if number != 0.0 && number.abs() < 10.0 {
                (number * 100.0).round() as i64
            } else {
                number.round() as i64
            }
        }
    }
}

/// Sum each currency column of `entries` independently.
pub fn currency_totals(entries: &[Entry]) -> CurrencyTotals {
    let mut totals = CurrencyTotals {
        vnd: 0.0,
        eur: 0.0,
        usd: 0.0,
    };

    for entry in entries {
        totals.vnd += entry.vnd;
        totals.eur += entry.eur;
        totals.usd += entry.usd;
    }

    totals
}

/// Compute the euro amount and share of each fixed category over `entries`.
///
/// An entry counts towards a category only when its category text matches
/// exactly; entries with text outside the fixed list contribute to the euro
/// total but to none of the nine buckets.
///
/// # Returns
/// A map with one [CategoryStat] per fixed category, zeroed where the
/// category has no entries.
pub fn category_breakdown(entries: &[Entry]) -> BTreeMap<String, CategoryStat> {
    let total_eur: f64 = entries.iter().map(|entry| entry.eur).sum();

    CATEGORIES
        .iter()
        .map(|&category| {
            let amount: f64 = entries
                .iter()
                .filter(|entry| entry.category == category)
                .map(|entry| entry.eur)
                .sum();
            let fraction = if total_eur == 0.0 {
                0.0
            } else {
                amount / total_eur
            };

            (
                category.to_owned(),
                CategoryStat {
                    amount,
                    percent: parse_pct(PctValue::Number(fraction)),
                },
            )
        })
        .collect()
}

/// Compute the budget summary for a partition from its euro total and budget
/// amount.
pub fn budget_summary(total_eur: f64, budget_amount: f64) -> BudgetSummary {
    let remaining_fraction = 1.0 - total_eur / budget_amount;

    BudgetSummary {
        amount: budget_amount,
        percent: parse_pct(PctValue::Number(remaining_fraction)),
    }
}

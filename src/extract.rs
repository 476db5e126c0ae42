//! Turns recognized card text into an initial card.

use crate::model::Card;

/// Every run of ASCII digits per line; lines without digits are dropped.
pub fn number_rows(text: &str) -> Vec<Vec<i64>> {
    text.trim()
        .lines()
        .map(|line| {
            line.split(|ch: char| !ch.is_ascii_digit())
                .filter(|run| !run.is_empty())
                .filter_map(|run| run.parse::<i64>().ok())
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

/// A card from recognized text, or `None` when no numbers were found.
pub fn card_from_text(text: &str) -> Option<Card> {
    let rows = number_rows(text);
    if rows.is_empty() {
        None
    } else {
        Some(Card::from_number_rows(rows))
    }
}

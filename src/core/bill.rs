//! Bill generation business logic.
//!
//! A [`Bill`] is the list of a member's transactions in the order they were
//! recorded, with helpers to total and render it for the console.

use crate::entities::transaction;

/// A member's transactions, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    /// Member the bill belongs to
    pub member_id: i64,
    /// Transactions in insertion order
    pub lines: Vec<transaction::Model>,
}

impl Bill {
    /// Wraps `lines`, which must already be in insertion order.
    #[must_use]
    pub const fn new(member_id: i64, lines: Vec<transaction::Model>) -> Self {
        Self { member_id, lines }
    }

    /// Sum of the recorded costs.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| line.item_cost).sum()
    }

    /// Whether the member has bought nothing yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One line per transaction followed by the total.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&format_line(line));
            out.push('\n');
        }
        out.push_str(&format!("TOTAL: ${:.2}", self.total()));
        out
    }
}

/// Formats a transaction as `<time> - <name> - $<cost>`.
#[must_use]
pub fn format_line(line: &transaction::Model) -> String {
    format!(
        "{} - {} - ${:.2}",
        line.created_at.format("%Y-%m-%d %H:%M:%S"),
        line.item_name,
        line.item_cost
    )
}

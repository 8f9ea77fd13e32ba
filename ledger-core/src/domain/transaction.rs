//! Transaction record domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a monetary movement relative to the owning account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Timestamp ordering for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    OldestFirst,
    #[default]
    NewestFirst,
}

/// An immutable ledger entry.
///
/// Created exactly once per completed monetary movement, appended and never
/// mutated or deleted. A transfer produces two of these, one per side,
/// sharing amount and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub account_number: String,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub narrative: String,
    /// Always positive; the sign of the movement lives in `direction`
    pub amount: Decimal,
}

impl TransactionRecord {
    pub fn new(
        account_number: impl Into<String>,
        direction: Direction,
        narrative: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number: account_number.into(),
            timestamp: Utc::now(),
            direction,
            narrative: narrative.into(),
            amount,
        }
    }
}

/// Narrative attached to plain deposits
pub const DEPOSIT_NARRATIVE: &str = "Deposit via ATM";

/// Narrative attached to plain withdrawals
pub const WITHDRAW_NARRATIVE: &str = "Withdraw via ATM";

/// Narrative for the sender's side of a transfer
pub fn outbound_transfer_narrative(
    recipient_name: &str,
    destination_number: &str,
    note: &str,
) -> String {
    format!("Transfer to {recipient_name} {destination_number}: {note}")
}

/// Narrative for the recipient's side of a transfer
pub fn inbound_transfer_narrative(sender_name: &str, source_number: &str, note: &str) -> String {
    format!("Transfer from {sender_name} {source_number}: {note}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Inbound).unwrap(), "\"inbound\"");
        assert_eq!(serde_json::to_string(&Direction::Outbound).unwrap(), "\"outbound\"");
    }

    #[test]
    fn test_transfer_narratives_reference_counterpart() {
        let outbound = outbound_transfer_narrative("Bob Example", "9876543210", "rent");
        assert_eq!(outbound, "Transfer to Bob Example 9876543210: rent");

        let inbound = inbound_transfer_narrative("Alice Example", "1234567890", "rent");
        assert_eq!(inbound, "Transfer from Alice Example 1234567890: rent");
    }

    #[test]
    fn test_record_keeps_positive_amount() {
        let record = TransactionRecord::new(
            "1234567890",
            Direction::Outbound,
            WITHDRAW_NARRATIVE,
            Decimal::from(300),
        );
        assert_eq!(record.amount, Decimal::from(300));
        assert_eq!(record.direction, Direction::Outbound);
    }
}

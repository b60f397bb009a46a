use serde::{Deserialize, Serialize};

/// Structured summary extracted from the labeled transcript.
///
/// Every field is required; a completion missing any of them is rejected at
/// the extraction boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Short title describing the whole conversation
    pub title: String,
    /// Key discussion points as bullet text
    pub discussion_points: String,
    /// Queries raised by the customer
    pub customer_queries: String,
    /// Next action items for the salesperson
    pub next_action_items: String,
    /// Whether and how a meeting or site visit was requested
    pub meeting_request_attempt: String,
}

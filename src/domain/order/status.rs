//! Fulfillment states of order lines and the statuses derived from them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of a single order line.
///
/// ```text
/// Pending ──markFulfilled──▶ Fulfilled (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    Fulfilled,
}

impl FulfillmentStatus {
    pub fn is_fulfilled(&self) -> bool {
        *self == FulfillmentStatus::Fulfilled
    }
}

impl StateMachine for FulfillmentStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            FulfillmentStatus::Pending => vec![FulfillmentStatus::Fulfilled],
            FulfillmentStatus::Fulfilled => vec![],
        }
    }
}

/// Order-level status derived from every line. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    InProgress,
    Complete,
}

impl AggregateStatus {
    /// `Complete` iff every line is fulfilled.
    ///
    /// An empty iterator yields `InProgress`; orders always have lines, so
    /// this only matters when reading raw line data.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = FulfillmentStatus>,
    {
        let mut seen_any = false;
        for status in lines {
            seen_any = true;
            if !status.is_fulfilled() {
                return AggregateStatus::InProgress;
            }
        }
        if seen_any {
            AggregateStatus::Complete
        } else {
            AggregateStatus::InProgress
        }
    }
}

/// What screens show for an order: cancellation overrides the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    InProgress,
    Complete,
    Cancelled,
}

impl From<AggregateStatus> for OrderStatus {
    fn from(status: AggregateStatus) -> Self {
        match status {
            AggregateStatus::InProgress => OrderStatus::InProgress,
            AggregateStatus::Complete => OrderStatus::Complete,
        }
    }
}

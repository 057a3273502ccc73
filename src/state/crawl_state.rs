//! Crawl state definitions for tracking a crawl session
//!
//! A session moves `Idle → Running` once and then into exactly one terminal
//! state. None of the terminal states is an error.

use std::fmt;

/// Represents the current state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Session created, output not yet initialized
    Idle,

    /// Pages are being fetched and recorded
    Running,

    // ===== Terminal States =====
    /// The frontier ran dry before the page budget was reached
    Completed,

    /// The page budget was reached
    BudgetExhausted,

    /// An external stop signal was observed between iterations
    Cancelled,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::BudgetExhausted | Self::Cancelled
        )
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        match self {
            Self::Idle => next == Self::Running,
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }

    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

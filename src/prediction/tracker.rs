//! Submission sequencing
//!
//! Every submission takes a ticket; only the newest ticket may update the
//! display, so a response that arrives after a newer submission is dropped.

use std::fmt;

/// Generation number of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic generation counter for submissions
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    issued: u64,
    applied: Option<Ticket>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Whether no newer submission has started since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Claim the display for a completed submission
    ///
    /// Returns false for a stale ticket, whose outcome must be dropped.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = %ticket,
                latest = self.issued,
                "Discarding stale prediction response"
            );
            return false;
        }
        self.applied = Some(ticket);
        true
    }

    /// Last ticket whose outcome reached the display
    pub fn applied(&self) -> Option<Ticket> {
        self.applied
    }
}

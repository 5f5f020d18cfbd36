//! Last-request-wins fencing for in-flight generation calls.

/// Ticket identifying one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestTicket {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Issues request tickets and accepts only the result of the newest one.
///
/// A result arriving for a superseded request is stale and must be dropped
/// by the caller.
#[derive(Debug, Clone, Default)]
pub struct RequestFence {
    latest: u64,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Whether a result for `ticket` should be committed.
    pub fn accept(&self, ticket: RequestTicket) -> bool {
        let current = ticket.0 == self.latest && self.latest != 0;
        if !current {
            log::debug!(
                "Discarding stale generation result (ticket {}, latest {})",
                ticket.0,
                self.latest
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_request_wins() {
        let mut fence = RequestFence::new();
        let first = fence.begin();
        let second = fence.begin();

        assert!(!fence.accept(first));
        assert!(fence.accept(second));
    }

    #[test]
    fn test_single_request_is_accepted() {
        let mut fence = RequestFence::new();
        let ticket = fence.begin();
        assert!(fence.accept(ticket));
        assert!(fence.accept(ticket));
    }

    #[test]
    fn test_unissued_ticket_is_rejected() {
        let fence = RequestFence::new();
        assert!(!fence.accept(RequestTicket::from(0)));
    }
}

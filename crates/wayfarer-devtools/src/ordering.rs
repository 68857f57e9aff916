//! Call-order release of asynchronous script results

use std::collections::{HashMap, VecDeque};

use wayfarer_tabs::ScriptTicket;

/// Releases completed results in the order their tickets were issued.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    /// Outstanding tickets, oldest first
    pending: VecDeque<ScriptTicket>,
    completed: HashMap<ScriptTicket, T>,
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            completed: HashMap::new(),
        }
    }

    pub fn expect(&mut self, ticket: ScriptTicket) {
        self.pending.push_back(ticket);
    }

    pub fn is_pending(&self, ticket: ScriptTicket) -> bool {
        self.pending.contains(&ticket) && !self.completed.contains_key(&ticket)
    }

    /// Record a result. Returns every result that is now in order, or `None`
    /// if `ticket` was never issued here (or already resolved).
    pub fn complete(&mut self, ticket: ScriptTicket, value: T) -> Option<Vec<T>> {
        if !self.is_pending(ticket) {
            return None;
        }

        self.completed.insert(ticket, value);

        let mut released = Vec::new();
        while let Some(front) = self.pending.front().copied() {
            match self.completed.remove(&front) {
                Some(value) => {
                    self.pending.pop_front();
                    released.push(value);
                }
                None => break,
            }
        }

        Some(released)
    }

    /// Number of requests without a released result
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

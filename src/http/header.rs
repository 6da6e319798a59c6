/// A single response header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Ordered collection of response headers.
///
/// Headers are emitted in the order they were pushed. Sending a response
/// drains the queue, so a queue is only ever written once.
#[derive(Debug, Default, Clone)]
pub struct HeaderQueue {
    entries: Vec<Header>,
}

impl HeaderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header. Empty names are refused; empty values are kept.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }

        self.entries.push(Header {
            name,
            value: value.into(),
        });
        true
    }

    /// Returns the first value stored under `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes every queued header out in insertion order, leaving the queue empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Header> {
        self.entries.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut queue = HeaderQueue::new();
        queue.push("Content-Type", "text/plain");
        queue.push("Content-Length", "5");
        queue.push("Connection", "close");

        let names: Vec<_> = queue.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Content-Type", "Content-Length", "Connection"]);
    }

    #[test]
    fn drain_empties_queue() {
        let mut queue = HeaderQueue::new();
        queue.push("X-One", "1");

        assert_eq!(queue.drain().count(), 1);
        assert!(queue.is_empty());
        assert_eq!(queue.drain().count(), 0);
    }
}

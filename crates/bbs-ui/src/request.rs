//! Request identifiers and in-flight bookkeeping.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Default, Clone)]
pub struct RequestSeq {
    next: u64,
}

impl RequestSeq {
    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Login,
    Register,
    CreateThread,
    Search,
    Reply,
    EditPost,
    DeletePost,
}

/// Requests the reducer is still waiting on.
///
/// Completions whose id is not here are stale and get dropped.
#[derive(Debug, Default, Clone)]
pub struct Pending {
    requests: BTreeMap<RequestId, RequestKind>,
}

impl Pending {
    pub fn start(&mut self, id: RequestId, kind: RequestKind) {
        self.requests.insert(id, kind);
    }

    /// Removes the request if it is still pending with the given kind.
    pub fn finish(&mut self, id: RequestId, kind: RequestKind) -> bool {
        if self.requests.get(&id) == Some(&kind) {
            self.requests.remove(&id);
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.requests.contains_key(&id)
    }

    /// In-flight requests of one kind, oldest first.
    pub fn of_kind(&self, kind: RequestKind) -> Vec<RequestId> {
        self.requests
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let mut seq = RequestSeq::default();
        assert_eq!(seq.next_id(), RequestId(0));
        assert_eq!(seq.next_id(), RequestId(1));
    }

    #[test]
    fn test_finish_requires_matching_kind() {
        let mut pending = Pending::default();
        pending.start(RequestId(3), RequestKind::Search);

        assert!(!pending.finish(RequestId(3), RequestKind::Login));
        assert!(pending.finish(RequestId(3), RequestKind::Search));
        assert!(!pending.finish(RequestId(3), RequestKind::Search));
        assert!(pending.is_empty());
    }
}

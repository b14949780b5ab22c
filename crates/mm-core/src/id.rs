use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide id table. Ids live for the whole process.
static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identity of a node. Copying and comparing is a 4-byte key operation; the
/// text is looked up only for display and serialization.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// The id spelled `text`; equal texts give equal ids.
    pub fn intern(text: &str) -> Self {
        Self(IDS.get_or_intern(text))
    }

    pub fn as_str(&self) -> &str {
        IDS.resolve(&self.0)
    }

    /// A fresh id `{prefix}_{n}`, unique within the process.
    pub fn with_prefix(prefix: &str) -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        let serial = NEXT.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{serial}"))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|text| Self::intern(&text))
    }
}

// ─── Id sources ──────────────────────────────────────────────────────────

/// Where new node identities come from.
///
/// Tree operations never accept a caller-chosen id for a new node; they ask
/// an `IdSource`. Any `FnMut() -> NodeId` closure is an id source.
pub trait IdSource {
    fn next_id(&mut self) -> NodeId;
}

impl<F: FnMut() -> NodeId> IdSource for F {
    fn next_id(&mut self) -> NodeId {
        self()
    }
}

/// Process-wide unique ids (`node_0`, `node_1`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIds;

impl IdSource for AnonymousIds {
    fn next_id(&mut self) -> NodeId {
        NodeId::with_prefix("node")
    }
}

/// Deterministic per-instance counter. Two instances with the same prefix
/// hand out the same sequence, which is what tests want.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::intern(&format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_id() {
        let a = NodeId::intern("central");
        let b = NodeId::intern("central");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "central");
    }

    #[test]
    fn anonymous_ids_never_repeat() {
        let mut ids = AnonymousIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn sequential_ids_are_deterministic() {
        let mut a = SequentialIds::new("n");
        let mut b = SequentialIds::new("n");
        assert_eq!(a.next_id(), b.next_id());
        assert_eq!(a.next_id().as_str(), "n1");
    }

    #[test]
    fn closures_are_id_sources() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            NodeId::intern("fixed")
        };
        assert_eq!(source.next_id().as_str(), "fixed");
        drop(source);
        assert_eq!(calls, 1);
    }
}

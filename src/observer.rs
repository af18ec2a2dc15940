//! Which plots are watching which `(target, capability)` pair.

use indexmap::IndexMap;

use crate::plots::PlotId;

/// Key of one probed stream: target label and capability name.
pub type StreamKey = (String, String);

#[derive(Debug, Default)]
pub struct ObserverHub {
    streams: IndexMap<StreamKey, Vec<PlotId>>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `plot` to `(target, capability)`. Subscribing twice is a no-op.
    pub fn subscribe(&mut self, target: &str, capability: &str, plot: PlotId) {
        let ids = self
            .streams
            .entry((target.to_string(), capability.to_string()))
            .or_default();
        if !ids.contains(&plot) {
            ids.push(plot);
        }
    }

    /// Detach `plot`. Returns whether it was subscribed. A stream with no
    /// subscribers left is forgotten.
    pub fn unsubscribe(&mut self, target: &str, capability: &str, plot: PlotId) -> bool {
        let key = (target.to_string(), capability.to_string());
        let Some(ids) = self.streams.get_mut(&key) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|id| *id != plot);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.streams.shift_remove(&key);
        }
        removed
    }

    /// Detach `plot` from every stream.
    pub fn unsubscribe_all(&mut self, plot: PlotId) {
        self.streams.retain(|_, ids| {
            ids.retain(|id| *id != plot);
            !ids.is_empty()
        });
    }

    pub fn subscribers(&self, target: &str, capability: &str) -> &[PlotId] {
        self.streams
            .get(&(target.to_string(), capability.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn streams(&self) -> impl Iterator<Item = &StreamKey> {
        self.streams.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

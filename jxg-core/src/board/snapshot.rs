//! Snapshots of the free state of a board.
//!
//! Derived values are a function of the free ones, so restoring the free
//! elements and running one pass brings back the whole construction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Board;
use crate::element::Value;
use crate::error::{Error, Result};
use crate::graph::{NodeId, NodeKind};

/// Values of all free elements of a board, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entries: Vec<(NodeId, Value)>,
}

impl Snapshot {
    /// MessagePack with field names, so fields can be added later.
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Snapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Snapshot(e.to_string()))
    }
}

impl Board {
    pub fn snapshot(&self) -> Snapshot {
        let entries = self
            .scheduler
            .registration_order()
            .filter_map(|id| {
                let el = self.elements.get(&id)?;
                (el.kind == NodeKind::Free).then(|| (id, el.base.clone()))
            })
            .collect();
        Snapshot { entries }
    }

    /// Puts the free values of `snapshot` back and recomputes their
    /// dependents. Nothing changes if an entry names an element that is
    /// missing or not free, or holds a value of another type.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<usize> {
        for (id, value) in &snapshot.entries {
            let el = self.element_or_err(*id)?;
            if el.kind != NodeKind::Free {
                return Err(Error::NotFree(*id));
            }
            if !el.base.same_shape(value) {
                return Err(Error::Snapshot(format!(
                    "element {id:?} holds a {} of length {}, snapshot has a {} of length {}",
                    el.base.type_name(),
                    el.base.numeric().len(),
                    value.type_name(),
                    value.numeric().len()
                )));
            }
        }

        for (id, value) in &snapshot.entries {
            if let Some(el) = self.elements.get_mut(id) {
                el.base = value.clone();
            }
            self.scheduler.mark_changed(*id)?;
        }
        debug!(entries = snapshot.entries.len(), "snapshot restored");
        self.update()
    }
}

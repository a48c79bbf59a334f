//! Board Configuration
//!
//! Settings that change how a [`Board`](crate::board::Board) propagates
//! updates. Every field has a default, so an empty JSON object is a valid
//! configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::Rounding;

/// The order in which a propagation pass visits elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrder {
    /// Parents before children, ties broken by registration order.
    #[default]
    Topological,
    /// Plain registration order. Elements registered before one of their
    /// parents see that parent's old value for one pass.
    Registration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub update_order: UpdateOrder,

    /// Rounding mode for interval evaluation on this board.
    pub rounding: Rounding,

    /// Below this, lengths and determinants count as zero.
    pub eps: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            update_order: UpdateOrder::Topological,
            rounding: Rounding::Outward,
            eps: 1e-10,
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_update_order(mut self, order: UpdateOrder) -> Self {
        self.update_order = order;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

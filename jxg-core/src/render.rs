//! Renderer Sink
//!
//! Propagation has two phases per element: recomputing its value and pushing
//! that value to a visual backend. The second phase goes through
//! [`Renderer`], which is what suspending updates skips.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::element::Value;
use crate::graph::NodeId;

/// Receives the current state of an element after it was recomputed.
pub trait Renderer {
    fn draw(&mut self, id: NodeId, value: &Value, visible: bool);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _id: NodeId, _value: &Value, _visible: bool) {}
}

/// Records which elements were drawn, in order.
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to a board.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    log: Arc<Mutex<Vec<NodeId>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids drawn so far.
    pub fn drawn(&self) -> Vec<NodeId> {
        self.log.lock().clone()
    }

    /// How many times `id` was drawn.
    pub fn count(&self, id: NodeId) -> usize {
        self.log.lock().iter().filter(|&&d| d == id).count()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, id: NodeId, _value: &Value, _visible: bool) {
        self.log.lock().push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let recorder = RecordingRenderer::new();
        let mut sink = recorder.clone();
        let a = NodeId::new();
        let b = NodeId::new();

        sink.draw(a, &Value::Scalar(1.0), true);
        sink.draw(b, &Value::Scalar(2.0), true);
        sink.draw(a, &Value::Scalar(3.0), false);

        assert_eq!(recorder.drawn(), vec![a, b, a]);
        assert_eq!(recorder.count(a), 2);
        recorder.clear();
        assert!(recorder.drawn().is_empty());
    }
}

//! Board
//!
//! The board owns the elements of one construction and drives their
//! updates.
//!
//! # Propagation
//!
//! [`Board::notify`] marks an element and runs one pass. A pass visits every
//! node in the configured order (topological by default, see
//! [`UpdateOrder`]). A node that is marked is recomputed, its bound
//! transformations are applied, its children are marked, and unless updates
//! are suspended it is drawn. Then its mark is cleared.
//!
//! An error from one element stops the pass. Elements updated before it keep
//! their new values, and the remaining marks stay set for the next pass.
//!
//! # Suspension
//!
//! Between [`Board::suspend_update`] and the matching
//! [`Board::unsuspend_update`] values keep being recomputed but nothing is
//! drawn. Leaving the outermost suspension draws every element once.

mod create;
mod snapshot;

pub use snapshot::Snapshot;

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::DVector;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::{BoardConfig, UpdateOrder};
use crate::element::{Behavior, UpdateContext, Value, ValueLookup};
use crate::error::{Error, Result};
use crate::graph::{Node, NodeId, NodeKind, UpdateScheduler};
use crate::interval::IntervalContext;
use crate::render::{NullRenderer, Renderer};
use crate::transform::{Dim, NodeValues, TransformHandle, Transformation, TransformType};

/// An element registered on a board.
pub struct Element {
    name: Option<String>,
    kind: NodeKind,
    behavior: Box<dyn Behavior>,
    /// Inputs of `behavior`, in the order it reads them.
    parents: SmallVec<[NodeId; 4]>,
    /// Value before bound transformations. For free elements this is the
    /// position set from outside.
    base: Value,
    /// Value right after creation.
    initial: Value,
    value: Value,
    transforms: Vec<TransformHandle>,
    visible: bool,
}

impl Element {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.behavior.type_name()
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn base(&self) -> &Value {
        &self.base
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn transforms(&self) -> &[TransformHandle] {
        &self.transforms
    }

    /// False while the value contains NaN.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The update engine of one construction.
pub struct Board {
    config: BoardConfig,
    scheduler: UpdateScheduler,
    elements: HashMap<NodeId, Element>,
    names: HashMap<String, NodeId>,
    suspend_depth: usize,
    renderer: Box<dyn Renderer>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl ValueLookup for Board {
    fn value(&self, id: NodeId) -> Option<&Value> {
        self.elements.get(&id).map(|e| &e.value)
    }
}

impl NodeValues for Board {
    fn coords(&self, id: NodeId) -> Option<&[f64]> {
        self.elements.get(&id).map(|e| e.value.numeric())
    }
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self::with_renderer(config, NullRenderer)
    }

    pub fn with_renderer(config: BoardConfig, renderer: impl Renderer + 'static) -> Self {
        Self {
            config,
            scheduler: UpdateScheduler::new(),
            elements: HashMap::new(),
            names: HashMap::new(),
            suspend_depth: 0,
            renderer: Box::new(renderer),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Interval context using the board's rounding mode.
    pub fn interval_context(&self) -> IntervalContext {
        IntervalContext::new(self.config.rounding)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn element_or_err(&self, id: NodeId) -> Result<&Element> {
        self.elements.get(&id).ok_or(Error::UnknownNode(id))
    }

    pub fn value(&self, id: NodeId) -> Option<&Value> {
        self.elements.get(&id).map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The dependency graph.
    pub fn graph(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Element ids in registration order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.scheduler.registration_order().collect()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend_depth > 0
    }

    // ---- registration ------------------------------------------------

    /// Registers a free element with the given starting value.
    pub fn add_free(&mut self, behavior: impl Behavior + 'static, value: Value) -> Result<NodeId> {
        self.insert(NodeKind::Free, Vec::new(), Box::new(behavior), value)
    }

    /// Registers an element computed from `parents`.
    ///
    /// The value is computed once before anything is registered, so a
    /// mistyped or unknown parent leaves the board unchanged.
    pub fn add_derived(
        &mut self,
        parents: Vec<NodeId>,
        behavior: impl Behavior + 'static,
    ) -> Result<NodeId> {
        self.insert(NodeKind::Derived, parents, Box::new(behavior), Value::Scalar(f64::NAN))
    }

    fn insert(
        &mut self,
        kind: NodeKind,
        parents: Vec<NodeId>,
        behavior: Box<dyn Behavior>,
        base: Value,
    ) -> Result<NodeId> {
        for &p in &parents {
            self.element_or_err(p)?;
        }

        let id = NodeId::new();
        let value = {
            let ctx = UpdateContext::new(behavior.type_name(), id, &parents, &base, self);
            behavior.compute(&ctx)?
        };

        self.scheduler.add_node(Node::with_id(id, kind));
        for &p in &parents {
            self.scheduler.add_edge(p, id)?;
        }

        let visible = !value.has_nan();
        trace!(?id, kind = behavior.type_name(), "element added");
        self.elements.insert(
            id,
            Element {
                name: None,
                kind,
                behavior,
                parents: SmallVec::from_vec(parents),
                base,
                initial: value.clone(),
                value,
                transforms: Vec::new(),
                visible,
            },
        );

        if !self.is_suspended() {
            self.draw(id);
        }
        Ok(id)
    }

    /// Gives an element a name for [`Board::select`]. A name used before
    /// now refers to `id`.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let el = self.elements.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        if let Some(old) = el.name.replace(name.clone()) {
            if self.names.get(&old) == Some(&id) {
                self.names.remove(&old);
            }
        }
        self.names.insert(name, id);
        Ok(())
    }

    pub fn select(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Adds the edge `parent -> child`: `child` is recomputed whenever
    /// `parent` changes.
    pub fn register_edge(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.scheduler.add_edge(parent, child)
    }

    /// Detaches `child` from `parent`. Returns whether the edge existed.
    pub fn remove_edge(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.scheduler.remove_edge(parent, child)
    }

    /// Removes an element and everything that depends on it. Returns the
    /// removed ids, dependents first.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.element_or_err(id)?;
        let mut doomed = self.scheduler.descendants(id);
        doomed.reverse();
        doomed.push(id);

        for &d in &doomed {
            self.scheduler.remove_node(d);
            if let Some(el) = self.elements.remove(&d) {
                if let Some(name) = el.name {
                    if self.names.get(&name) == Some(&d) {
                        self.names.remove(&name);
                    }
                }
            }
        }
        debug!(?id, removed = doomed.len(), "elements removed");
        Ok(doomed)
    }

    // ---- propagation -------------------------------------------------

    /// Marks `id` as changed and runs one propagation pass.
    pub fn notify(&mut self, id: NodeId) -> Result<usize> {
        self.scheduler.mark_changed(id)?;
        self.update()
    }

    /// Recomputes every element.
    pub fn full_update(&mut self) -> Result<usize> {
        self.scheduler.mark_all();
        self.update()
    }

    /// Runs one propagation pass over the marked elements. Returns how many
    /// elements were recomputed.
    pub fn update(&mut self) -> Result<usize> {
        let order: Vec<NodeId> = match self.config.update_order {
            UpdateOrder::Topological => self.scheduler.topological_order().to_vec(),
            UpdateOrder::Registration => self.scheduler.registration_order().collect(),
        };
        debug!(nodes = order.len(), order = ?self.config.update_order, "update pass");

        let mut updated = 0;
        for id in order {
            if !self.scheduler.get_node(id).is_some_and(Node::needs_update) {
                continue;
            }
            let value = self.recompute(id)?;
            trace!(?id, "recomputed");

            if let Some(el) = self.elements.get_mut(&id) {
                el.visible = !value.has_nan();
                el.value = value;
            }
            self.scheduler.mark_children(id);
            if !self.is_suspended() {
                self.draw(id);
            }
            if let Some(node) = self.scheduler.get_node_mut(id) {
                node.clear();
            }
            updated += 1;
        }

        debug!(updated, "update pass done");
        Ok(updated)
    }

    fn recompute(&self, id: NodeId) -> Result<Value> {
        let el = self.element_or_err(id)?;
        let ctx = UpdateContext::new(el.behavior.type_name(), id, &el.parents, &el.base, self);
        let mut value = el.behavior.compute(&ctx)?;
        for t in &el.transforms {
            value = self.transform_value(t, &value)?;
        }
        Ok(value)
    }

    fn transform_value(&self, t: &TransformHandle, value: &Value) -> Result<Value> {
        match value {
            Value::Point(c) => {
                let image = t.write().apply_to(c.as_slice(), self)?;
                Ok(Value::Point(DVector::from_vec(image)))
            }
            other => Err(Error::ParentType {
                element: "transform",
                index: 0,
                expected: "point",
                found: other.type_name(),
            }),
        }
    }

    fn draw(&mut self, id: NodeId) {
        if let Some(el) = self.elements.get(&id) {
            self.renderer.draw(id, &el.value, el.visible);
        }
    }

    /// Draws every element once, in registration order.
    pub fn update_renderer(&mut self) {
        let ids: Vec<NodeId> = self.scheduler.registration_order().collect();
        for id in ids {
            self.draw(id);
        }
    }

    pub fn suspend_update(&mut self) {
        self.suspend_depth += 1;
    }

    /// Ends one suspension. Leaving the outermost one draws every element.
    pub fn unsuspend_update(&mut self) {
        match self.suspend_depth {
            0 => warn!("unsuspend_update without matching suspend_update"),
            1 => {
                self.suspend_depth = 0;
                self.update_renderer();
            }
            _ => self.suspend_depth -= 1,
        }
    }

    /// Runs `f` with updates suspended. The suspension ends even if `f`
    /// fails.
    pub fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.suspend_update();
        let result = f(self);
        self.unsuspend_update();
        result
    }

    // ---- positions ---------------------------------------------------

    fn free_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        let el = self.elements.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        if el.kind != NodeKind::Free {
            return Err(Error::NotFree(id));
        }
        Ok(el)
    }

    /// Moves a free point and propagates. `coords` are either Euclidean
    /// (`[x, y]`) or homogeneous (`[w, x, y]`).
    pub fn set_position(&mut self, id: NodeId, coords: &[f64]) -> Result<usize> {
        let el = self.free_mut(id)?;
        let Value::Point(current) = &el.base else {
            return Err(Error::ParentType {
                element: "set_position",
                index: 0,
                expected: "point",
                found: el.base.type_name(),
            });
        };
        let n = current.len();
        let homogeneous: Vec<f64> = if coords.len() == n {
            coords.to_vec()
        } else if coords.len() + 1 == n {
            std::iter::once(1.0).chain(coords.iter().copied()).collect()
        } else {
            return Err(Error::DimensionMismatch {
                matrix: n,
                coords: coords.len(),
            });
        };
        el.base = Value::Point(DVector::from_vec(homogeneous));
        self.notify(id)
    }

    /// Replaces the value of a free element (e.g. a slider) and propagates.
    /// The new value must have the type and coordinate count of the old one.
    pub fn set_value(&mut self, id: NodeId, value: Value) -> Result<usize> {
        let el = self.free_mut(id)?;
        if el.base.type_name() != value.type_name() {
            return Err(Error::ParentType {
                element: "set_value",
                index: 0,
                expected: el.base.type_name(),
                found: value.type_name(),
            });
        }
        if !el.base.same_shape(&value) {
            return Err(Error::DimensionMismatch {
                matrix: el.base.numeric().len(),
                coords: value.numeric().len(),
            });
        }
        el.base = value;
        self.notify(id)
    }

    /// Moves a point by `delta` through its transformations: the translation
    /// is melted into the last bound transformation when that one is
    /// numeric, otherwise it is bound as a new one.
    pub fn set_position_by_transform(&mut self, id: NodeId, delta: &[f64]) -> Result<usize> {
        let dim = self.point_dim(id)?;
        let params = delta.iter().map(|&d| d.into()).collect();
        let translation = Transformation::new(TransformType::Translate, params, dim)?;

        let last = self
            .element_or_err(id)?
            .transforms
            .last()
            .filter(|t| t.read().is_numeric_matrix())
            .cloned();
        match last {
            Some(last) => self.melt_into(id, &last, translation)?,
            None => self.attach(id, translation.into_handle())?,
        }
        self.notify(id)
    }

    fn point_dim(&self, id: NodeId) -> Result<Dim> {
        match &self.element_or_err(id)?.value {
            Value::Point(c) => Dim::from_coords_len(c.len()).ok_or(Error::DimensionMismatch {
                matrix: 3,
                coords: c.len(),
            }),
            other => Err(Error::ParentType {
                element: "transform",
                index: 0,
                expected: "point",
                found: other.type_name(),
            }),
        }
    }

    // ---- transformations ---------------------------------------------

    /// `t` applied to the current (or initial) coordinates of point `id`.
    /// The point itself is not changed.
    pub fn apply_transform(&self, t: &TransformHandle, id: NodeId, use_initial: bool) -> Result<Vec<f64>> {
        let el = self.element_or_err(id)?;
        let source = if use_initial { &el.initial } else { &el.value };
        match self.transform_value(t, source)? {
            Value::Point(c) => Ok(c.as_slice().to_vec()),
            _ => Ok(Vec::new()),
        }
    }

    /// Transforms the points once and writes the result back. For free
    /// points `t` acts on the coordinates below their bound transformations
    /// and the result stays until they are moved again; derived points keep
    /// it until their parents change.
    pub fn apply_once(&mut self, t: &TransformHandle, ids: &[NodeId]) -> Result<usize> {
        for &id in ids {
            let el = self.element_or_err(id)?;
            if el.kind == NodeKind::Free {
                // bound transformations are applied on top of the new base
                // in the following pass
                let image = self.transform_value(t, &el.base)?;
                if let Some(el) = self.elements.get_mut(&id) {
                    el.base = image;
                }
                self.scheduler.mark_changed(id)?;
                continue;
            }
            let image = self.transform_value(t, &el.value)?;
            if let Some(el) = self.elements.get_mut(&id) {
                el.visible = !image.has_nan();
                el.value = image;
            }
            self.scheduler.mark_children(id);
            if !self.is_suspended() {
                self.draw(id);
            }
        }
        self.update()
    }

    /// Binds `t` to every point in `ids`; each later update applies it after
    /// the transformations bound before. Binding the same transformation
    /// twice applies it twice.
    pub fn bind_transform(&mut self, t: &TransformHandle, ids: &[NodeId]) -> Result<usize> {
        for &id in ids {
            self.attach(id, Arc::clone(t))?;
            self.scheduler.mark_changed(id)?;
        }
        self.update()
    }

    fn attach(&mut self, id: NodeId, t: TransformHandle) -> Result<()> {
        let dim = self.point_dim(id)?;
        let (t_dim, deps) = {
            let guard = t.read();
            (guard.dim(), guard.dependencies())
        };
        if t_dim != dim {
            return Err(Error::DimensionMismatch {
                matrix: t_dim.size(),
                coords: dim.size(),
            });
        }
        if let Some(&dep) = deps
            .iter()
            .find(|&&dep| dep == id || self.scheduler.reaches(id, dep))
        {
            warn!(?dep, ?id, "transformation reads an element that depends on the point");
            return Err(Error::Cycle(id));
        }
        for dep in deps {
            self.scheduler.add_edge(dep, id)?;
        }
        if let Some(el) = self.elements.get_mut(&id) {
            el.transforms.push(t);
        }
        Ok(())
    }

    /// Like [`Board::bind_transform`], but keeps transformation lists short:
    /// when both `t` and a point's last bound transformation are numeric,
    /// `t` is melted into that one. Otherwise a copy of `t` is bound, so
    /// later melts into it do not leak to other points.
    pub fn melt_to(&mut self, t: &TransformHandle, ids: &[NodeId]) -> Result<usize> {
        let numeric = t.read().is_numeric_matrix();
        for &id in ids {
            let last = self
                .element_or_err(id)?
                .transforms
                .last()
                .filter(|last| numeric && last.read().is_numeric_matrix())
                .cloned();
            let incoming = t.read().clone();
            match last {
                Some(last) => self.melt_into(id, &last, incoming)?,
                None => self.attach(id, incoming.into_handle())?,
            }
            self.scheduler.mark_changed(id)?;
        }
        self.update()
    }

    // Melts `incoming` into the last transformation of `id`. A handle that
    // is shared with other elements is copied first.
    fn melt_into(&mut self, id: NodeId, last: &TransformHandle, mut incoming: Transformation) -> Result<()> {
        let mut fused = last.read().clone();
        fused.melt(&mut incoming, self)?;

        // one reference is held by `id`, one by the caller
        if Arc::strong_count(last) > 2 {
            if let Some(slot) = self.elements.get_mut(&id).and_then(|el| el.transforms.last_mut()) {
                *slot = Arc::new(RwLock::new(fused));
            }
        } else {
            *last.write() = fused;
        }
        Ok(())
    }
}

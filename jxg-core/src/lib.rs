//! JXG Core
//!
//! The numeric core of an interactive geometry board:
//!
//! - an update engine that propagates changes through the dependency graph
//!   of geometric elements,
//! - interval arithmetic with outward rounding for verified evaluation,
//! - homogeneous transformations that can be applied to, bound to and
//!   melted into points.
//!
//! The crate is usable as a native Rust library and, with the `python`
//! feature, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! - `graph`: nodes, parent/child edges, cached topological order
//! - `board`: the element registry and update engine
//! - `element`: element values and the behaviors that compute them
//! - `transform`: transformation kinds, parameters and matrices
//! - `interval`: interval arithmetic
//! - `expr`: expression IR, float/interval evaluation and a Cranelift JIT
//! - `render`: the sink elements are drawn to
//!
//! # Example
//!
//! ```rust
//! use jxg_core::board::Board;
//! use jxg_core::element::Value;
//!
//! let mut board = Board::default();
//! let a = board.point(0.0, 0.0)?;
//! let c = board.point(4.0, 2.0)?;
//! let m = board.midpoint(a, c)?;
//!
//! // drag A; M follows in the same pass
//! board.set_position(a, &[2.0, 2.0])?;
//! assert_eq!(board.value(m), Some(&Value::point2(3.0, 2.0)));
//! # Ok::<(), jxg_core::error::Error>(())
//! ```

pub mod board;
pub mod config;
pub mod element;
pub mod error;
pub mod expr;
pub mod graph;
pub mod interval;
pub mod render;
pub mod transform;

#[cfg(feature = "python")]
mod python;

pub use board::{Board, Snapshot};
pub use config::BoardConfig;
pub use error::{Error, Result};
pub use graph::NodeId;
pub use interval::{Interval, IntervalContext};
pub use transform::{TransformType, Transformation};

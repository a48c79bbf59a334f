//! Expressions
//!
//! User-authored functions (coordinates of a point, a curve term, an
//! existence predicate) arrive as [`TraceIR`] and can be run three ways:
//!
//! 1. [`eval`] over doubles,
//! 2. [`eval_interval`] over intervals, for verified answers such as
//!    [`may_vanish`],
//! 3. compiled to native code with [`JitCompiler`], for the float subset.

mod codegen;
mod eval;
mod ir;

pub use codegen::{CompiledFunction, JitCompiler};
pub use eval::{eval, eval_interval, may_vanish};
pub use ir::{Op, OpCode, Operand, TraceIR};

//! Interpreters for [`TraceIR`].
//!
//! The same program runs over plain doubles or over intervals. In interval
//! mode the result encloses every value the expression takes on the input
//! box, which is what [`may_vanish`] relies on.

use std::collections::HashMap;

use super::ir::{OpCode, Operand, TraceIR};
use crate::error::{Error, Result};
use crate::interval::{Interval, IntervalContext};

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

// Walks the ops once, in order. `apply` gets the already resolved operands.
fn run<T: Copy>(
    ir: &TraceIR,
    inputs: &[T],
    literal: impl Fn(f64) -> T,
    apply: impl Fn(OpCode, &[T]) -> T,
) -> Result<T> {
    if inputs.len() != ir.num_inputs() {
        return Err(Error::Eval(format!(
            "expected {} inputs, got {}",
            ir.num_inputs(),
            inputs.len()
        )));
    }

    let mut values: HashMap<usize, T> = HashMap::with_capacity(ir.ops.len());
    let mut args: Vec<T> = Vec::with_capacity(2);
    for op in &ir.ops {
        let result = match op.op {
            OpCode::Load => match op.operands.first() {
                Some(Operand::String(name)) => {
                    let slot = ir.input_slot(name)?;
                    *inputs
                        .get(slot)
                        .ok_or_else(|| Error::Eval(format!("input `{name}` out of range")))?
                }
                _ => return Err(Error::Eval("load expects an input name".into())),
            },
            OpCode::Const => match op.operands.first() {
                Some(Operand::Float(v)) => literal(*v),
                Some(Operand::Ref(v)) => literal(*v as f64),
                _ => return Err(Error::Eval("const expects a number".into())),
            },
            code => {
                args.clear();
                for operand in &op.operands {
                    args.push(match operand {
                        Operand::Ref(id) => *values
                            .get(id)
                            .ok_or_else(|| Error::Eval(format!("value {id} not found")))?,
                        Operand::Float(v) => literal(*v),
                        Operand::String(s) => {
                            return Err(Error::Eval(format!("unexpected string operand `{s}`")))
                        }
                    });
                }
                if args.len() != code.arity() {
                    return Err(Error::Eval(format!("{code:?} takes {} operands", code.arity())));
                }
                apply(code, &args)
            }
        };
        values.insert(op.result, result);
    }

    values
        .get(&ir.output)
        .copied()
        .ok_or_else(|| Error::Eval(format!("output value {} not found", ir.output)))
}

/// Evaluates `ir` over doubles. Comparisons yield `1.0` or `0.0`.
pub fn eval(ir: &TraceIR, inputs: &[f64]) -> Result<f64> {
    run(ir, inputs, |v| v, |code, a| match code {
        OpCode::Add => a[0] + a[1],
        OpCode::Sub => a[0] - a[1],
        OpCode::Mul => a[0] * a[1],
        OpCode::Div => a[0] / a[1],
        OpCode::Mod => a[0] % a[1],
        OpCode::Neg => -a[0],
        OpCode::Pow => a[0].powf(a[1]),
        OpCode::Sqrt => a[0].sqrt(),
        OpCode::Abs => a[0].abs(),
        OpCode::Min => a[0].min(a[1]),
        OpCode::Max => a[0].max(a[1]),
        OpCode::Sin => a[0].sin(),
        OpCode::Cos => a[0].cos(),
        OpCode::Tan => a[0].tan(),
        OpCode::Exp => a[0].exp(),
        OpCode::Ln => a[0].ln(),
        OpCode::Lt => truth(a[0] < a[1]),
        OpCode::Le => truth(a[0] <= a[1]),
        OpCode::Gt => truth(a[0] > a[1]),
        OpCode::Ge => truth(a[0] >= a[1]),
        OpCode::Eq => truth(a[0] == a[1]),
        OpCode::Ne => truth(a[0] != a[1]),
        OpCode::Const | OpCode::Load => f64::NAN,
    })
}

// [1, 1] if the relation holds for all values, [0, 0] if it holds for none,
// [0, 1] otherwise.
fn relation(always: bool, never: bool) -> Interval {
    if always {
        Interval::ONE
    } else if never {
        Interval::ZERO
    } else {
        Interval::new(0.0, 1.0)
    }
}

/// Evaluates `ir` over intervals with the rounding of `ctx`.
///
/// `pow` needs a singleton exponent; any other exponent gives `EMPTY`.
pub fn eval_interval(ir: &TraceIR, ctx: &IntervalContext, inputs: &[Interval]) -> Result<Interval> {
    run(ir, inputs, Interval::singleton, |code, a| match code {
        OpCode::Add => ctx.add(a[0], a[1]),
        OpCode::Sub => ctx.sub(a[0], a[1]),
        OpCode::Mul => ctx.mul(a[0], a[1]),
        OpCode::Div => ctx.div(a[0], a[1]),
        OpCode::Mod => ctx.fmod(a[0], a[1]),
        OpCode::Neg => IntervalContext::negative(a[0]),
        OpCode::Pow => ctx.pow_interval(a[0], a[1]),
        OpCode::Sqrt => ctx.sqrt(a[0]),
        OpCode::Abs => ctx.abs(a[0]),
        OpCode::Min => ctx.min(a[0], a[1]),
        OpCode::Max => ctx.max(a[0], a[1]),
        OpCode::Sin => ctx.sin(a[0]),
        OpCode::Cos => ctx.cos(a[0]),
        OpCode::Tan => ctx.tan(a[0]),
        OpCode::Exp => ctx.exp(a[0]),
        OpCode::Ln => ctx.ln(a[0]),
        OpCode::Lt => relation(a[0].lt(a[1]), a[0].geq(a[1])),
        OpCode::Le => relation(a[0].leq(a[1]), a[0].gt(a[1])),
        OpCode::Gt => relation(a[0].gt(a[1]), a[0].leq(a[1])),
        OpCode::Ge => relation(a[0].geq(a[1]), a[0].lt(a[1])),
        OpCode::Eq => relation(a[0].is_singleton() && a[0].equal(a[1]), a[0].not_equal(a[1])),
        OpCode::Ne => relation(a[0].not_equal(a[1]), a[0].is_singleton() && a[0].equal(a[1])),
        OpCode::Const | OpCode::Load => Interval::EMPTY,
    })
}

/// False only if the expression is provably non-zero everywhere on `domain`.
///
/// An empty enclosure (the expression is undefined on the whole box) counts
/// as not vanishing.
pub fn may_vanish(ir: &TraceIR, ctx: &IntervalContext, domain: &[Interval]) -> Result<bool> {
    Ok(eval_interval(ir, ctx, domain)?.zero_in())
}

//! Expression IR
//!
//! A user-authored function as a flat list of SSA-style operations, the
//! JSON form the expression layer hands to the evaluators and the JIT.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpCode {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    Pow,

    // Elementary functions
    Sqrt,
    Abs,
    Min,
    Max,
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,

    // Comparison, 1 for true and 0 for false
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,

    // Other
    Const,
    Load,
}

impl OpCode {
    /// Number of operands the op takes.
    pub fn arity(self) -> usize {
        match self {
            Self::Neg
            | Self::Sqrt
            | Self::Abs
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Exp
            | Self::Ln
            | Self::Const
            | Self::Load => 1,
            _ => 2,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::Eq | Self::Ne
        )
    }
}

/// A single operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Op {
    pub op: OpCode,
    /// Value id this op defines.
    pub result: usize,
    pub operands: Vec<Operand>,
    #[serde(default = "default_dtype")]
    pub dtype: String,
}

fn default_dtype() -> String {
    "f64".to_string()
}

/// An operand is a value reference, a literal, or an input name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Ref(usize),
    Float(f64),
    String(String),
}

/// A complete expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceIR {
    /// Input names mapped to their 1-based position in the input slice.
    pub inputs: HashMap<String, usize>,
    /// Value id of the result.
    pub output: usize,
    pub ops: Vec<Op>,
}

impl TraceIR {
    /// Parses and validates IR from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let ir: Self = serde_json::from_str(json)?;
        ir.validate()?;
        Ok(ir)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Input names ordered by position.
    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, usize)> = self.inputs.iter().map(|(n, &i)| (n.as_str(), i)).collect();
        names.sort_by_key(|&(_, i)| i);
        names.into_iter().map(|(n, _)| n).collect()
    }

    /// Position of input `name` in the input slice.
    pub fn input_slot(&self, name: &str) -> Result<usize> {
        self.inputs
            .get(name)
            .map(|&i| i - 1)
            .ok_or_else(|| Error::Eval(format!("unknown input `{name}`")))
    }

    /// Checks operand counts, that inputs are numbered `1..=n`, and that
    /// every reference points to an earlier op.
    pub fn validate(&self) -> Result<()> {
        let mut slots: Vec<usize> = self.inputs.values().copied().collect();
        slots.sort_unstable();
        if slots.iter().enumerate().any(|(i, &s)| s != i + 1) {
            return Err(Error::Eval("inputs must be numbered 1..=n".into()));
        }

        let mut defined = std::collections::HashSet::new();
        for op in &self.ops {
            if op.operands.len() != op.op.arity() {
                return Err(Error::Eval(format!(
                    "{:?} takes {} operands, got {}",
                    op.op,
                    op.op.arity(),
                    op.operands.len()
                )));
            }
            for operand in &op.operands {
                match operand {
                    Operand::Ref(id) if op.op != OpCode::Const && !defined.contains(id) => {
                        return Err(Error::Eval(format!("value {id} used before definition")));
                    }
                    Operand::String(name) if op.op == OpCode::Load => {
                        self.input_slot(name)?;
                    }
                    Operand::String(s) => {
                        return Err(Error::Eval(format!("unexpected string operand `{s}`")));
                    }
                    _ => {}
                }
            }
            if op.op == OpCode::Load && !matches!(op.operands[0], Operand::String(_)) {
                return Err(Error::Eval("load expects an input name".into()));
            }
            defined.insert(op.result);
        }

        if !defined.contains(&self.output) {
            return Err(Error::Eval(format!("output value {} is never defined", self.output)));
        }
        Ok(())
    }
}

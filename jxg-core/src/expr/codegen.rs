//! Cranelift Code Generation
//!
//! Compiles the float subset of [`TraceIR`] to native code. Supported ops:
//! arithmetic except `mod` and `pow`, `sqrt`, `abs`, `min`, `max`, the
//! comparisons, `const` and `load`. Everything else is rejected at compile
//! time and has to go through [`super::eval`].

use std::collections::HashMap;

use cranelift::prelude::*;
use cranelift_jit::{JITBuilder, JITModule};
use cranelift_module::{Linkage, Module};
use target_lexicon::Triple;
use tracing::debug;

use super::ir::{OpCode, Operand, TraceIR};
use crate::error::{Error, Result};

/// Signature of the generated code: `fn(*const f64) -> f64`.
type JitFn = unsafe extern "C" fn(*const f64) -> f64;

fn jit_err(e: impl std::fmt::Display) -> Error {
    Error::Jit(e.to_string())
}

/// A compiled expression.
pub struct CompiledFunction {
    /// Owns the code `func_ptr` points into.
    _module: JITModule,
    func_ptr: JitFn,
    num_inputs: usize,
}

impl CompiledFunction {
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Runs the compiled code. `inputs` are ordered by input position.
    pub fn call(&self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.num_inputs {
            return Err(Error::Eval(format!(
                "expected {} inputs, got {}",
                self.num_inputs,
                inputs.len()
            )));
        }
        // SAFETY: the code was generated for this signature, reads exactly
        // `num_inputs` doubles and stays alive as long as `_module`.
        Ok(unsafe { (self.func_ptr)(inputs.as_ptr()) })
    }
}

/// JIT compiler for the host platform.
pub struct JitCompiler {
    isa: isa::OwnedTargetIsa,
}

impl JitCompiler {
    pub fn new() -> Result<Self> {
        let mut flag_builder = settings::builder();
        flag_builder.set("opt_level", "speed").map_err(jit_err)?;

        let isa_builder = cranelift_native::builder()
            .map_err(|e| Error::Jit(format!("failed to create ISA builder: {e}")))?;
        let isa = isa_builder
            .finish(settings::Flags::new(flag_builder))
            .map_err(|e| Error::Jit(format!("failed to build ISA: {e}")))?;

        debug!(host = %Triple::host(), "JIT compiler ready");
        Ok(Self { isa })
    }

    /// Compiles a validated expression to native code.
    pub fn compile(&self, ir: &TraceIR) -> Result<CompiledFunction> {
        ir.validate()?;
        if let Some(op) = ir.ops.iter().find(|op| !Self::supports(op.op)) {
            return Err(Error::Jit(format!("unsupported opcode: {:?}", op.op)));
        }

        let builder = JITBuilder::with_isa(self.isa.clone(), cranelift_module::default_libcall_names());
        let mut module = JITModule::new(builder);

        let mut ctx = module.make_context();
        let ptr_type = module.target_config().pointer_type();
        ctx.func.signature.params.push(AbiParam::new(ptr_type));
        ctx.func.signature.returns.push(AbiParam::new(types::F64));

        let func_id = module
            .declare_function("expr", Linkage::Local, &ctx.func.signature)
            .map_err(jit_err)?;

        let mut builder_ctx = FunctionBuilderContext::new();
        let mut builder = FunctionBuilder::new(&mut ctx.func, &mut builder_ctx);

        let entry_block = builder.create_block();
        builder.append_block_params_for_function_params(entry_block);
        builder.switch_to_block(entry_block);
        builder.seal_block(entry_block);

        let input_ptr = builder.block_params(entry_block)[0];
        let mut values: HashMap<usize, Value> = HashMap::new();

        for op in &ir.ops {
            let result = match op.op {
                OpCode::Load => {
                    let Some(Operand::String(name)) = op.operands.first() else {
                        return Err(Error::Jit("load expects an input name".into()));
                    };
                    let offset = (ir.input_slot(name)? * 8) as i32;
                    builder.ins().load(types::F64, MemFlags::trusted(), input_ptr, offset)
                }

                OpCode::Const => {
                    let val = match op.operands.first() {
                        Some(Operand::Float(f)) => *f,
                        Some(Operand::Ref(r)) => *r as f64,
                        _ => return Err(Error::Jit("const expects a number".into())),
                    };
                    builder.ins().f64const(val)
                }

                OpCode::Neg | OpCode::Sqrt | OpCode::Abs => {
                    let x = Self::operand(&op.operands[0], &values, &mut builder)?;
                    match op.op {
                        OpCode::Neg => builder.ins().fneg(x),
                        OpCode::Sqrt => builder.ins().sqrt(x),
                        _ => builder.ins().fabs(x),
                    }
                }

                OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Min | OpCode::Max => {
                    let lhs = Self::operand(&op.operands[0], &values, &mut builder)?;
                    let rhs = Self::operand(&op.operands[1], &values, &mut builder)?;
                    match op.op {
                        OpCode::Add => builder.ins().fadd(lhs, rhs),
                        OpCode::Sub => builder.ins().fsub(lhs, rhs),
                        OpCode::Mul => builder.ins().fmul(lhs, rhs),
                        OpCode::Div => builder.ins().fdiv(lhs, rhs),
                        OpCode::Min => builder.ins().fmin(lhs, rhs),
                        _ => builder.ins().fmax(lhs, rhs),
                    }
                }

                // Comparisons yield 0.0 or 1.0
                code => {
                    let cond = match code {
                        OpCode::Lt => FloatCC::LessThan,
                        OpCode::Le => FloatCC::LessThanOrEqual,
                        OpCode::Gt => FloatCC::GreaterThan,
                        OpCode::Ge => FloatCC::GreaterThanOrEqual,
                        OpCode::Eq => FloatCC::Equal,
                        OpCode::Ne => FloatCC::NotEqual,
                        other => return Err(Error::Jit(format!("unsupported opcode: {other:?}"))),
                    };
                    let lhs = Self::operand(&op.operands[0], &values, &mut builder)?;
                    let rhs = Self::operand(&op.operands[1], &values, &mut builder)?;
                    let cmp = builder.ins().fcmp(cond, lhs, rhs);
                    let int_val = builder.ins().uextend(types::I64, cmp);
                    builder.ins().fcvt_from_uint(types::F64, int_val)
                }
            };
            values.insert(op.result, result);
        }

        let output = *values
            .get(&ir.output)
            .ok_or_else(|| Error::Jit("output value not found".into()))?;
        builder.ins().return_(&[output]);
        builder.finalize();

        module.define_function(func_id, &mut ctx).map_err(jit_err)?;
        module.clear_context(&mut ctx);
        module.finalize_definitions().map_err(jit_err)?;

        let code_ptr = module.get_finalized_function(func_id);
        // SAFETY: the function was declared with the `JitFn` signature above.
        let func_ptr: JitFn = unsafe { std::mem::transmute::<*const u8, JitFn>(code_ptr) };
        debug!(ops = ir.ops.len(), inputs = ir.num_inputs(), "expression compiled");

        Ok(CompiledFunction {
            _module: module,
            func_ptr,
            num_inputs: ir.num_inputs(),
        })
    }

    /// Whether `code` can be compiled.
    pub fn supports(code: OpCode) -> bool {
        !matches!(
            code,
            OpCode::Mod
                | OpCode::Pow
                | OpCode::Sin
                | OpCode::Cos
                | OpCode::Tan
                | OpCode::Exp
                | OpCode::Ln
        )
    }

    fn operand(op: &Operand, values: &HashMap<usize, Value>, builder: &mut FunctionBuilder) -> Result<Value> {
        match op {
            Operand::Ref(id) => values
                .get(id)
                .copied()
                .ok_or_else(|| Error::Jit(format!("value {id} not found"))),
            Operand::Float(f) => Ok(builder.ins().f64const(*f)),
            Operand::String(s) => Err(Error::Jit(format!("unexpected string operand `{s}`"))),
        }
    }
}

//! Python bindings (feature `python`).

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::Error;
use crate::expr::{self, JitCompiler, TraceIR};
use crate::interval::{Interval, IntervalContext};

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        match e {
            Error::Jit(_) => PyRuntimeError::new_err(e.to_string()),
            _ => PyValueError::new_err(e.to_string()),
        }
    }
}

/// Python-exposed interval with outward rounding.
#[pyclass(name = "Interval")]
#[derive(Clone, Copy)]
pub struct PyInterval {
    inner: Interval,
}

impl From<Interval> for PyInterval {
    fn from(inner: Interval) -> Self {
        Self { inner }
    }
}

const CTX: IntervalContext = IntervalContext::outward();

#[pymethods]
impl PyInterval {
    /// `Interval(lo, hi)`; NaN or inverted bounds give the empty interval.
    #[new]
    #[pyo3(signature = (lo, hi=None))]
    fn new(lo: f64, hi: Option<f64>) -> Self {
        Interval::assign(lo, hi.unwrap_or(lo)).into()
    }

    #[staticmethod]
    fn empty() -> Self {
        Interval::EMPTY.into()
    }

    #[staticmethod]
    fn whole() -> Self {
        Interval::WHOLE.into()
    }

    #[getter]
    fn lo(&self) -> f64 {
        self.inner.lo
    }

    #[getter]
    fn hi(&self) -> f64 {
        self.inner.hi
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn __contains__(&self, value: f64) -> bool {
        self.inner.has_value(value)
    }

    fn __add__(&self, other: PyInterval) -> Self {
        CTX.add(self.inner, other.inner).into()
    }

    fn __sub__(&self, other: PyInterval) -> Self {
        CTX.sub(self.inner, other.inner).into()
    }

    fn __mul__(&self, other: PyInterval) -> Self {
        CTX.mul(self.inner, other.inner).into()
    }

    fn __truediv__(&self, other: PyInterval) -> Self {
        CTX.div(self.inner, other.inner).into()
    }

    fn __neg__(&self) -> Self {
        IntervalContext::negative(self.inner).into()
    }

    fn __pow__(&self, power: f64, _modulo: Option<PyObject>) -> Self {
        CTX.pow(self.inner, power).into()
    }

    fn sqrt(&self) -> Self {
        CTX.sqrt(self.inner).into()
    }

    fn sin(&self) -> Self {
        CTX.sin(self.inner).into()
    }

    fn cos(&self) -> Self {
        CTX.cos(self.inner).into()
    }

    fn exp(&self) -> Self {
        CTX.exp(self.inner).into()
    }

    fn log(&self) -> Self {
        CTX.log(self.inner).into()
    }

    fn hull(&self, other: PyInterval) -> Self {
        self.inner.hull(other.inner).into()
    }

    fn intersection(&self, other: PyInterval) -> Self {
        self.inner.intersection(other.inner).into()
    }

    fn union(&self, other: PyInterval) -> PyResult<Self> {
        Ok(self.inner.union(other.inner)?.into())
    }

    fn __repr__(&self) -> String {
        format!("Interval{}", self.inner)
    }
}

/// Python-exposed JIT compiler.
#[pyclass(name = "JitCompiler")]
pub struct PyJitCompiler {
    compiler: JitCompiler,
}

#[pymethods]
impl PyJitCompiler {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self {
            compiler: JitCompiler::new()?,
        })
    }

    /// Compiles IR JSON and runs it once with `inputs`.
    fn compile_and_run(&self, ir_json: &str, inputs: Vec<f64>) -> PyResult<f64> {
        let ir = TraceIR::from_json(ir_json)?;
        let func = self.compiler.compile(&ir)?;
        Ok(func.call(&inputs)?)
    }
}

/// Evaluates IR JSON over doubles.
#[pyfunction]
fn eval(ir_json: &str, inputs: Vec<f64>) -> PyResult<f64> {
    Ok(expr::eval(&TraceIR::from_json(ir_json)?, &inputs)?)
}

/// Evaluates IR JSON over intervals.
#[pyfunction]
fn eval_interval(ir_json: &str, inputs: Vec<PyInterval>) -> PyResult<PyInterval> {
    let ir = TraceIR::from_json(ir_json)?;
    let inputs: Vec<Interval> = inputs.into_iter().map(|i| i.inner).collect();
    Ok(expr::eval_interval(&ir, &CTX, &inputs)?.into())
}

/// False if the expression has no zero on the box.
#[pyfunction]
fn may_vanish(ir_json: &str, domain: Vec<PyInterval>) -> PyResult<bool> {
    let ir = TraceIR::from_json(ir_json)?;
    let domain: Vec<Interval> = domain.into_iter().map(|i| i.inner).collect();
    Ok(expr::may_vanish(&ir, &CTX, &domain)?)
}

/// Python module definition.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyInterval>()?;
    m.add_class::<PyJitCompiler>()?;
    m.add_function(wrap_pyfunction!(eval, m)?)?;
    m.add_function(wrap_pyfunction!(eval_interval, m)?)?;
    m.add_function(wrap_pyfunction!(may_vanish, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

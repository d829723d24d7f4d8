use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::schema::{Validate, ValidationError};
use crate::lib::errors::ToolError;

pub const CALCULATOR_TOOL_ID: &str = "calculator";

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

/// Input for `calculator`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CalculatorRequest {
    /// Left operand.
    pub num1: f64,
    /// Right operand.
    pub num2: f64,
    /// One of `+`, `-`, `*`, `/`.
    pub operator: Operator,
}

impl Validate for CalculatorRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A computed expression, rendered as `a OP b = r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub num1: f64,
    pub num2: f64,
    pub operator: Operator,
    pub result: f64,
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            JsNumber(self.num1),
            self.operator.symbol(),
            JsNumber(self.num2),
            JsNumber(self.result)
        )
    }
}

/// Formats an `f64` the way JavaScript's `Number#toString` does: shortest
/// round-trip digits, exponent form outside `[1e-6, 1e21)`, and
/// `Infinity`/`NaN` for non-finite values.
struct JsNumber(f64);

impl fmt::Display for JsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("NaN");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
        }
        if value == 0.0 {
            return f.write_str("0");
        }
        let magnitude = value.abs();
        if (1e-6..1e21).contains(&magnitude) {
            return write!(f, "{value}");
        }
        let exponential = format!("{value:e}");
        match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&exponential),
        }
    }
}

pub fn calculate(request: &CalculatorRequest) -> Result<Calculation, ToolError> {
    let (a, b) = (request.num1, request.num2);
    let result = match request.operator {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide if b == 0.0 => return Err(ToolError::DivisionByZero),
        Operator::Divide => a / b,
    };
    Ok(Calculation {
        num1: a,
        num2: b,
        operator: request.operator,
        result,
    })
}

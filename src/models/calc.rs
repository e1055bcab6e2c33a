//! Calculator operation models
//!
//! Describes the operations exposed under `/calc` and how a call maps onto a
//! request path.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations served by the calculator API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalcOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Sqrt,
}

impl CalcOp {
    /// Path segment used by the service
    pub fn name(&self) -> &'static str {
        match self {
            CalcOp::Add => "add",
            CalcOp::Subtract => "subtract",
            CalcOp::Multiply => "multiply",
            CalcOp::Divide => "divide",
            CalcOp::Sqrt => "sqrt",
        }
    }

    /// Number of operands the endpoint takes
    pub fn arity(&self) -> usize {
        match self {
            CalcOp::Sqrt => 1,
            _ => 2,
        }
    }

    pub fn all() -> Vec<CalcOp> {
        vec![
            CalcOp::Add,
            CalcOp::Subtract,
            CalcOp::Multiply,
            CalcOp::Divide,
            CalcOp::Sqrt,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<CalcOp> {
        match s.to_lowercase().as_str() {
            "add" | "plus" => Some(CalcOp::Add),
            "subtract" | "sub" | "minus" => Some(CalcOp::Subtract),
            "multiply" | "mul" | "times" => Some(CalcOp::Multiply),
            "divide" | "div" => Some(CalcOp::Divide),
            "sqrt" => Some(CalcOp::Sqrt),
            _ => None,
        }
    }
}

impl fmt::Display for CalcOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single calculator invocation: operation plus its path operands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalcCall {
    pub op: CalcOp,
    pub operands: Vec<String>,
}

impl CalcCall {
    pub fn unary(op: CalcOp, a: impl Into<String>) -> Self {
        Self {
            op,
            operands: vec![a.into()],
        }
    }

    pub fn binary(op: CalcOp, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            op,
            operands: vec![a.into(), b.into()],
        }
    }

    /// Build a call from user input, checking the operand count
    pub fn parse(op: &str, operands: &[String]) -> Result<Self> {
        let Some(op) = CalcOp::from_str(op) else {
            let supported: Vec<&str> = CalcOp::all().iter().map(|o| o.name()).collect();
            bail!("Unknown operation: {op}. Supported: {}", supported.join(", "));
        };

        if operands.len() != op.arity() {
            bail!(
                "{} takes {} operand(s), got {}",
                op,
                op.arity(),
                operands.len()
            );
        }

        if let Some(bad) = operands
            .iter()
            .find(|o| o.is_empty() || o.contains('/') || o.contains(char::is_whitespace))
        {
            bail!("Invalid operand: {bad:?}");
        }

        Ok(Self {
            op,
            operands: operands.to_vec(),
        })
    }

    /// Request path, e.g. `/calc/add/1/2`
    pub fn path(&self) -> String {
        let mut path = format!("/calc/{}", self.op.name());
        for operand in &self.operands {
            path.push('/');
            path.push_str(operand);
        }
        path
    }
}

impl fmt::Display for CalcCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.op, self.operands.join(","))
    }
}

//! Two-operand arithmetic calculator.
//!
//! Operations are named by any of several aliases (English words, symbols
//! and Russian words), matched case-insensitively.

use std::collections::HashMap;
use std::fmt;

use axum::{Json, extract::Query, response::IntoResponse};
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::services::error::{ServiceError, ServiceResult};
use crate::domains::services::extract::JsonObject;
use crate::domains::services::validation::{JsonMap, parse_f64, query_to_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

const ALIASES: &[(Operation, &[&str])] = &[
    (
        Operation::Add,
        &["add", "+", "plus", "sum", "addition", "сложение", "сложить"],
    ),
    (
        Operation::Subtract,
        &["subtract", "-", "minus", "subtraction", "difference", "вычитание", "вычесть"],
    ),
    (
        Operation::Multiply,
        &["multiply", "*", "x", "times", "multiplication", "product", "умножение", "умножить"],
    ),
    (
        Operation::Divide,
        &["divide", "/", "over", "division", "quotient", "деление", "разделить"],
    ),
];

impl Operation {
    /// Look up an operation by alias, ignoring case and surrounding spaces.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(_, names)| names.contains(&alias.as_str()))
            .map(|(op, _)| *op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Stateless calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    pub fn evaluate(a: f64, b: f64, op: Operation) -> ServiceResult<f64> {
        match op {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide if b == 0.0 => {
                Err(ServiceError::validation("Error: division by zero is not possible."))
            }
            Operation::Divide => Ok(a / b),
        }
    }
}

/// A validated calculation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub operand1: f64,
    pub operand2: f64,
    /// The alias exactly as the caller sent it.
    pub alias: String,
    pub operation: Operation,
}

/// Validate calculator input from either a query string or a JSON body.
///
/// Missing parameters are reported together, then the operation is
/// resolved, then both operands are parsed.
pub fn validate_calculation(input: &JsonMap) -> ServiceResult<Calculation> {
    let missing: Vec<&str> = ["num1", "num2", "operation"]
        .into_iter()
        .filter(|key| matches!(input.get(*key), None | Some(Value::Null)))
        .collect();
    if !missing.is_empty() {
        return Err(ServiceError::validation(format!(
            "Missing required parameters: {}.",
            missing.join(", ")
        )));
    }

    let alias = match &input["operation"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let operation = Operation::from_alias(&alias).ok_or_else(|| {
        ServiceError::validation(format!(
            "Unknown operation: '{alias}'. Supported operations: add, subtract, multiply, divide (and their aliases)."
        ))
    })?;

    match (parse_f64(&input["num1"]), parse_f64(&input["num2"])) {
        (Some(operand1), Some(operand2)) => Ok(Calculation {
            operand1,
            operand2,
            alias,
            operation,
        }),
        _ => Err(ServiceError::validation(
            "Parameters 'num1' and 'num2' must be valid numbers.",
        )),
    }
}

fn calculate(input: &JsonMap, source: &str) -> ServiceResult<Json<Value>> {
    let calc = validate_calculation(input)?;
    let result = Calculator::evaluate(calc.operand1, calc.operand2, calc.operation)?;

    Ok(Json(json!({
        "message": "Calculation completed successfully.",
        "input_data_source": source,
        "operand1": calc.operand1,
        "operand2": calc.operand2,
        "operation_requested_alias": calc.alias,
        "operation_performed_symbol": calc.operation.symbol(),
        "result": result,
    })))
}

/// `GET /api/calculate`
#[instrument]
pub async fn calculate_from_query(
    Query(query): Query<HashMap<String, String>>,
) -> ServiceResult<impl IntoResponse> {
    calculate(&query_to_json(query), "query")
}

/// `POST /api/calculate`
#[instrument(skip_all)]
pub async fn calculate_from_json(JsonObject(body): JsonObject) -> ServiceResult<impl IntoResponse> {
    calculate(&body, "json")
}

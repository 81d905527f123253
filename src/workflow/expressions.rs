//! Expression evaluation for GitHub Actions-style ${{ }} syntax
//!
//! Supports:
//! - ${{ inputs.NAME }}
//! - ${{ env.VAR_NAME }}
//! - `!`, `==`, `!=`, `&&`, `||` and parentheses in conditions
//! - 'string' literals, true/false, numbers, always()/success()/failure()
//!
//! Contexts that only exist while a workflow runs (`matrix`, `secrets`,
//! `github`, ...) and function calls such as `hashFiles()` are not
//! evaluated. Interpolation leaves them as written, and conditions report
//! them through [`ExpressionError::RuntimeContext`].

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use super::context::ExpressionContext;
use super::parameter::ParameterValue;

static EXPRESSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\{\s*([^}]+?)\s*\}\}").unwrap());

static WRAPPED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\$\{\{\s*([^}]+?)\s*\}\}\s*$").unwrap());

// No lookbehind in `regex`: the leading group rejects `github.event.inputs.x`
static INPUT_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_.\-])inputs\.([A-Za-z_][A-Za-z0-9_-]*)").unwrap()
});

/// Contexts supplied by the CI platform at run time
const RUNTIME_CONTEXTS: [&str; 10] = [
    "github", "matrix", "secrets", "vars", "steps", "needs", "job", "jobs", "runner", "strategy",
];

/// Errors that can occur during expression evaluation
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Invalid expression syntax: {0}")]
    InvalidSyntax(String),

    #[error("Depends on runtime context: {0}")]
    RuntimeContext(String),
}

/// Evaluate all expressions in a string
///
/// Expressions that depend on runtime contexts are kept verbatim.
pub fn evaluate(input: &str, ctx: &ExpressionContext) -> Result<String, ExpressionError> {
    interpolate(input, ctx, true)
}

fn interpolate(
    input: &str,
    ctx: &ExpressionContext,
    keep_runtime: bool,
) -> Result<String, ExpressionError> {
    let mut result = String::with_capacity(input.len());
    let mut last = 0;

    for cap in EXPRESSION_REGEX.captures_iter(input) {
        let full_match = cap.get(0).unwrap();
        let expr = cap.get(1).unwrap().as_str();

        result.push_str(&input[last..full_match.start()]);
        match evaluate_expression(expr, ctx) {
            Ok(value) => result.push_str(&value.to_string()),
            Err(ExpressionError::RuntimeContext(_)) if keep_runtime => {
                result.push_str(full_match.as_str())
            }
            Err(e) => return Err(e),
        }
        last = full_match.end();
    }

    result.push_str(&input[last..]);
    Ok(result)
}

/// Evaluate a single expression (without the ${{ }} wrapper)
pub fn evaluate_expression(
    expr: &str,
    ctx: &ExpressionContext,
) -> Result<ParameterValue, ExpressionError> {
    let expr = expr.trim();

    if expr.is_empty() {
        return Err(ExpressionError::InvalidSyntax("empty expression".to_string()));
    }

    let parts = split_top_level(expr, "||");
    if parts.len() > 1 {
        return evaluate_chain(&parts, ctx, true);
    }

    let parts = split_top_level(expr, "&&");
    if parts.len() > 1 {
        return evaluate_chain(&parts, ctx, false);
    }

    for (op, negate) in [("!=", true), ("==", false)] {
        if let Some(pos) = find_top_level(expr, op) {
            let equal = values_equal(
                &evaluate_expression(&expr[..pos], ctx)?,
                &evaluate_expression(&expr[pos + op.len()..], ctx)?,
            );
            return Ok(ParameterValue::Bool(equal != negate));
        }
    }

    if let Some(rest) = expr.strip_prefix('!') {
        let value = evaluate_expression(rest, ctx)?;
        return Ok(ParameterValue::Bool(!is_truthy(&value)));
    }

    if let Some(inner) = strip_parens(expr) {
        return evaluate_expression(inner, ctx);
    }

    evaluate_operand(expr, ctx)
}

/// `||` (`any` = true) or `&&` over operands
///
/// A decided operand wins over one that depends on runtime context, so
/// `false && secrets.TOKEN != ''` is still false.
fn evaluate_chain(
    parts: &[&str],
    ctx: &ExpressionContext,
    any: bool,
) -> Result<ParameterValue, ExpressionError> {
    let mut undecided = None;

    for part in parts {
        match evaluate_expression(part, ctx) {
            Ok(value) if is_truthy(&value) == any => return Ok(ParameterValue::Bool(any)),
            Ok(_) => {}
            Err(e @ ExpressionError::RuntimeContext(_)) => {
                undecided.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }

    match undecided {
        Some(e) => Err(e),
        None => Ok(ParameterValue::Bool(!any)),
    }
}

/// Byte offset of the first `op` outside quoted literals and parentheses
fn find_top_level(expr: &str, op: &str) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                _ if depth == 0 && bytes[i..].starts_with(op.as_bytes()) => return Some(i),
                _ => {}
            },
        }
    }

    None
}

fn split_top_level<'a>(expr: &'a str, op: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut rest = expr;

    while let Some(pos) = find_top_level(rest, op) {
        parts.push(&rest[..pos]);
        rest = &rest[pos + op.len()..];
    }

    parts.push(rest);
    parts
}

/// Inner text of `( ... )` when the outer parentheses enclose everything
fn strip_parens(expr: &str) -> Option<&str> {
    if !expr.starts_with('(') || !expr.ends_with(')') {
        return None;
    }

    let bytes = expr.as_bytes();
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return (i == bytes.len() - 1).then(|| &expr[1..i]);
                    }
                }
                _ => {}
            },
        }
    }

    None
}

fn evaluate_operand(token: &str, ctx: &ExpressionContext) -> Result<ParameterValue, ExpressionError> {
    for quote in ['\'', '"'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return Ok(ParameterValue::String(token[1..token.len() - 1].to_string()));
        }
    }

    match token {
        "true" => return Ok(ParameterValue::Bool(true)),
        "false" => return Ok(ParameterValue::Bool(false)),
        "null" => return Ok(ParameterValue::String(String::new())),
        // Plans contain no failing steps, so status functions are constant
        "always()" | "success()" => return Ok(ParameterValue::Bool(true)),
        "failure()" | "cancelled()" => return Ok(ParameterValue::Bool(false)),
        _ => {}
    }

    if let Ok(n) = token.parse::<f64>() {
        return Ok(ParameterValue::Number(n));
    }

    // hashFiles(), contains(), fromJSON() and friends
    if token.contains('(') && token.ends_with(')') {
        return Err(ExpressionError::RuntimeContext(token.to_string()));
    }

    let parts: Vec<&str> = token.split('.').collect();

    match parts[0] {
        "inputs" => {
            if parts.len() != 2 {
                return Err(ExpressionError::InvalidSyntax(format!(
                    "inputs expressions must be inputs.NAME, got: {}",
                    token
                )));
            }
            ctx.get_input(parts[1])
                .cloned()
                .ok_or_else(|| ExpressionError::UnknownVariable(format!("inputs.{}", parts[1])))
        }

        "env" => {
            if parts.len() != 2 {
                return Err(ExpressionError::InvalidSyntax(format!(
                    "env expressions must be env.VAR_NAME, got: {}",
                    token
                )));
            }
            ctx.get_env(parts[1])
                .cloned()
                .map(ParameterValue::String)
                .ok_or_else(|| ExpressionError::UnknownVariable(format!("env.{}", parts[1])))
        }

        context if parts.len() > 1 && RUNTIME_CONTEXTS.contains(&context) => {
            Err(ExpressionError::RuntimeContext(token.to_string()))
        }

        _ => Err(ExpressionError::UnknownVariable(token.to_string())),
    }
}

fn values_equal(left: &ParameterValue, right: &ParameterValue) -> bool {
    match (left, right) {
        (ParameterValue::Bool(a), ParameterValue::Bool(b)) => a == b,
        (ParameterValue::Number(a), ParameterValue::Number(b)) => a == b,
        // Mixed or string comparisons are case-insensitive on the rendered value
        (a, b) => a.to_string().eq_ignore_ascii_case(&b.to_string()),
    }
}

/// Check if a condition expression evaluates to true
///
/// The condition may be written bare (`inputs.run-lint`), fully wrapped
/// (`${{ inputs.run-lint }}`), or as a comparison between interpolated
/// strings (`${{ inputs.repository }} == 'pypi'`). A condition whose outcome
/// depends on a runtime context returns [`ExpressionError::RuntimeContext`].
pub fn evaluate_condition(
    condition: &str,
    ctx: &ExpressionContext,
) -> Result<bool, ExpressionError> {
    let condition = condition.trim();

    if let Some(cap) = WRAPPED_REGEX.captures(condition) {
        let inner = cap.get(1).unwrap().as_str();
        return Ok(is_truthy(&evaluate_expression(inner, ctx)?));
    }

    if !condition.contains("${{") {
        return Ok(is_truthy(&evaluate_expression(condition, ctx)?));
    }

    for (op, negate) in [("!=", true), ("==", false)] {
        if let Some(pos) = find_top_level(condition, op) {
            let left = strip_quotes(&interpolate(condition[..pos].trim(), ctx, false)?);
            let right = strip_quotes(&interpolate(condition[pos + op.len()..].trim(), ctx, false)?);
            return Ok(left.eq_ignore_ascii_case(&right) != negate);
        }
    }

    let value = interpolate(condition, ctx, false)?;
    Ok(is_truthy(&ParameterValue::String(value)))
}

fn strip_quotes(value: &str) -> String {
    value.trim_matches('"').trim_matches('\'').to_string()
}

/// Truthiness used by conditions
pub fn is_truthy(value: &ParameterValue) -> bool {
    match value {
        ParameterValue::Bool(b) => *b,
        ParameterValue::Number(n) => *n != 0.0,
        ParameterValue::String(s) => {
            !s.is_empty()
                && s != "false"
                && s != "0"
                && s.to_lowercase() != "null"
                && s.to_lowercase() != "none"
        }
    }
}

/// Evaluate all expressions in a map of step arguments
pub fn evaluate_params(
    params: &BTreeMap<String, serde_yaml::Value>,
    ctx: &ExpressionContext,
) -> Result<BTreeMap<String, String>, ExpressionError> {
    let mut result = BTreeMap::new();

    for (key, value) in params {
        let string_value = match value {
            serde_yaml::Value::String(s) => evaluate(s, ctx)?,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Null => String::new(),
            _ => serde_yaml::to_string(value)
                .unwrap_or_default()
                .trim_end()
                .to_string(),
        };
        result.insert(key.clone(), string_value);
    }

    Ok(result)
}

/// Input names referenced inside the `${{ }}` expressions of a string
pub fn input_references(text: &str) -> BTreeSet<String> {
    EXPRESSION_REGEX
        .captures_iter(text)
        .flat_map(|cap| condition_input_references(cap.get(1).unwrap().as_str()))
        .collect()
}

/// Input names referenced anywhere in a condition, wrapped or bare
///
/// Quoted literals are not searched.
pub fn condition_input_references(condition: &str) -> BTreeSet<String> {
    let masked = mask_quoted(condition);
    INPUT_REFERENCE_REGEX
        .captures_iter(&masked)
        .map(|cap| cap.get(1).unwrap().as_str().to_string())
        .collect()
}

/// Blank out quoted literals, quotes included
fn mask_quoted(text: &str) -> String {
    let mut quote: Option<char> = None;
    text.chars()
        .map(|c| match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                ' '
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                ' '
            }
            None => c,
        })
        .collect()
}

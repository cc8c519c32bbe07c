//! Built-in function library (GREL)
//!
//! Functions read their inputs by parameter predicate and fall back to
//! positional arguments, so they work with either addressing style.

use std::collections::HashMap;
use std::sync::Arc;

use fluree_vocab::grel;
use serde_json::{Number, Value};

use super::{FunctionArgs, MappingFunction};
use crate::error::{RmlError, RmlResult};
use crate::source::lexical;

type Builtin = fn(&FunctionArgs) -> RmlResult<Value>;

/// All built-in functions keyed by identifier
pub(super) fn library() -> HashMap<String, Arc<dyn MappingFunction>> {
    let table: [(&str, Builtin); 11] = [
        (grel::TO_UPPER_CASE, to_upper_case),
        (grel::TO_LOWER_CASE, to_lower_case),
        (grel::STRING_TRIM, string_trim),
        (grel::STRING_LENGTH, string_length),
        (grel::STRING_REPLACE, string_replace),
        (grel::STRING_SPLIT, string_split),
        (grel::STRING_CONCAT, string_concat),
        (grel::ARRAY_JOIN, array_join),
        (grel::CONTROLS_IF, controls_if),
        (grel::BOOLEAN_NOT, boolean_not),
        (grel::MATH_ROUND, math_round),
    ];
    table
        .into_iter()
        .map(|(id, f)| (id.to_string(), Arc::new(f) as Arc<dyn MappingFunction>))
        .collect()
}

/// Named argument, else positional
fn arg<'a>(args: &'a FunctionArgs, key: &str, position: usize) -> Option<&'a Value> {
    args.get(key)
        .or_else(|| args.at(position))
        .filter(|v| !v.is_null())
}

fn string_arg(
    args: &FunctionArgs,
    key: &str,
    position: usize,
    function: &str,
) -> RmlResult<String> {
    arg(args, key, position)
        .map(scalar_string)
        .ok_or_else(|| RmlError::function(format!("{}: missing argument {}", function, key)))
}

/// Strings as-is, single-element arrays unwrapped, everything else lexical
fn scalar_string(value: &Value) -> String {
    match value {
        Value::Array(items) if items.len() == 1 => scalar_string(&items[0]),
        other => lexical(other),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) if items.len() == 1 => truthy(&items[0]),
        _ => false,
    }
}

fn to_upper_case(args: &FunctionArgs) -> RmlResult<Value> {
    let s = string_arg(args, grel::VALUE_PARAMETER, 0, "toUpperCase")?;
    Ok(Value::String(s.to_uppercase()))
}

fn to_lower_case(args: &FunctionArgs) -> RmlResult<Value> {
    let s = string_arg(args, grel::VALUE_PARAMETER, 0, "toLowerCase")?;
    Ok(Value::String(s.to_lowercase()))
}

fn string_trim(args: &FunctionArgs) -> RmlResult<Value> {
    let s = string_arg(args, grel::VALUE_PARAMETER, 0, "string_trim")?;
    Ok(Value::String(s.trim().to_string()))
}

fn string_length(args: &FunctionArgs) -> RmlResult<Value> {
    let s = string_arg(args, grel::VALUE_PARAMETER, 0, "string_length")?;
    Ok(Value::Number(s.chars().count().into()))
}

fn string_replace(args: &FunctionArgs) -> RmlResult<Value> {
    let s = string_arg(args, grel::VALUE_PARAMETER, 0, "string_replace")?;
    let find = string_arg(args, grel::P_STRING_FIND, 1, "string_replace")?;
    let replace = string_arg(args, grel::P_STRING_REPLACE, 2, "string_replace")?;
    Ok(Value::String(s.replace(&find, &replace)))
}

fn string_split(args: &FunctionArgs) -> RmlResult<Value> {
    let s = string_arg(args, grel::VALUE_PARAMETER, 0, "string_split")?;
    let sep = string_arg(args, grel::P_STRING_SEP, 1, "string_split")?;
    if sep.is_empty() {
        return Ok(Value::Array(
            s.chars().map(|c| Value::String(c.to_string())).collect(),
        ));
    }
    Ok(Value::Array(
        s.split(sep.as_str())
            .map(|part| Value::String(part.to_string()))
            .collect(),
    ))
}

fn string_concat(args: &FunctionArgs) -> RmlResult<Value> {
    let a = string_arg(args, grel::VALUE_PARAMETER, 0, "string_concat")?;
    let b = arg(args, grel::VALUE_PARAMETER_2, 1)
        .map(scalar_string)
        .unwrap_or_default();
    Ok(Value::String(a + &b))
}

fn array_join(args: &FunctionArgs) -> RmlResult<Value> {
    let sep = arg(args, grel::P_STRING_SEP, 1)
        .map(scalar_string)
        .unwrap_or_default();
    let parts: Vec<String> = match arg(args, grel::P_ARRAY_A, 0) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(scalar_string)
            .collect(),
        Some(other) => vec![scalar_string(other)],
        None => Vec::new(),
    };
    Ok(Value::String(parts.join(&sep)))
}

fn controls_if(args: &FunctionArgs) -> RmlResult<Value> {
    let condition = arg(args, grel::BOOL_B, 0).map_or(false, truthy);
    let branch = if condition {
        arg(args, grel::ANY_TRUE, 1)
    } else {
        arg(args, grel::ANY_FALSE, 2)
    };
    Ok(branch.cloned().unwrap_or(Value::Null))
}

fn boolean_not(args: &FunctionArgs) -> RmlResult<Value> {
    let b = arg(args, grel::BOOL_B, 0).map_or(false, truthy);
    Ok(Value::Bool(!b))
}

fn math_round(args: &FunctionArgs) -> RmlResult<Value> {
    let raw = string_arg(args, grel::VALUE_PARAMETER, 0, "math_round")?;
    let n: f64 = raw
        .trim()
        .parse()
        .map_err(|_| RmlError::function(format!("math_round: not a number: {}", raw)))?;
    let rounded = n.round();
    if rounded.abs() < i64::MAX as f64 {
        Ok(Value::Number((rounded as i64).into()))
    } else {
        Ok(Number::from_f64(rounded).map_or(Value::Null, Value::Number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: Value) -> FunctionArgs {
        FunctionArgs::new().with(grel::VALUE_PARAMETER, v)
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(to_upper_case(&value(json!("tom"))).unwrap(), json!("TOM"));
        assert_eq!(to_lower_case(&value(json!(["TOM"]))).unwrap(), json!("tom"));
        assert_eq!(string_trim(&value(json!("  x "))).unwrap(), json!("x"));
        assert_eq!(string_length(&value(json!("héllo"))).unwrap(), json!(5));
        assert!(to_upper_case(&FunctionArgs::new()).is_err());
    }

    #[test]
    fn test_positional_fallback() {
        let args = FunctionArgs::new().with("http://example.org/other", json!("abc"));
        assert_eq!(to_upper_case(&args).unwrap(), json!("ABC"));
    }

    #[test]
    fn test_replace_split_join_concat() {
        let args = value(json!("a-b-c"))
            .with(grel::P_STRING_FIND, json!("-"))
            .with(grel::P_STRING_REPLACE, json!("+"));
        assert_eq!(string_replace(&args).unwrap(), json!("a+b+c"));

        let args = value(json!("a,b")).with(grel::P_STRING_SEP, json!(","));
        assert_eq!(string_split(&args).unwrap(), json!(["a", "b"]));

        let args = FunctionArgs::new()
            .with(grel::P_ARRAY_A, json!(["x", 1, null]))
            .with(grel::P_STRING_SEP, json!("|"));
        assert_eq!(array_join(&args).unwrap(), json!("x|1"));

        let args = value(json!("foo")).with(grel::VALUE_PARAMETER_2, json!("bar"));
        assert_eq!(string_concat(&args).unwrap(), json!("foobar"));
    }

    #[test]
    fn test_controls_and_math() {
        let args = FunctionArgs::new()
            .with(grel::BOOL_B, json!("true"))
            .with(grel::ANY_TRUE, json!("yes"))
            .with(grel::ANY_FALSE, json!("no"));
        assert_eq!(controls_if(&args).unwrap(), json!("yes"));

        let args = FunctionArgs::new()
            .with(grel::BOOL_B, json!(false))
            .with(grel::ANY_TRUE, json!("yes"));
        assert_eq!(controls_if(&args).unwrap(), Value::Null);

        assert_eq!(
            boolean_not(&FunctionArgs::new().with(grel::BOOL_B, json!(true))).unwrap(),
            json!(false)
        );
        assert_eq!(math_round(&value(json!("2.6"))).unwrap(), json!(3));
        assert_eq!(math_round(&value(json!(-1.4))).unwrap(), json!(-1));
        assert!(math_round(&value(json!("x"))).is_err());
    }

    #[test]
    fn test_library_is_complete() {
        let lib = library();
        assert_eq!(lib.len(), 11);
        assert!(lib.contains_key(grel::MATH_ROUND));
    }
}

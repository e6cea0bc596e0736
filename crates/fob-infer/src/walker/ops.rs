//! Operator semantics over [`Value`]s.
//!
//! Any `unknown` operand makes the result `unknown`, except for `instanceof`
//! and `in`, which yield `undefined` when they cannot be decided.

use crate::heap::Heap;
use crate::value::{ObjectKind, Value};

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => *number != 0.0 && !number.is_nan(),
        Value::String(text) => !text.is_empty(),
        Value::Object(_) | Value::Unknown => true,
    }
}

pub fn to_number(heap: &Heap, value: &Value) -> f64 {
    match value {
        Value::Undefined | Value::Unknown => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => *number,
        Value::String(text) => parse_number(text),
        Value::Object(_) => parse_number(&heap.display(value)),
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map_or(f64::NAN, |value| value as f64);
    }
    match text {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => text.parse().unwrap_or(f64::NAN),
    }
}

pub fn to_string(heap: &Heap, value: &Value) -> String {
    heap.display(value)
}

/// `typeof`; `None` when the operand is unknown.
pub fn type_of(heap: &Heap, value: &Value) -> Option<&'static str> {
    let name = match value {
        Value::Undefined => "undefined",
        Value::Null => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Object(id) if heap.object(*id).is_function() => "function",
        Value::Object(_) => "object",
        Value::Unknown => return None,
    };
    Some(name)
}

pub fn unary(heap: &Heap, operator: &str, value: &Value) -> Option<Value> {
    let result = match operator {
        "void" => Value::Undefined,
        "!" if value.is_unknown() => Value::Unknown,
        "!" => Value::Bool(!truthy(value)),
        "typeof" => type_of(heap, value).map_or(Value::Unknown, Value::from),
        _ if value.is_unknown() => Value::Unknown,
        "-" => Value::Number(-to_number(heap, value)),
        "+" => Value::Number(to_number(heap, value)),
        "~" => Value::Number(f64::from(!to_int32(to_number(heap, value)))),
        _ => return None,
    };
    Some(result)
}

/// Binary operator; `None` for operators without semantics.
pub fn binary(heap: &Heap, operator: &str, left: &Value, right: &Value) -> Option<Value> {
    match operator {
        "instanceof" => return Some(instance_of(heap, left, right)),
        "in" => return Some(has_property(heap, left, right)),
        _ => {}
    }
    if left.is_unknown() || right.is_unknown() {
        return Some(Value::Unknown);
    }

    let number = |op: fn(f64, f64) -> f64| {
        Value::Number(op(to_number(heap, left), to_number(heap, right)))
    };
    let int = |op: fn(i32, u32) -> f64| {
        let shift = to_int32(to_number(heap, right)) as u32;
        Value::Number(op(to_int32(to_number(heap, left)), shift))
    };

    let result = match operator {
        "+" => add(heap, left, right),
        "-" => number(|a, b| a - b),
        "*" => number(|a, b| a * b),
        "/" => number(|a, b| a / b),
        "%" => number(|a, b| a % b),
        "**" => number(f64::powf),
        "==" => Value::Bool(loose_equals(heap, left, right)),
        "!=" => Value::Bool(!loose_equals(heap, left, right)),
        "===" => Value::Bool(strict_equals(left, right)),
        "!==" => Value::Bool(!strict_equals(left, right)),
        "<" | ">" | "<=" | ">=" => Value::Bool(compare(heap, operator, left, right)),
        "&" => int(|a, b| f64::from(a & b as i32)),
        "|" => int(|a, b| f64::from(a | b as i32)),
        "^" => int(|a, b| f64::from(a ^ b as i32)),
        "<<" => int(|a, b| f64::from(a.wrapping_shl(b & 31))),
        ">>" => int(|a, b| f64::from(a.wrapping_shr(b & 31))),
        ">>>" => int(|a, b| f64::from((a as u32).wrapping_shr(b & 31))),
        _ => return None,
    };
    Some(result)
}

fn add(heap: &Heap, left: &Value, right: &Value) -> Value {
    let stringy = |value: &Value| matches!(value, Value::String(_) | Value::Object(_));
    if stringy(left) || stringy(right) {
        let mut text = to_string(heap, left);
        text.push_str(&to_string(heap, right));
        Value::String(text)
    } else {
        Value::Number(to_number(heap, left) + to_number(heap, right))
    }
}

fn compare(heap: &Heap, operator: &str, left: &Value, right: &Value) -> bool {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return match operator {
            "<" => a < b,
            ">" => a > b,
            "<=" => a <= b,
            _ => a >= b,
        };
    }
    let (a, b) = (to_number(heap, left), to_number(heap, right));
    match operator {
        "<" => a < b,
        ">" => a > b,
        "<=" => a <= b,
        _ => a >= b,
    }
}

pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        _ => left == right,
    }
}

fn loose_equals(heap: &Heap, left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Object(a), Value::Object(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => to_number(heap, left) == to_number(heap, right),
    }
}

fn instance_of(heap: &Heap, left: &Value, right: &Value) -> Value {
    match right {
        Value::Object(ctor) if heap.object(*ctor).is_function() => match left {
            Value::Object(object) => Value::Bool(heap.is_instance(*object, *ctor)),
            Value::Unknown => Value::Undefined,
            _ => Value::Bool(false),
        },
        _ => Value::Undefined,
    }
}

fn has_property(heap: &Heap, left: &Value, right: &Value) -> Value {
    let Value::Object(object) = right else {
        return Value::Undefined;
    };
    if left.is_unknown() {
        return Value::Undefined;
    }
    let name = to_string(heap, left);
    if let ObjectKind::Array(elements) = &heap.object(*object).kind {
        if name == "length" || name.parse::<usize>().is_ok_and(|index| index < elements.len()) {
            return Value::Bool(true);
        }
    }
    Value::Bool(heap.lookup(*object, &name).is_some())
}

fn to_int32(number: f64) -> i32 {
    if !number.is_finite() {
        return 0;
    }
    (number.trunc() as i64 as u64 & 0xffff_ffff) as u32 as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(operator: &str, left: impl Into<Value>, right: impl Into<Value>) -> Value {
        binary(&Heap::new(), operator, &left.into(), &right.into()).expect("supported operator")
    }

    fn num(value: f64) -> Value {
        Value::Number(value)
    }

    #[test]
    fn addition_concatenates_strings() {
        assert_eq!(
            eval("+", "CANCEL", "CANCEL"),
            Value::String("CANCELCANCEL".into())
        );
        assert_eq!(eval("+", 1.0, 2.0), num(3.0));
        assert_eq!(eval("+", "n", 1.0), Value::String("n1".into()));
    }

    #[test]
    fn unknown_propagates() {
        assert_eq!(eval("*", Value::Unknown, 2.0), Value::Unknown);
        assert_eq!(eval("==", 1.0, Value::Unknown), Value::Unknown);
    }

    #[test]
    fn undecidable_membership_is_undefined() {
        assert_eq!(eval("instanceof", Value::Unknown, Value::Unknown), Value::Undefined);
        assert_eq!(eval("in", "a", 1.0), Value::Undefined);
    }

    #[test]
    fn equality_follows_coercion_rules() {
        assert_eq!(eval("==", Value::Null, Value::Undefined), Value::Bool(true));
        assert_eq!(eval("===", Value::Null, Value::Undefined), Value::Bool(false));
        assert_eq!(eval("==", "1", 1.0), Value::Bool(true));
        assert_eq!(eval("!==", 1.0, 1.0), Value::Bool(false));
    }

    #[test]
    fn comparisons_and_bitwise() {
        assert_eq!(eval("<", 1.0, 2.0), Value::Bool(true));
        assert_eq!(eval("<", "b", "a"), Value::Bool(false));
        assert_eq!(eval("|", 5.0, 2.0), num(7.0));
        assert_eq!(eval("<<", 1.0, 3.0), num(8.0));
        assert_eq!(eval(">>>", -1.0, 28.0), num(15.0));
    }

    #[test]
    fn unary_operators() {
        let heap = Heap::new();
        assert_eq!(
            unary(&heap, "typeof", &Value::from("x")),
            Some(Value::String("string".into()))
        );
        assert_eq!(unary(&heap, "typeof", &Value::Unknown), Some(Value::Unknown));
        assert_eq!(unary(&heap, "-", &num(10.0)), Some(num(-10.0)));
        assert_eq!(unary(&heap, "void", &num(10.0)), Some(Value::Undefined));
        assert_eq!(unary(&heap, "!", &Value::Unknown), Some(Value::Unknown));
        assert_eq!(unary(&heap, "~", &num(0.0)), Some(num(-1.0)));
        assert_eq!(unary(&heap, "delete", &Value::Bool(true)), None);
    }

    #[test]
    fn truthiness() {
        assert!(truthy(&Value::Unknown));
        assert!(!truthy(&Value::from("")));
        assert!(!truthy(&num(f64::NAN)));
        assert!(truthy(&Value::from("0")));
    }
}

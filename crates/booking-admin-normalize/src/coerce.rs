use serde_json::Value;

/// 真偽値らしき値を `bool` へ揃える。
///
/// `true`、文字列 `"true"` / `"1"`、数値 `1` のみを真とし、それ以外はすべて偽。
/// 文字列比較は大文字小文字を区別する（`"TRUE"` は偽）。
pub fn coerce_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// 数値らしき値を有限の `f64` へ揃える。解釈できない値と非有限値は 0。
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_numeric(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// 件数として解釈する。負数は 0、小数は切り捨て。
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_count(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    let n = coerce_number(value);
    if n <= 0.0 {
        0
    } else {
        n.trunc() as u64
    }
}

fn parse_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    // "inf" や "NaN" は f64::from_str が受け付けるが、呼び出し側で 0 に落とす
    trimmed.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_boolean_truthy() {
        assert!(coerce_boolean(&json!(true)));
        assert!(coerce_boolean(&json!("true")));
        assert!(coerce_boolean(&json!("1")));
        assert!(coerce_boolean(&json!(1)));
        assert!(coerce_boolean(&json!(1.0)));
    }

    #[test]
    fn test_coerce_boolean_falsy() {
        assert!(!coerce_boolean(&json!(false)));
        assert!(!coerce_boolean(&json!("false")));
        assert!(!coerce_boolean(&json!("TRUE")));
        assert!(!coerce_boolean(&json!("yes")));
        assert!(!coerce_boolean(&json!(0)));
        assert!(!coerce_boolean(&json!(2)));
        assert!(!coerce_boolean(&Value::Null));
        assert!(!coerce_boolean(&json!({"value": true})));
        assert!(!coerce_boolean(&json!([true])));
    }

    #[test]
    fn test_coerce_boolean_idempotent() {
        let inputs = [
            json!(true),
            json!("true"),
            json!("TRUE"),
            json!("1"),
            json!(1),
            json!(0),
            Value::Null,
            json!("x"),
        ];
        for input in inputs {
            let once = coerce_boolean(&input);
            assert_eq!(coerce_boolean(&Value::Bool(once)), once, "input: {input}");
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!("abc")), 0.0);
        assert_eq!(coerce_number(&json!("3.5")), 3.5);
        assert_eq!(coerce_number(&json!(" 7 ")), 7.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert_eq!(coerce_number(&json!(false)), 0.0);
        assert_eq!(coerce_number(&json!(-12)), -12.0);
        assert_eq!(coerce_number(&Value::Null), 0.0);
        assert_eq!(coerce_number(&json!([1])), 0.0);
    }

    #[test]
    fn test_coerce_number_non_finite() {
        assert_eq!(coerce_number(&json!("inf")), 0.0);
        assert_eq!(coerce_number(&json!("NaN")), 0.0);
        assert_eq!(coerce_number(&json!("1e400")), 0.0);
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(&json!(42)), 42);
        assert_eq!(coerce_count(&json!("42")), 42);
        assert_eq!(coerce_count(&json!(-3)), 0);
        assert_eq!(coerce_count(&json!(2.9)), 2);
        assert_eq!(coerce_count(&json!("x")), 0);
    }
}

use serde_json::Value;

use crate::coerce::coerce_count;
use crate::page::PaginatedResponse;

/// 汎用の配列プロパティ名。候補キーがすべて外れたときに参照する。
const GENERIC_DATA_KEY: &str = "data";

/// 非ページング一覧の既定候補キー。
pub const DEFAULT_LIST_KEYS: &[&str] = &[GENERIC_DATA_KEY];

/// 任意形状のレスポンスを `{data, total}` へ正規化する。
///
/// 1. レスポンス自体が配列なら、それを全件とし `total = len`。
/// 2. 候補キーを順に走査し、最初に配列を値に持つプロパティを `data` とする。
/// 3. どれも該当しなければ `data` プロパティの配列、それもなければ空。
/// 4. `total` は `pagination.total_count` があればそれ、なければ `data.len()`。
///
/// 入力は変更せず、どんな値でもパニックしない。
pub fn normalize_paginated(response: &Value, keys: &[&str]) -> PaginatedResponse<Value> {
    if let Value::Array(items) = response {
        return PaginatedResponse::new(items.clone(), items.len() as u64);
    }

    let data = scan(response, keys)
        .or_else(|| array_at(response, GENERIC_DATA_KEY))
        .map(<[Value]>::to_vec)
        .unwrap_or_default();

    let total = response
        .get("pagination")
        .and_then(|pagination| pagination.get("total_count"))
        .filter(|count| !count.is_null())
        .map_or(data.len() as u64, coerce_count);

    PaginatedResponse::new(data, total)
}

/// 非ページングのカタログ（ロール・権限など）を配列へ正規化する。
///
/// 走査順は [`normalize_paginated`] と同じで、ページング情報は読まない。
pub fn normalize_list(response: &Value, keys: &[&str]) -> Vec<Value> {
    match response {
        Value::Array(items) => items.clone(),
        Value::Object(_) => scan(response, keys)
            .or_else(|| array_at(response, GENERIC_DATA_KEY))
            .map(<[Value]>::to_vec)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn scan<'a>(response: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    keys.iter().find_map(|key| array_at(response, key))
}

fn array_at<'a>(response: &'a Value, key: &str) -> Option<&'a [Value]> {
    response.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let raw = json!([{"id": "a"}, {"id": "b"}]);
        let page = normalize_paginated(&raw, &["workers"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.data, raw.as_array().unwrap().clone());
    }

    #[test]
    fn test_first_array_key_wins() {
        let raw = json!({
            "audit_logs": "not-an-array",
            "auditLogs": [{"id": 1}],
            "data": [{"id": 2}, {"id": 3}]
        });
        let page = normalize_paginated(&raw, &["audit_logs", "auditLogs", "data"]);
        assert_eq!(page.data, vec![json!({"id": 1})]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_total_from_pagination() {
        let raw = json!({
            "pagination": {"total_count": 42},
            "workers": [{"id": 1}, {"id": 2}, {"id": 3}]
        });
        let page = normalize_paginated(&raw, &["workers"]);
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.total, 42);
    }

    #[test]
    fn test_null_total_count_falls_back_to_len() {
        let raw = json!({
            "pagination": {"total_count": null},
            "workers": [{"id": 1}]
        });
        assert_eq!(normalize_paginated(&raw, &["workers"]).total, 1);
    }

    #[test]
    fn test_generic_data_fallback() {
        let raw = json!({"data": [{"id": 9}], "pagination": {"total_count": "15"}});
        let page = normalize_paginated(&raw, &["workplaces"]);
        assert_eq!(page.data, vec![json!({"id": 9})]);
        assert_eq!(page.total, 15);
    }

    #[test]
    fn test_matched_empty_array_is_kept() {
        let raw = json!({"workers": [], "data": [{"id": 1}]});
        let page = normalize_paginated(&raw, &["workers"]);
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_absent_keys_give_empty_page() {
        assert_eq!(
            normalize_paginated(&json!({}), &["x", "y"]),
            PaginatedResponse::empty()
        );
        assert_eq!(
            normalize_paginated(&Value::Null, &["x"]),
            PaginatedResponse::empty()
        );
        assert_eq!(
            normalize_paginated(&json!("oops"), &[]),
            PaginatedResponse::empty()
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let raw = json!({"workers": [{"id": 1}], "pagination": {"total_count": 5}});
        let before = raw.clone();
        let _ = normalize_paginated(&raw, &["workers"]);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_normalize_list() {
        let raw = json!({"roles": [{"id": 1}], "data": [{"id": 2}]});
        assert_eq!(normalize_list(&raw, &["roles", "data"]), vec![json!({"id": 1})]);
        assert_eq!(normalize_list(&raw, DEFAULT_LIST_KEYS), vec![json!({"id": 2})]);
        assert_eq!(normalize_list(&json!([1, 2]), &["roles"]).len(), 2);
        assert!(normalize_list(&json!(7), &["roles"]).is_empty());
        assert!(normalize_list(&json!({"roles": {}}), &["roles"]).is_empty());
    }
}

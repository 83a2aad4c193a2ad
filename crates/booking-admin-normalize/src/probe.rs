//! 候補キーの優先順リストでフィールドを探すヘルパー群。
//!
//! バックエンドは同じ論理属性を別名で返すことがある（`title` と `name`、
//! `phone` と `phone_number` など）。アダプタはここの関数で最初に見つかった
//! 空でない値を採用する。

use serde_json::Value;

use crate::coerce::{coerce_boolean, coerce_count};

/// 表示名として一段だけ掘り下げるネストオブジェクトのキー。
const NESTED_DISPLAY_KEYS: &[&str] = &["full_name", "name", "title", "email"];

/// 表示用フィールドが見つからないときのプレースホルダ。
pub const MISSING_DISPLAY: &str = "-";

/// 文字列なら空白除去後に空でないもの、数値なら10進表記を返す。
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 候補キーを順に調べ、最初の空でないスカラー値を文字列で返す。
pub fn first_string(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(key))
        .find_map(scalar_text)
}

/// [`first_string`] の結果がなければ空文字列。
pub fn optional_string(obj: &Value, keys: &[&str]) -> String {
    first_string(obj, keys).unwrap_or_default()
}

/// ドット区切りではなくキー列でネストした値を辿る。
pub fn nested<'a>(obj: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(obj, |current, key| current.get(key))
}

/// 値を表示用文字列にする。オブジェクトなら `full_name` / `name` / `title` / `email` を探す。
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => first_string(value, NESTED_DISPLAY_KEYS),
        other => scalar_text(other),
    }
}

/// 候補キーを順に [`display_value`] で評価する。見つからなければ `"-"`。
pub fn display_field(obj: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| obj.get(key))
        .find_map(display_value)
        .unwrap_or_else(|| MISSING_DISPLAY.to_string())
}

/// 欠落・null なら `None`、それ以外は真偽値へ変換する。
pub fn optional_bool(obj: &Value, key: &str) -> Option<bool> {
    obj.get(key)
        .filter(|value| !value.is_null())
        .map(coerce_boolean)
}

/// 欠落・null なら `None`、それ以外は件数として解釈する。
pub fn optional_count(obj: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| obj.get(key))
        .find(|value| !value.is_null())
        .map(coerce_count)
}

/// 不透明な id を文字列にする。文字列はそのまま、数値は10進表記、それ以外は空。
pub fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

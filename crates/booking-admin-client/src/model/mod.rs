//! 管理 API のエンティティと、生 JSON からのアダプタ。
//!
//! アダプタ (`to_*`) は各論理属性を候補キーの優先順で探し、
//! 見つからない・壊れている値は空文字列 / 0 / false / `None` に落とす。

pub mod account;
pub mod admin;
pub mod catalog;
pub mod identity;
pub mod people;
pub mod permission;
pub mod scheduling;
pub mod stats;
pub mod workplace;

use std::fmt::Display;

use booking_admin_normalize::PaginationParams;
use serde::Serialize;

pub use account::*;
pub use admin::*;
pub use catalog::*;
pub use identity::*;
pub use people::*;
pub use permission::*;
pub use scheduling::*;
pub use stats::*;
pub use workplace::*;

/// 一覧エンドポイントのクエリ。シリアライズ結果はキャッシュキーにも使う。
pub trait ListQuery: Serialize {
    fn to_query(&self) -> Vec<(&'static str, String)>;
}

impl ListQuery for PaginationParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        PaginationParams::to_query(self)
    }
}

/// 値があるときだけクエリに追加する。
pub(crate) fn push_opt<T: Display>(
    query: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&T>,
) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

/// 空白のみの文字列フィルタは送らない。
pub(crate) fn push_text(
    query: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<&String>,
) {
    if let Some(value) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        query.push((key, value.to_string()));
    }
}

/// 必須の名前項目を trim して検査する。
pub(crate) fn required_trimmed(
    field: &str,
    value: &str,
) -> Result<String, crate::error::AdminError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AdminError::Validation(format!(
            "{field} is required"
        )));
    }
    Ok(trimmed.to_string())
}

/// 任意の文字列項目を trim し、空なら `None` にする。
pub(crate) fn trimmed_opt(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

//! 管理 API が返す形の揃わない JSON を、一覧画面が扱う固定の形へ正規化する。
//!
//! バックエンドはエンドポイントごとに配列そのもの・`{<複数形>: [...]}`・
//! `{data: [...], pagination: {...}}` のいずれかを返し、真偽値や数値の
//! エンコードも揃っていない。このクレートはそれらを例外なく
//! [`PaginatedResponse`] と素朴なスカラー値へ落とし込む。

pub mod coerce;
pub mod normalize;
pub mod page;
pub mod probe;

pub use coerce::{coerce_boolean, coerce_count, coerce_number};
pub use normalize::{normalize_list, normalize_paginated, DEFAULT_LIST_KEYS};
pub use page::{ApiPagination, PaginatedResponse, PaginationParams};
pub use probe::{
    display_field, display_value, first_string, id_string, nested, optional_bool,
    optional_count, optional_string,
};

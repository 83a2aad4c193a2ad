use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{coerce_boolean, coerce_count};

/// 一覧画面が扱う正規化済みのページ。
///
/// `total` はサーバーが報告した件数であり、部分ページでは `data.len()` と一致しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    /// 要素型を変換する。`total` はそのまま引き継ぐ。
    pub fn map<U, F>(self, f: F) -> PaginatedResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// `limit` 件ずつ表示したときの総ページ数。
    pub fn total_pages(&self, limit: u32) -> u64 {
        if limit == 0 {
            0
        } else {
            self.total.div_ceil(u64::from(limit))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// バックエンドが返す生のページング情報。`total_count` 以外は参照用。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiPagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl ApiPagination {
    /// 型の揃わない `pagination` オブジェクトを読み取る。オブジェクトでなければ `None`。
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let count = |key: &str| obj.get(key).map_or(0, coerce_count);
        let flag = |key: &str| obj.get(key).is_some_and(coerce_boolean);
        Some(Self {
            current_page: count("current_page"),
            total_pages: count("total_pages"),
            total_count: count("total_count"),
            limit: count("limit"),
            has_next: flag("has_next"),
            has_prev: flag("has_prev"),
        })
    }
}

/// 一覧エンドポイント共通のクエリパラメータ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// クエリ文字列のペアへ変換する。未指定の値と空の検索語は送らない。
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                query.push(("search", search.to_string()));
            }
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_pages() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 25);
        assert_eq!(page.total_pages(10), 3);
        assert_eq!(page.total_pages(5), 5);
        assert_eq!(page.total_pages(0), 0);
    }

    #[test]
    fn test_map_keeps_total() {
        let page = PaginatedResponse::new(vec![1, 2], 40);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.data, vec![10, 20]);
        assert_eq!(mapped.total, 40);
    }

    #[test]
    fn test_api_pagination_lenient() {
        let raw = json!({
            "current_page": "2",
            "total_pages": 5,
            "total_count": "42",
            "limit": 10,
            "has_next": "true",
            "has_prev": 1
        });
        let pagination = ApiPagination::from_value(&raw).unwrap();
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_count, 42);
        assert!(pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[test]
    fn test_api_pagination_not_object() {
        assert!(ApiPagination::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_params_to_query_skips_blank_search() {
        let params = PaginationParams::new().page(1).limit(20).search("   ");
        assert_eq!(
            params.to_query(),
            vec![("page", "1".to_string()), ("limit", "20".to_string())]
        );
    }

    #[test]
    fn test_params_to_query_trims_search() {
        let params = PaginationParams::new().search("  ayşe ");
        assert_eq!(params.to_query(), vec![("search", "ayşe".to_string())]);
    }
}

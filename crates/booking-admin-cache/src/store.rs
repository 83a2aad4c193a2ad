use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::tag::CacheTag;
use crate::CacheError;

/// 未使用のクエリ結果を保持する既定期間。
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct Entry {
    value: Value,
    tags: Vec<CacheTag>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp <= Instant::now())
    }

    fn matches_any(&self, tags: &[CacheTag]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// 無効化のたびに進む世代番号。
    epoch: u64,
}

/// 取得開始時点の世代を覚えておく引換券。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: String,
    epoch: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// クエリキーごとに正規化済み JSON を保持し、タグ単位で無効化するキャッシュ。
///
/// 取得中に無効化が起きた結果は書き込まない。無効化された世代の結果で
/// キャッシュを上書きしないためで、呼び出し側は次回の読み取りで再取得する。
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<RwLock<Inner>>,
    ttl: Option<Duration>,
}

impl QueryCache {
    /// `ttl` が `None` のエントリは無効化されるまで残る。
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let inner = self.inner.read().await;
        match inner.entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            _ => None,
        }
    }

    pub async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get(key).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        let inner = self.inner.read().await;
        inner.entries.get(key).is_some_and(|e| !e.is_expired())
    }

    /// 取得を開始する。返した券を [`QueryCache::complete`] に渡して結果を保存する。
    pub async fn begin(&self, key: impl Into<String>) -> FetchTicket {
        let inner = self.inner.read().await;
        FetchTicket {
            key: key.into(),
            epoch: inner.epoch,
        }
    }

    /// 取得結果を保存する。開始後に無効化があった場合は保存せず `false` を返す。
    ///
    /// 保存のついでに期限切れのエントリを取り除く。
    pub async fn complete(&self, ticket: FetchTicket, value: Value, tags: Vec<CacheTag>) -> bool {
        let mut inner = self.inner.write().await;
        if inner.epoch != ticket.epoch {
            debug!(key = %ticket.key, "無効化後に完了した取得結果を破棄");
            return false;
        }
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired());
        let swept = before - inner.entries.len();
        if swept > 0 {
            debug!(swept = swept, "期限切れエントリを掃除");
        }
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        inner.entries.insert(
            ticket.key,
            Entry {
                value,
                tags,
                expires_at,
            },
        );
        true
    }

    pub async fn complete_typed<T: Serialize>(
        &self,
        ticket: FetchTicket,
        value: &T,
        tags: Vec<CacheTag>,
    ) -> Result<bool, CacheError> {
        let value = serde_json::to_value(value)?;
        Ok(self.complete(ticket, value, tags).await)
    }

    /// 指定タグのいずれかを提供するエントリを削除し、削除件数を返す。
    pub async fn invalidate(&self, tags: &[CacheTag]) -> usize {
        if tags.is_empty() {
            return 0;
        }
        let mut inner = self.inner.write().await;
        inner.epoch += 1;
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, entry| !entry.is_expired() && !entry.matches_any(tags));
        let removed = before - inner.entries.len();
        debug!(
            tags = tags.len(),
            removed = removed,
            epoch = inner.epoch,
            "キャッシュを無効化"
        );
        removed
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.epoch += 1;
        inner.entries.clear();
    }

    /// 期限切れでないエントリ数。
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.entries.values().filter(|e| !e.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TTL))
    }
}

/// エンドポイント名とパラメータからクエリキーを作る。
///
/// パラメータが変わればキーも変わり、古いパラメータの結果と混ざらない。
pub fn query_key<P: Serialize + ?Sized>(endpoint: &str, params: &P) -> Result<String, CacheError> {
    let params = serde_json::to_string(params)?;
    Ok(format!("{endpoint}?{params}"))
}

//! 管理 API のエンドポイント。
//!
//! 取得系はクエリキャッシュを経由し、変更系は成功したときだけ
//! [`Mutation::invalidates`] の表に従ってキャッシュを無効化する。

mod accounts;
mod admin;
mod catalog;
mod identity;
mod insights;
mod people;
mod permissions;
mod scheduling;
mod workplaces;

use std::sync::Arc;

use booking_admin_cache::{provided_tags, query_key, CacheTag, Mutation, QueryCache, TagType};
use booking_admin_normalize::{normalize_list, normalize_paginated, PaginatedResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{validate, AdminClientConfig};
use crate::error::AdminError;
use crate::model::{
    AdminUser, Appointment, AppointmentCancellation, AuditLog, BlockedTime, CancellationReason,
    Customer, FirebaseIdp, Industry, IndustryService, ListQuery, Permission, Reminder, Role,
    Service, Subscription, Worker, Workplace,
};
use crate::transport::{AdminTransport, ApiRequest, HttpTransport};

/// キャッシュタグを提供する一覧要素。
pub trait CachedEntity {
    const TAG: TagType;

    fn cache_id(&self) -> &str;
}

macro_rules! cached_entity {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl CachedEntity for $ty {
                const TAG: TagType = TagType::$tag;

                fn cache_id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

cached_entity! {
    Customer => Users,
    Workplace => Workplaces,
    Worker => Workers,
    Appointment => Appointments,
    Industry => Industries,
    Service => Services,
    IndustryService => IndustryServices,
    Permission => Permissions,
    Role => Roles,
    AuditLog => AuditLogs,
    Subscription => Subscriptions,
    BlockedTime => BlockedTimes,
    Reminder => Reminders,
    CancellationReason => CancellationReasons,
    AppointmentCancellation => AppointmentCancellations,
    AdminUser => Admins,
    FirebaseIdp => FirebaseIdp,
}

fn entity_tags<T: CachedEntity>(items: &[T]) -> Vec<CacheTag> {
    provided_tags(
        T::TAG,
        items
            .iter()
            .map(CachedEntity::cache_id)
            .filter(|id| !id.is_empty())
            .map(str::to_string),
    )
}

/// 変更系のレスポンス本文から単一レコードを取り出す。
///
/// `{<単数形>: {...}}` や `{data: {...}}` で包まれていれば中身を、そうでなければ本文そのものを返す。
fn unwrap_record<'a>(response: &'a Value, key: &str) -> &'a Value {
    [key, "data"]
        .iter()
        .find_map(|k| response.get(k).filter(|v| v.is_object()))
        .unwrap_or(response)
}

/// 管理コンソールの REST クライアント。
///
/// `Clone` は送信口とキャッシュを共有する。
#[derive(Clone)]
pub struct AdminClient {
    transport: Arc<dyn AdminTransport>,
    cache: QueryCache,
}

impl AdminClient {
    /// 設定を検証し、HTTP 送信口とキャッシュを組み立てる。
    pub fn new(config: &AdminClientConfig) -> Result<Self, AdminError> {
        validate(config)?;
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            Arc::new(transport),
            QueryCache::new(config.cache_ttl_duration()),
        ))
    }

    pub fn with_transport(transport: Arc<dyn AdminTransport>, cache: QueryCache) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// キャッシュを確認し、なければ送信して `decode` の結果を保存する。
    async fn query<P, T, F>(
        &self,
        endpoint: &str,
        params: &P,
        request: ApiRequest,
        decode: F,
    ) -> Result<T, AdminError>
    where
        P: Serialize + ?Sized + Sync,
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce(&Value) -> (T, Vec<CacheTag>) + Send,
    {
        let key = query_key(endpoint, params)?;
        if let Some(hit) = self.cache.get_typed::<T>(&key).await? {
            debug!(key = %key, "キャッシュヒット");
            return Ok(hit);
        }

        let ticket = self.cache.begin(key).await;
        let raw = self.transport.send(request).await?;
        let (value, tags) = decode(&raw);
        self.cache.complete_typed(ticket, &value, tags).await?;
        Ok(value)
    }

    /// ページング一覧を取得して正規化する。
    async fn query_page<P, T, A>(
        &self,
        endpoint: &str,
        path: &str,
        params: &P,
        keys: &[&str],
        adapt: A,
    ) -> Result<PaginatedResponse<T>, AdminError>
    where
        P: ListQuery + Sync,
        T: CachedEntity + Serialize + DeserializeOwned + Send,
        A: Fn(&Value) -> T + Send + Sync,
    {
        let request = ApiRequest::get(path).query(params.to_query());
        self.query(endpoint, params, request, |raw| {
            let page = normalize_paginated(raw, keys).map(|item| adapt(&item));
            let tags = entity_tags(&page.data);
            (page, tags)
        })
        .await
    }

    /// ページングしないカタログを取得して正規化する。
    async fn query_list<T, A>(
        &self,
        endpoint: &str,
        path: &str,
        keys: &[&str],
        adapt: A,
        tags: impl FnOnce(&[T]) -> Vec<CacheTag> + Send,
    ) -> Result<Vec<T>, AdminError>
    where
        T: Serialize + DeserializeOwned + Send,
        A: Fn(&Value) -> T + Send,
    {
        self.query(endpoint, &(), ApiRequest::get(path), |raw| {
            let items: Vec<T> = normalize_list(raw, keys).iter().map(adapt).collect();
            let provided = tags(&items);
            (items, provided)
        })
        .await
    }

    /// 変更を送信し、成功したときだけ対応するタグを無効化する。
    async fn mutate(&self, mutation: Mutation, request: ApiRequest) -> Result<Value, AdminError> {
        let response = self.transport.send(request).await?;
        let tags = mutation.invalidates();
        let removed = self.cache.invalidate(&tags).await;
        info!(
            mutation = ?mutation,
            tags = %tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            removed = removed,
            "変更を反映しキャッシュを無効化"
        );
        Ok(response)
    }

    /// 本文付きの変更。リクエスト型をそのまま JSON 本文にする。
    async fn mutate_with<B: Serialize + Sync>(
        &self,
        mutation: Mutation,
        build: impl FnOnce(Value) -> ApiRequest + Send,
        body: &B,
    ) -> Result<Value, AdminError> {
        let body = serde_json::to_value(body)?;
        self.mutate(mutation, build(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_record() {
        let wrapped = json!({"worker": {"id": 1}, "message": "ok"});
        assert_eq!(unwrap_record(&wrapped, "worker"), &json!({"id": 1}));

        let data = json!({"data": {"id": 2}});
        assert_eq!(unwrap_record(&data, "worker"), &json!({"id": 2}));

        let plain = json!({"id": 3, "data": [1, 2]});
        assert_eq!(unwrap_record(&plain, "worker"), &plain);
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        for base_url in ["", "ftp://admin.example.com"] {
            let result = AdminClient::new(&AdminClientConfig::new(base_url));
            assert!(
                matches!(result, Err(AdminError::Config(_))),
                "{base_url:?} should be rejected"
            );
        }
        assert!(AdminClient::new(&AdminClientConfig::new("http://localhost:8080")).is_ok());
    }

    #[test]
    fn test_entity_tags_skip_blank_ids() {
        let roles = vec![
            Role {
                id: "1".into(),
                ..Default::default()
            },
            Role::default(),
        ];
        let tags: Vec<String> = entity_tags(&roles).iter().map(ToString::to_string).collect();
        assert_eq!(tags, vec!["Roles:1", "Roles:LIST"]);
    }
}

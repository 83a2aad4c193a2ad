use std::fmt;

use serde::{Deserialize, Serialize};

/// キャッシュタグの種別。管理 API のコレクション単位で分かれる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    Users,
    Workplaces,
    Workers,
    Appointments,
    Industries,
    Services,
    IndustryServices,
    Permissions,
    Roles,
    WorkerPermissions,
    AuditLogs,
    Subscriptions,
    BlockedTimes,
    Reminders,
    CancellationReasons,
    AppointmentCancellations,
    Config,
    Admins,
    AdminMe,
    FirebaseIdp,
    Dashboard,
    SystemStats,
    SystemHealth,
}

/// タグの対象。コレクション全体 (`LIST`)、自分自身 (`ME`)、集計画面 (`MAIN`)、個別 id。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagId {
    List,
    Me,
    Main,
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheTag {
    pub kind: TagType,
    pub id: TagId,
}

impl CacheTag {
    pub fn list(kind: TagType) -> Self {
        Self {
            kind,
            id: TagId::List,
        }
    }

    pub fn me(kind: TagType) -> Self {
        Self { kind, id: TagId::Me }
    }

    /// ダッシュボードのように 1 画面 1 結果の集計に付けるタグ。
    pub fn main(kind: TagType) -> Self {
        Self {
            kind,
            id: TagId::Main,
        }
    }

    pub fn entity(kind: TagType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: TagId::Id(id.into()),
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            TagId::List => write!(f, "{:?}:LIST", self.kind),
            TagId::Me => write!(f, "{:?}:ME", self.kind),
            TagId::Main => write!(f, "{:?}:MAIN", self.kind),
            TagId::Id(id) => write!(f, "{:?}:{id}", self.kind),
        }
    }
}

/// 一覧クエリが提供するタグ。レコードごとの id タグと `LIST` タグ。
pub fn provided_tags<I, S>(kind: TagType, ids: I) -> Vec<CacheTag>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tags: Vec<CacheTag> = ids
        .into_iter()
        .map(|id| CacheTag::entity(kind, id))
        .collect();
    tags.push(CacheTag::list(kind));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_tags_appends_list() {
        let tags = provided_tags(TagType::Workers, ["w1", "w2"]);
        assert_eq!(
            tags,
            vec![
                CacheTag::entity(TagType::Workers, "w1"),
                CacheTag::entity(TagType::Workers, "w2"),
                CacheTag::list(TagType::Workers),
            ]
        );
    }

    #[test]
    fn test_provided_tags_empty_result() {
        let tags = provided_tags(TagType::Roles, Vec::<String>::new());
        assert_eq!(tags, vec![CacheTag::list(TagType::Roles)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(CacheTag::list(TagType::Roles).to_string(), "Roles:LIST");
        assert_eq!(CacheTag::me(TagType::Permissions).to_string(), "Permissions:ME");
        assert_eq!(CacheTag::entity(TagType::Roles, "3").to_string(), "Roles:3");
        assert_eq!(CacheTag::main(TagType::Dashboard).to_string(), "Dashboard:MAIN");
    }
}

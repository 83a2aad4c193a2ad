//! 変更系エンドポイントと、それが無効化するキャッシュタグの対応表。
//!
//! 個別 id を持つ更新は `<種別>:<id>` と `<種別>:LIST` を、作成と削除は
//! `<種別>:LIST` のみを無効化する。例外は各行に明記する。
//! 認証やレシート検証のようにキャッシュ済みの一覧を変えない呼び出しは空を返す。

use serde::{Deserialize, Serialize};

use crate::tag::{CacheTag, TagType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    UpdateUser { id: String },
    DeleteUser,

    CreateWorkplace,
    UpdateWorkplace { id: String },
    DeleteWorkplace,

    CreateWorker,
    UpdateWorker { id: String },
    DeleteWorker,
    AssignWorkerService { worker_id: String },
    RemoveWorkerService { worker_id: String },

    CreateIndustry,
    UpdateIndustry { id: String },
    DeleteIndustry,

    CreateService,
    UpdateService { id: String },
    DeleteService,

    CreateIndustryService,
    DeleteIndustryService,

    CreateRole,
    UpdateRole { role_id: String },
    UpdateRolePermissions { role_id: String },
    CreatePermission,
    UpdatePermission { id: String },
    UpdateWorkerRole { worker_id: String },
    UpdateWorkerOverrides { worker_id: String },

    UpdateSubscription { id: String },

    CreateBlockedTime,
    UpdateBlockedTime { id: String },
    DeleteBlockedTime,

    CreateReminder,
    UpdateReminder { id: String },
    DeleteReminder,

    CreateCancellationReason,
    UpdateCancellationReason { id: String },
    DeleteCancellationReason,

    UpdateAppointmentCancellation { id: String },
    DeleteAppointmentCancellation,

    UpdateConfig,

    UpdateAdmin { id: String },
    ResetAdminPassword,
    DeleteAdmin,
    AdminLogin,
    AdminRegister,

    CreateFirebaseIdp,
    UpdateFirebaseIdp { id: String },

    VerifyAppleBatch,
}

fn entity_and_list(kind: TagType, id: &str) -> Vec<CacheTag> {
    vec![CacheTag::entity(kind, id), CacheTag::list(kind)]
}

impl Mutation {
    /// この変更が成功したときに無効化するタグ。
    pub fn invalidates(&self) -> Vec<CacheTag> {
        use crate::invalidation::Mutation as M;
        use crate::tag::TagType as T;

        match self {
            M::UpdateUser { id } => entity_and_list(T::Users, id),
            M::DeleteUser => vec![CacheTag::list(T::Users)],

            M::CreateWorkplace | M::DeleteWorkplace => vec![CacheTag::list(T::Workplaces)],
            M::UpdateWorkplace { id } => entity_and_list(T::Workplaces, id),

            M::CreateWorker | M::DeleteWorker => vec![CacheTag::list(T::Workers)],
            M::UpdateWorker { id } => entity_and_list(T::Workers, id),
            // 担当サービスの付け外しは一覧の並びに影響しない
            M::AssignWorkerService { worker_id } | M::RemoveWorkerService { worker_id } => {
                vec![CacheTag::entity(T::Workers, worker_id)]
            }

            M::CreateIndustry | M::DeleteIndustry => vec![CacheTag::list(T::Industries)],
            M::UpdateIndustry { id } => entity_and_list(T::Industries, id),

            M::CreateService | M::DeleteService => vec![CacheTag::list(T::Services)],
            M::UpdateService { id } => entity_and_list(T::Services, id),

            M::CreateIndustryService | M::DeleteIndustryService => {
                vec![CacheTag::list(T::IndustryServices)]
            }

            M::CreateRole => vec![CacheTag::list(T::Roles)],
            M::UpdateRole { role_id } | M::UpdateRolePermissions { role_id } => {
                entity_and_list(T::Roles, role_id)
            }
            M::CreatePermission => vec![CacheTag::list(T::Permissions)],
            M::UpdatePermission { id } => entity_and_list(T::Permissions, id),
            M::UpdateWorkerRole { worker_id } => vec![
                CacheTag::entity(T::WorkerPermissions, worker_id),
                CacheTag::entity(T::Workers, worker_id),
            ],
            M::UpdateWorkerOverrides { worker_id } => {
                vec![CacheTag::entity(T::WorkerPermissions, worker_id)]
            }

            M::UpdateSubscription { id } => entity_and_list(T::Subscriptions, id),

            M::CreateBlockedTime | M::DeleteBlockedTime => vec![CacheTag::list(T::BlockedTimes)],
            M::UpdateBlockedTime { id } => entity_and_list(T::BlockedTimes, id),

            M::CreateReminder | M::DeleteReminder => vec![CacheTag::list(T::Reminders)],
            M::UpdateReminder { id } => entity_and_list(T::Reminders, id),

            M::CreateCancellationReason | M::DeleteCancellationReason => {
                vec![CacheTag::list(T::CancellationReasons)]
            }
            M::UpdateCancellationReason { id } => entity_and_list(T::CancellationReasons, id),

            M::UpdateAppointmentCancellation { id } => {
                entity_and_list(T::AppointmentCancellations, id)
            }
            M::DeleteAppointmentCancellation => vec![CacheTag::list(T::AppointmentCancellations)],

            M::UpdateConfig => vec![CacheTag::list(T::Config)],

            M::UpdateAdmin { id } => entity_and_list(T::Admins, id),
            M::DeleteAdmin => vec![CacheTag::list(T::Admins)],
            M::ResetAdminPassword | M::AdminLogin | M::AdminRegister => Vec::new(),

            M::CreateFirebaseIdp => vec![CacheTag::list(T::FirebaseIdp)],
            M::UpdateFirebaseIdp { id } => entity_and_list(T::FirebaseIdp, id),

            M::VerifyAppleBatch => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions_invalidate_detail_and_list() {
        let tags = Mutation::UpdateRolePermissions {
            role_id: "7".into(),
        }
        .invalidates();
        assert_eq!(
            tags,
            vec![
                CacheTag::entity(TagType::Roles, "7"),
                CacheTag::list(TagType::Roles)
            ]
        );
    }

    #[test]
    fn test_worker_role_touches_worker_and_permissions() {
        let tags = Mutation::UpdateWorkerRole {
            worker_id: "w-1".into(),
        }
        .invalidates();
        assert!(tags.contains(&CacheTag::entity(TagType::WorkerPermissions, "w-1")));
        assert!(tags.contains(&CacheTag::entity(TagType::Workers, "w-1")));
        assert!(!tags.contains(&CacheTag::list(TagType::Workers)));
    }

    #[test]
    fn test_deletes_only_touch_list() {
        for mutation in [
            Mutation::DeleteUser,
            Mutation::DeleteWorker,
            Mutation::DeleteWorkplace,
            Mutation::DeleteService,
            Mutation::DeleteReminder,
        ] {
            let tags = mutation.invalidates();
            assert_eq!(tags.len(), 1, "{mutation:?}");
            assert!(matches!(tags[0].id, crate::tag::TagId::List));
        }
    }

    #[test]
    fn test_auth_and_receipt_calls_invalidate_nothing() {
        for mutation in [
            Mutation::AdminLogin,
            Mutation::AdminRegister,
            Mutation::ResetAdminPassword,
            Mutation::VerifyAppleBatch,
        ] {
            assert!(mutation.invalidates().is_empty(), "{mutation:?}");
        }
    }

    #[test]
    fn test_admin_and_idp_updates() {
        assert_eq!(
            Mutation::UpdateAdmin { id: "a1".into() }.invalidates(),
            vec![
                CacheTag::entity(TagType::Admins, "a1"),
                CacheTag::list(TagType::Admins)
            ]
        );
        assert_eq!(
            Mutation::CreateFirebaseIdp.invalidates(),
            vec![CacheTag::list(TagType::FirebaseIdp)]
        );
    }

    #[test]
    fn test_permission_create_does_not_touch_roles() {
        let tags = Mutation::CreatePermission.invalidates();
        assert!(tags.iter().all(|t| t.kind == TagType::Permissions));
    }
}

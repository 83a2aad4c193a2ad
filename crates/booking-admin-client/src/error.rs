use thiserror::Error;

use booking_admin_cache::CacheError;

use crate::config::ConfigError;

/// 管理 API クライアントのエラー型。
///
/// レスポンスの形の不一致はここに現れない。正規化層が既定値へ吸収する。
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("見つかりません: {0}")]
    NotFound(String),
    #[error("タイムアウト: {0}")]
    Timeout(String),
    #[error("入力エラー: {0}")]
    Validation(String),
    #[error("ロールが選択されていません")]
    NoRoleSelected,
    #[error("ロール詳細が未取得のため権限を変更できません: {0}")]
    RoleNotLoaded(String),
    #[error("設定エラー: {0}")]
    Config(#[from] ConfigError),
    #[error("キャッシュエラー: {0}")]
    Cache(#[from] CacheError),
    #[error("シリアライズエラー: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdminError {
    /// 利用者の再試行で回復しうるエラーかどうか。
    pub fn is_retryable(&self) -> bool {
        match self {
            AdminError::Http(_) | AdminError::Timeout(_) => true,
            AdminError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("シリアライズエラー: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! 構造化ログの初期化。
//! tracing クレートを使用し、JSON またはテキスト形式で出力する。
//!
//! ```ignore
//! booking_admin_client::logging::init_logging(&config.log)?;
//! tracing::info!(role_id = "3", "permissions saved");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// tracing-subscriber を初期化する。
///
/// `RUST_LOG` が設定されていればそれを優先し、なければ `log.level` を使う。
/// format が "text" の場合はプレーンテキスト、それ以外は JSON を出力する。
/// 既にグローバル subscriber がある場合はエラーを返す。
pub fn init_logging(log: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(parse_log_level(&log.level).as_str()))?;

    let registry = tracing_subscriber::registry().with(filter);

    if log.format == "text" {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    } else {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()?;
    }
    Ok(())
}

/// ログレベル文字列を tracing の Level に変換する。未知の値は INFO。
pub fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_log_level("WARN"), tracing::Level::WARN);
        assert_eq!(parse_log_level("verbose"), tracing::Level::INFO);
    }

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        let log = LogConfig::default();
        let _ = init_logging(&log);
        assert!(init_logging(&log).is_err());
    }
}

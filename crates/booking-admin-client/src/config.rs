use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 60;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// `Authorization: Bearer` に載せるトークン。保管は呼び出し側の責務。
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// 0 は期限なし（無効化されるまで保持）。
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AdminClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                token: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            cache: CacheConfig::default(),
            log: LogConfig::default(),
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.api.token = Some(SecretString::new(token.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.api.timeout_secs = timeout.as_secs();
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl_secs = ttl.as_secs();
        self
    }

    /// 末尾の `/` を除いたベース URL。
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn cache_ttl_duration(&self) -> Option<Duration> {
        match self.cache.ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// YAML を読み込み設定を返す。env_path があればマージする。
pub fn load(base_path: &str, env_path: Option<&str>) -> Result<AdminClientConfig, ConfigError> {
    let base = std::fs::read_to_string(base_path)?;
    let mut base_value: serde_yaml::Value = serde_yaml::from_str(&base)?;

    if let Some(env) = env_path {
        let env_data = std::fs::read_to_string(env)?;
        let env_value: serde_yaml::Value = serde_yaml::from_str(&env_data)?;
        merge_yaml(&mut base_value, &env_value);
    }

    Ok(serde_yaml::from_value(base_value)?)
}

/// 設定値のバリデーション。
pub fn validate(config: &AdminClientConfig) -> Result<(), ConfigError> {
    let base_url = config.base_url();
    if base_url.is_empty() {
        return Err(ConfigError::Validation("api.base_url is required".into()));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::Validation(
            "api.base_url must start with http:// or https://".into(),
        ));
    }
    if config.api.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "api.timeout_secs must be > 0".into(),
        ));
    }
    if !["json", "text"].contains(&config.log.format.as_str()) {
        return Err(ConfigError::Validation(
            "log.format must be json or text".into(),
        ));
    }
    Ok(())
}

/// base YAML Value に overlay YAML Value を再帰的にマージする。
pub fn merge_yaml(base: &mut serde_yaml::Value, overlay: &serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(base_value) = base_map.get_mut(key) {
                    merge_yaml(base_value, value);
                } else {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_CONFIG: &str = r#"
api:
  base_url: "https://admin.example.com/"
"#;

    const FULL_CONFIG: &str = r#"
api:
  base_url: "https://admin.example.com"
  token: "secret-token"
  timeout_secs: 10
cache:
  ttl_secs: 0
log:
  level: debug
  format: text
"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", content).unwrap();
        f
    }

    #[test]
    fn test_load_minimal_uses_defaults() {
        let f = write_temp(MINIMAL_CONFIG);
        let cfg = load(f.path().to_str().unwrap(), None).unwrap();
        assert_eq!(cfg.base_url(), "https://admin.example.com");
        assert!(cfg.api.token.is_none());
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.cache_ttl_duration(), Some(Duration::from_secs(60)));
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.log.format, "json");
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_load_full() {
        let f = write_temp(FULL_CONFIG);
        let cfg = load(f.path().to_str().unwrap(), None).unwrap();
        assert_eq!(
            cfg.api.token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("secret-token")
        );
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.cache_ttl_duration(), None);
        assert_eq!(cfg.log.format, "text");
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let cfg = AdminClientConfig::new("https://admin.example.com").token("s3cr3t");
        assert!(!format!("{:?}", cfg).contains("s3cr3t"));
    }

    #[test]
    fn test_load_file_not_found() {
        let err = load("/nonexistent/admin.yaml", None).unwrap_err();
        assert!(err.to_string().contains("failed to read file"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let f = write_temp("api: [broken");
        assert!(matches!(
            load(f.path().to_str().unwrap(), None),
            Err(ConfigError::ParseYaml(_))
        ));
    }

    #[test]
    fn test_load_with_env_override() {
        let base = write_temp(FULL_CONFIG);
        let env = write_temp(
            r#"
api:
  base_url: "https://staging.example.com"
log:
  level: warn
"#,
        );
        let cfg = load(
            base.path().to_str().unwrap(),
            Some(env.path().to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(cfg.base_url(), "https://staging.example.com");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.log.level, "warn");
        assert_eq!(cfg.log.format, "text");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(validate(&AdminClientConfig::new("")).is_err());
        assert!(validate(&AdminClientConfig::new("ftp://admin.example.com")).is_err());
        assert!(validate(&AdminClientConfig::new("http://localhost").timeout(Duration::ZERO)).is_err());

        let mut cfg = AdminClientConfig::new("http://localhost:8080");
        cfg.log.format = "xml".into();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_builder() {
        let cfg = AdminClientConfig::new("http://localhost:8080")
            .timeout(Duration::from_secs(5))
            .cache_ttl(Duration::from_secs(120));
        assert_eq!(cfg.api.timeout_secs, 5);
        assert_eq!(cfg.cache_ttl_duration(), Some(Duration::from_secs(120)));
    }
}

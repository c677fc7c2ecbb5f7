use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use foodorder_core::mailto::{validate_max_bcc_chars, MailTemplate, DEFAULT_MAX_BCC_CHARS};
use foodorder_core::rules::{validate_stale_days, DEFAULT_STALE_AFTER_DAYS};
use serde::Deserialize;
use thiserror::Error;
pub use url::Url;

const APP_DIR: &str = "foodorder";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub mail: MailConfig,
    pub stale_after_days: i64,
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote gateway; `None` means the local database is used directly.
    pub server_url: Option<Url>,
    pub timeout: Duration,
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub template: MailTemplate,
    pub max_bcc_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub persist: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            },
            client: ClientConfig {
                server_url: None,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                username: None,
            },
            mail: MailConfig {
                template: MailTemplate::default(),
                max_bcc_chars: DEFAULT_MAX_BCC_CHARS,
            },
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            session: SessionConfig { persist: false },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid server.bind value: {0}")]
    InvalidBind(String),
    #[error("invalid client.server_url value: {0}")]
    InvalidServerUrl(String),
    #[error("invalid client.timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid client.username value")]
    InvalidUsername,
    #[error("invalid mail.max_bcc_chars value: {0}")]
    InvalidMaxBccChars(usize),
    #[error("invalid mail.subject value: {0}")]
    InvalidMailSubject(String),
    #[error("invalid orders.stale_after_days value: {0}")]
    InvalidStaleDays(i64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    client: Option<ClientFile>,
    mail: Option<MailFile>,
    orders: Option<OrdersFile>,
    session: Option<SessionFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientFile {
    server_url: Option<String>,
    timeout_secs: Option<u64>,
    username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MailFile {
    subject: Option<String>,
    body: Option<String>,
    max_bcc_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OrdersFile {
    stale_after_days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionFile {
    persist: Option<bool>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(bind) = parsed.server.and_then(|server| server.bind) {
        config.server.bind = parse_bind(&bind)?;
    }

    if let Some(client) = parsed.client {
        if let Some(raw) = client.server_url {
            config.client.server_url = Some(parse_server_url(&raw)?);
        }
        if let Some(secs) = client.timeout_secs {
            if secs == 0 || secs > MAX_TIMEOUT_SECS {
                return Err(ConfigError::InvalidTimeout(secs));
            }
            config.client.timeout = Duration::from_secs(secs);
        }
        if let Some(username) = client.username {
            let trimmed = username.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidUsername);
            }
            config.client.username = Some(trimmed.to_string());
        }
    }

    if let Some(mail) = parsed.mail {
        if let Some(subject) = mail.subject {
            if subject.trim().is_empty() || subject.contains('\n') {
                return Err(ConfigError::InvalidMailSubject(subject));
            }
            config.mail.template.subject = subject;
        }
        if let Some(body) = mail.body {
            config.mail.template.body = body;
        }
        if let Some(max) = mail.max_bcc_chars {
            config.mail.max_bcc_chars =
                validate_max_bcc_chars(max).map_err(|_| ConfigError::InvalidMaxBccChars(max))?;
        }
    }

    if let Some(days) = parsed.orders.and_then(|orders| orders.stale_after_days) {
        config.stale_after_days =
            validate_stale_days(days).map_err(|_| ConfigError::InvalidStaleDays(days))?;
    }

    if let Some(persist) = parsed.session.and_then(|session| session.persist) {
        config.session.persist = persist;
    }

    Ok(config)
}

pub fn parse_bind(raw: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBind(raw.to_string()))
}

pub fn parse_server_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidServerUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidServerUrl(raw.to_string()));
    }
    Ok(url)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, parse_server_url, ClientFile, ConfigError, ConfigFile,
        MailFile, OrdersFile, DEFAULT_BIND,
    };
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn defaults_without_any_section() {
        let merged = merge_config(ConfigFile::default()).expect("merge");
        assert_eq!(merged.server.bind.to_string(), DEFAULT_BIND);
        assert_eq!(merged.client.timeout, Duration::from_secs(10));
        assert_eq!(merged.mail.max_bcc_chars, 1900);
        assert_eq!(merged.stale_after_days, 14);
        assert!(!merged.session.persist);
        assert!(merged.client.server_url.is_none());
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            client: Some(ClientFile {
                server_url: Some("http://food.internal:8080/".to_string()),
                timeout_secs: Some(3),
                username: Some(" omid ".to_string()),
            }),
            mail: Some(MailFile {
                subject: Some("{restaurant} is here".to_string()),
                body: None,
                max_bcc_chars: Some(500),
            }),
            orders: Some(OrdersFile {
                stale_after_days: Some(7),
            }),
            ..ConfigFile::default()
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(
            merged.client.server_url.as_ref().map(|u| u.as_str()),
            Some("http://food.internal:8080/")
        );
        assert_eq!(merged.client.timeout, Duration::from_secs(3));
        assert_eq!(merged.client.username.as_deref(), Some("omid"));
        assert_eq!(merged.mail.template.subject_for("fafa"), "fafa is here");
        assert_eq!(merged.mail.max_bcc_chars, 500);
        assert_eq!(merged.stale_after_days, 7);
    }

    #[test]
    fn merge_config_rejects_bad_values() {
        let parsed = ConfigFile {
            client: Some(ClientFile {
                timeout_secs: Some(0),
                ..ClientFile::default()
            }),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidTimeout(0))
        ));

        let parsed = ConfigFile {
            orders: Some(OrdersFile {
                stale_after_days: Some(-1),
            }),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidStaleDays(-1))
        ));
    }

    #[test]
    fn server_url_must_be_http() {
        assert!(parse_server_url("https://food.example.com").is_ok());
        assert!(parse_server_url("ftp://food.example.com").is_err());
        assert!(parse_server_url("not a url").is_err());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[server]\nbind = \"0.0.0.0:9000\"\n[session]\npersist = true\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.server.bind.port(), 9000);
        assert!(config.session.persist);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        for contents in ["max_meals = 5\n", "[orders]\nmax_meals = 5\n"] {
            fs::write(&path, contents).expect("write config");
            restrict_permissions(&path);

            let err = load_at_path(&path, true).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }), "{contents}");
        }
    }
}

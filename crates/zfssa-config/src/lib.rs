//! Server configuration for zfssa tools.
//!
//! One YAML file per appliance (`ip`, `username`, `password`), loaded once
//! per invocation and translated into the API base URL and basic-auth
//! credentials consumed by `zfssa_api::ApplianceClient`.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use zfssa_api::Credentials;

/// Management API port on the appliance.
pub const API_PORT: u16 = 215;

/// Environment variable consulted when the file carries no password.
pub const PASSWORD_ENV: &str = "ZFSSA_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read server config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error in server config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("server config '{}' must be a mapping with ip, username and password", path.display())]
    NotMapping { path: PathBuf },

    #[error("no password in '{}' and {PASSWORD_ENV} is not set", path.display())]
    NoPassword { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no server config (.yml) found in '{}'", dir.display())]
    NoServers { dir: PathBuf },
}

// ── YAML structs ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    ip: String,
    username: String,
    password: Option<RawPassword>,
}

/// An unquoted `password: 12345` reads as a YAML number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPassword {
    Text(String),
    Number(serde_yaml::Number),
}

impl From<RawPassword> for SecretString {
    fn from(raw: RawPassword) -> Self {
        match raw {
            RawPassword::Text(text) => SecretString::from(text),
            RawPassword::Number(number) => SecretString::from(number.to_string()),
        }
    }
}

/// Appliance address and credentials.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address or hostname of the appliance.
    pub ip: String,
    pub username: String,
    pub password: SecretString,
}

impl ServerConfig {
    /// `https://<ip>:215/api`
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let ip = self.ip.trim();
        if ip.is_empty() {
            return Err(ConfigError::Validation {
                field: "ip".into(),
                reason: "must not be empty".into(),
            });
        }
        let raw = format!("https://{ip}:{API_PORT}/api");
        Url::parse(&raw).map_err(|e| ConfigError::Validation {
            field: "ip".into(),
            reason: format!("'{ip}' does not form a valid URL: {e}"),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load a server config from a YAML file.
///
/// The document must be a mapping; lists and scalars are rejected even if
/// they parse as YAML.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_server_config(&contents, path)
}

fn parse_server_config(contents: &str, path: &Path) -> Result<ServerConfig, ConfigError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if !value.is_mapping() {
        return Err(ConfigError::NotMapping {
            path: path.to_path_buf(),
        });
    }

    let raw: RawServerConfig =
        serde_yaml::from_value(value).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let password = match raw.password {
        Some(pw) => SecretString::from(pw),
        None => std::env::var(PASSWORD_ENV)
            .map(SecretString::from)
            .map_err(|_| ConfigError::NoPassword {
                path: path.to_path_buf(),
            })?,
    };

    Ok(ServerConfig {
        ip: raw.ip,
        username: raw.username,
        password,
    })
}

// ── Directories ─────────────────────────────────────────────────────

/// A server config file and the CA certificate kept beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFile {
    pub config: PathBuf,
    /// `<name>.crt` next to `<name>.yml`, when present.
    pub cert: Option<PathBuf>,
}

/// Every `*.yml` in `dir`, in name order.
pub fn discover_server_files(dir: &Path) -> Result<Vec<ServerFile>, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut configs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "yml"))
        .collect();
    if configs.is_empty() {
        return Err(ConfigError::NoServers {
            dir: dir.to_path_buf(),
        });
    }
    configs.sort();

    Ok(configs
        .into_iter()
        .map(|config| {
            let cert = Some(config.with_extension("crt")).filter(|cert| cert.is_file());
            ServerFile { config, cert }
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_mapping() {
        let file = write_yaml("ip: 192.168.56.150\nusername: root\npassword: \"password\"\n");
        let config = load_server_config(file.path()).unwrap();

        assert_eq!(config.ip, "192.168.56.150");
        assert_eq!(config.username, "root");
        assert_eq!(config.password.expose_secret(), "password");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://192.168.56.150:215/api"
        );
    }

    #[test]
    fn numeric_password_is_kept_as_text() {
        let file = write_yaml("ip: 192.168.56.150\nusername: root\npassword: 12345\n");
        let config = load_server_config(file.path()).unwrap();
        assert_eq!(config.password.expose_secret(), "12345");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_server_config(Path::new("/nonexistent/server.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn list_document_is_rejected() {
        let file = write_yaml("- ip\n- username\n");
        let err = load_server_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotMapping { .. }));
    }

    #[test]
    fn scalar_document_is_rejected() {
        let file = write_yaml("just-a-string\n");
        let err = load_server_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotMapping { .. }));
    }

    #[test]
    fn broken_yaml_is_parse_error() {
        let file = write_yaml("ip: [unterminated\n");
        let err = load_server_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_field_is_parse_error() {
        let file = write_yaml("ip: 10.0.0.1\npassword: x\n");
        let err = load_server_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("username"), "got: {err}");
    }

    #[test]
    fn empty_ip_has_no_base_url() {
        let config = ServerConfig {
            ip: "  ".into(),
            username: "root".into(),
            password: SecretString::from("x".to_owned()),
        };
        assert!(matches!(
            config.base_url(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn discovers_yml_files_with_certs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zs2.yml", "zs1.yml", "zs1.crt", "notes.txt", "zs3.yaml"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let servers = discover_server_files(dir.path()).unwrap();
        assert_eq!(
            servers,
            [
                ServerFile {
                    config: dir.path().join("zs1.yml"),
                    cert: Some(dir.path().join("zs1.crt")),
                },
                ServerFile {
                    config: dir.path().join("zs2.yml"),
                    cert: None,
                },
            ]
        );
    }

    #[test]
    fn directory_without_yml_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zs1.crt"), "").unwrap();
        let err = discover_server_files(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NoServers { .. }));
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Name of the external share client invoked by default.
pub const DEFAULT_CLIENT_PROGRAM: &str = "smbclient";

/// Global configuration loaded from `~/.config/smbget/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmbgetConfig {
    /// External client executable (looked up on `PATH` when not absolute).
    pub client_program: String,
    /// Extra arguments passed to the client right after the anonymous flag,
    /// e.g. `["--option=client min protocol=SMB2"]`.
    #[serde(default)]
    pub client_extra_args: Vec<String>,
    /// Also name the smbclient error in the final failure message. Off by default
    /// so the message only carries the local mount error.
    #[serde(default)]
    pub report_external_error: bool,
}

impl Default for SmbgetConfig {
    fn default() -> Self {
        Self {
            client_program: DEFAULT_CLIENT_PROGRAM.to_string(),
            client_extra_args: Vec::new(),
            report_external_error: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("smbget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SmbgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SmbgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SmbgetConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SmbgetConfig::default();
        assert_eq!(cfg.client_program, "smbclient");
        assert!(cfg.client_extra_args.is_empty());
        assert!(!cfg.report_external_error);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SmbgetConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SmbgetConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_only_program() {
        let toml = r#"
            client_program = "/usr/local/bin/smbclient"
        "#;
        let cfg: SmbgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.client_program, "/usr/local/bin/smbclient");
        assert!(cfg.client_extra_args.is_empty());
        assert!(!cfg.report_external_error);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            client_program = "smbclient"
            client_extra_args = ["--option=client min protocol=SMB2", "-d1"]
            report_external_error = true
        "#;
        let cfg: SmbgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.client_extra_args.len(), 2);
        assert_eq!(cfg.client_extra_args[1], "-d1");
        assert!(cfg.report_external_error);
    }
}

// ABOUTME: Settings file handling for source paths, the ssh binary, and ui options
// ABOUTME: TOML-backed with compiled defaults when the user has no settings file

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub ssh: SshSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SshSettings {
    pub known_hosts_path: String,
    pub config_path: String,
    pub ssh_binary: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub case_sensitive: bool,
}

impl Default for SshSettings {
    fn default() -> Self {
        SshSettings {
            known_hosts_path: "~/.ssh/known_hosts".to_string(),
            config_path: "~/.ssh/config".to_string(),
            ssh_binary: "ssh".to_string(),
        }
    }
}

impl Settings {
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse settings")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// A missing settings file means compiled defaults; a present but
    /// broken one is the user's to fix and stays fatal.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("no settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("tiller").join("config.toml"))
    }

    pub fn expand_paths(&mut self) -> Result<()> {
        self.ssh.known_hosts_path = expand_tilde(&self.ssh.known_hosts_path)?;
        self.ssh.config_path = expand_tilde(&self.ssh.config_path)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ssh.ssh_binary.is_empty() {
            anyhow::bail!("ssh_binary cannot be empty");
        }
        if self.ssh.known_hosts_path.is_empty() {
            anyhow::bail!("known_hosts_path cannot be empty");
        }
        Ok(())
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(rest).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let content = r#"
[ssh]
known_hosts_path = "~/.ssh/known_hosts"
config_path = "~/.ssh/config"
ssh_binary = "/usr/bin/ssh"

[ui]
case_sensitive = true
"#;

        let settings = Settings::load_from_str(content).unwrap();

        assert_eq!(settings.ssh.ssh_binary, "/usr/bin/ssh");
        assert!(settings.ui.case_sensitive);
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let content = r#"
[ssh]
known_hosts_path = "/tmp/known_hosts"
"#;

        let settings = Settings::load_from_str(content).unwrap();

        assert_eq!(settings.ssh.known_hosts_path, "/tmp/known_hosts");
        assert_eq!(settings.ssh.config_path, "~/.ssh/config");
        assert_eq!(settings.ssh.ssh_binary, "ssh");
        assert!(!settings.ui.case_sensitive);
    }

    #[test]
    fn test_empty_settings_equal_defaults() {
        let settings = Settings::load_from_str("").unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result = Settings::load_from_str("[ui]\ncase_sensitive = \"yes\"");

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let settings = Settings::load_or_default(&path).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_broken_file_stays_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not [ valid toml").unwrap();

        let result = Settings::load_or_default(&path);

        assert!(result.is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        let home_str = home.to_string_lossy();

        assert_eq!(expand_tilde("~/test").unwrap(), format!("{home_str}/test"));
        assert_eq!(expand_tilde("/absolute/path").unwrap(), "/absolute/path");
        assert_eq!(expand_tilde("relative/path").unwrap(), "relative/path");
    }

    #[test]
    fn test_expand_paths_rewrites_both_sources() {
        let mut settings = Settings::default();

        settings.expand_paths().unwrap();

        let home = dirs::home_dir().unwrap();
        assert_eq!(
            settings.ssh.known_hosts_path,
            home.join(".ssh/known_hosts").to_string_lossy()
        );
        assert_eq!(
            settings.ssh.config_path,
            home.join(".ssh/config").to_string_lossy()
        );
    }

    #[test]
    fn test_default_path_points_into_config_dir() {
        let path = Settings::default_path().unwrap();

        assert!(path.to_string_lossy().contains("tiller"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_validate_rejects_empty_ssh_binary() {
        let mut settings = Settings::default();
        settings.ssh.ssh_binary = String::new();

        let result = settings.validate();

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("ssh_binary cannot be empty")
        );
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }
}

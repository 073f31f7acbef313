// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use questadmin_app::{DEFAULT_ADMIN_EMAIL, PageKind, RecordKind, is_email_address};
use questadmin_store::{AdminStore, DEFAULT_ADMIN_PASSWORD, LocalAuthClient, password_digest};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "questadmin";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub start_page: Option<String>,
    pub download_dir: Option<String>,
    /// Rows per page keyed by page key, for example `users = 6`.
    #[serde(default)]
    pub page_size: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Auth {
    pub admin_email: Option<String>,
    pub admin_password_sha256: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            ..Self::default()
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("QUESTADMIN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set QUESTADMIN_CONFIG_PATH to the config file"
            )
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version -- add `version = 1` and retry",
                    path.display()
                )
            })?;
        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(start) = &self.ui.start_page
            && PageKind::parse(start).is_none()
        {
            bail!(
                "ui.start_page {start:?} in {} is not a page -- use one of {}",
                path.display(),
                page_keys()
            );
        }

        for (key, size) in &self.ui.page_size {
            AdminStore::kind_for_key(key)
                .with_context(|| format!("ui.page_size in {}", path.display()))?;
            if *size == 0 {
                bail!(
                    "ui.page_size.{key} in {} must be positive, got 0",
                    path.display()
                );
            }
        }

        if let Some(email) = &self.auth.admin_email
            && !is_email_address(email.trim())
        {
            bail!(
                "auth.admin_email {email:?} in {} is not an email address",
                path.display()
            );
        }

        if let Some(digest) = &self.auth.admin_password_sha256 {
            let digest = digest.trim();
            if digest.len() != 64 || !digest.chars().all(|ch| ch.is_ascii_hexdigit()) {
                bail!(
                    "auth.admin_password_sha256 in {} must be 64 hex characters -- generate one with `printf %s <password> | sha256sum`",
                    path.display()
                );
            }
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level {level:?} in {} is not recognized -- use one of {}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn start_page(&self) -> PageKind {
        self.ui
            .start_page
            .as_deref()
            .and_then(PageKind::parse)
            .unwrap_or(PageKind::Overview)
    }

    /// Configured page sizes. Keys were checked at load.
    pub fn page_sizes(&self) -> Vec<(RecordKind, usize)> {
        self.ui
            .page_size
            .iter()
            .filter_map(|(key, size)| {
                PageKind::parse(key)
                    .and_then(PageKind::record_kind)
                    .map(|kind| (kind, *size))
            })
            .collect()
    }

    pub fn download_dir(&self) -> PathBuf {
        match &self.ui.download_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn admin_email(&self) -> &str {
        self.auth
            .admin_email
            .as_deref()
            .map_or(DEFAULT_ADMIN_EMAIL, str::trim)
    }

    pub fn auth_client(&self) -> LocalAuthClient {
        let digest = match &self.auth.admin_password_sha256 {
            Some(digest) => digest.clone(),
            None => password_digest(DEFAULT_ADMIN_PASSWORD),
        };
        LocalAuthClient::new(self.admin_email(), &digest)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("questadmin.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# questadmin config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# One of: {}\nstart_page = \"overview\"\n# download_dir = \"/absolute/path/for/report/downloads\"\n\n[ui.page_size]\nusers = 6\npayments = 5\n\n[auth]\nadmin_email = \"{}\"\n# Lowercase hex SHA-256 of the admin password. Default password: {}\nadmin_password_sha256 = \"{}\"\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/questadmin.log\"\n",
            path.display(),
            page_keys(),
            DEFAULT_ADMIN_EMAIL,
            DEFAULT_ADMIN_PASSWORD,
            password_digest(DEFAULT_ADMIN_PASSWORD),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn page_keys() -> String {
    PageKind::ALL
        .iter()
        .map(|page| page.key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use questadmin_app::{AuthClient, Credentials, PageKind, RecordKind};
    use questadmin_testkit::temp_config_path;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let (temp, path) = temp_config_path()?;
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.start_page(), PageKind::Overview);
        assert_eq!(config.log_level(), "info");
        assert!(config.page_sizes().is_empty());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nstart_page = \"users\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        assert!(error.to_string().contains("add `version = 1`"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nstart_page = \"payments\"\ndownload_dir = \"/tmp/reports\"\n[ui.page_size]\nusers = 3\n[auth]\nadmin_email = \"ops@example.com\"\n[log]\nlevel = \"debug\"\nfile = \"/tmp/questadmin.log\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.start_page(), PageKind::Payments);
        assert_eq!(config.page_sizes(), vec![(RecordKind::User, 3)]);
        assert_eq!(config.download_dir(), PathBuf::from("/tmp/reports"));
        assert_eq!(config.admin_email(), "ops@example.com");
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_file()?, PathBuf::from("/tmp/questadmin.log"));
        Ok(())
    }

    #[test]
    fn unknown_start_page_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_page = \"billing\"\n")?;
        let error = Config::load(&path).expect_err("unknown page should fail");
        let message = error.to_string();
        assert!(message.contains("not a page"));
        assert!(message.contains("ai-monitoring"));
        Ok(())
    }

    #[test]
    fn page_size_keys_must_name_record_pages() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui.page_size]\noverview = 4\n")?;
        let error = Config::load(&path).expect_err("overview has no table");
        assert!(format!("{error:#}").contains("not a record page"));

        let (_temp, path) = write_config("version = 1\n[ui.page_size]\nusers = 0\n")?;
        let error = Config::load(&path).expect_err("zero page size");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn auth_values_are_validated() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[auth]\nadmin_email = \"nobody\"\n")?;
        let error = Config::load(&path).expect_err("bad email");
        assert!(error.to_string().contains("not an email address"));

        let (_temp, path) =
            write_config("version = 1\n[auth]\nadmin_password_sha256 = \"abc\"\n")?;
        let error = Config::load(&path).expect_err("short digest");
        assert!(error.to_string().contains("64 hex characters"));
        Ok(())
    }

    #[test]
    fn configured_digest_drives_sign_in() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[auth]\nadmin_email = \"ops@example.com\"\nadmin_password_sha256 = \"BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD\"\n",
        )?;
        let config = Config::load(&path)?;
        let mut client = config.auth_client();
        let session = client.sign_in(&Credentials {
            email: "ops@example.com".to_owned(),
            password: "abc".to_owned(),
            remember: false,
        })?;
        assert_eq!(session.email, "ops@example.com");
        Ok(())
    }

    #[test]
    fn bad_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("QUESTADMIN_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("QUESTADMIN_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let (_temp, path) = temp_config_path()?;
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(
            config.page_sizes(),
            vec![(RecordKind::Payment, 5), (RecordKind::User, 6)]
        );
        let mut client = config.auth_client();
        assert!(
            client
                .sign_in(&Credentials {
                    email: "admin@example.com".to_owned(),
                    password: "admin123".to_owned(),
                    remember: true,
                })
                .is_ok()
        );
        Ok(())
    }
}

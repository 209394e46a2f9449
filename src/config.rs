//! Page behavior configuration.
//!
//! Defaults reproduce the stock page script. A page may override any subset
//! by embedding JSON in the `data-page-config` attribute of `<html>`; missing
//! keys keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_VISIBLE_MS: u32 = 5_000;
pub const DEFAULT_FADE_MS: u32 = 500;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";
pub const DEFAULT_ADMIN_PATH_MARKER: &str = "/admin";

/// Attribute on `<html>` holding a JSON override.
pub const CONFIG_ATTR: &str = "data-page-config";

/// Error returned by [`PageConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid page config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("max upload size must be greater than zero")]
    ZeroUploadLimit,
    #[error("at least one accepted upload type is required")]
    NoAcceptedTypes,
    #[error("{field} delay must be greater than zero")]
    ZeroDelay { field: &'static str },
}

/// Replaced by the configured upload limit in `uploadTooLarge`.
pub const LIMIT_PLACEHOLDER: &str = "{limit}";

/// User-facing texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub required_fields: String,
    pub upload_too_large: String,
    pub upload_wrong_type: String,
    pub confirm_delete: String,
    pub loading_label: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            required_fields: "请填写所有必填字段".to_owned(),
            upload_too_large: format!("文件大小不能超过 {LIMIT_PLACEHOLDER}"),
            upload_wrong_type: "只支持 Excel 文件格式".to_owned(),
            confirm_delete: "确定要删除吗？此操作不可恢复。".to_owned(),
            loading_label: "处理中...".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// How long a notification stays fully visible.
    pub visible_ms: u32,
    /// Length of the fade-out before removal.
    pub fade_ms: u32,
    pub max_upload_bytes: u64,
    pub accepted_upload_types: Vec<String>,
    /// Keyboard shortcuts are enabled when the path contains this.
    pub admin_path_marker: String,
    pub messages: Messages,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            visible_ms: DEFAULT_VISIBLE_MS,
            fade_ms: DEFAULT_FADE_MS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            accepted_upload_types: vec![XLSX_MIME.to_owned(), XLS_MIME.to_owned()],
            admin_path_marker: DEFAULT_ADMIN_PATH_MARKER.to_owned(),
            messages: Messages::default(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON override and validate the result.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no page could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visible_ms == 0 {
            return Err(ConfigError::ZeroDelay { field: "visibleMs" });
        }
        if self.fade_ms == 0 {
            return Err(ConfigError::ZeroDelay { field: "fadeMs" });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        if self.accepted_upload_types.is_empty() {
            return Err(ConfigError::NoAcceptedTypes);
        }
        Ok(())
    }

    /// Config for a page embedding `raw` (the `data-page-config` value).
    ///
    /// Absent or invalid overrides fall back to the defaults.
    #[must_use]
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };
        Self::from_json(raw).unwrap_or_else(|err| {
            log::warn!("{err}; using default page config");
            Self::default()
        })
    }

    /// Whether keyboard shortcuts apply at `path`.
    #[must_use]
    pub fn is_admin_path(&self, path: &str) -> bool {
        !self.admin_path_marker.is_empty() && path.contains(&self.admin_path_marker)
    }
}

// ABOUTME: Export configuration and credential validation
// ABOUTME: Schema bindings load from YAML, credentials come from flags or env

use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_FALLBACK_PROPERTIES: [&str; 5] = ["本文", "内容", "テキスト", "Body", "Content"];

/// Property bindings and output naming for one database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub title_property: String,
    pub date_property: String,
    /// Only pages whose title contains this substring are exported; `None` exports all.
    pub filter: Option<String>,
    /// Rich-text properties checked in order when a page has no blocks.
    pub fallback_properties: Vec<String>,
    pub combined_file: String,
    pub combined_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            title_property: "タイトル".into(),
            date_property: "日付".into(),
            filter: Some("3行日記".into()),
            fallback_properties: DEFAULT_FALLBACK_PROPERTIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            combined_file: "_all.md".into(),
            combined_title: "3行日記（全件まとめ）".into(),
        }
    }
}

impl ExportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Access token and database id, both required before any request is made.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub database_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}

impl Credentials {
    pub fn resolve(token: Option<String>, database_id: Option<String>) -> Result<Self> {
        let token = token.filter(|t| !t.trim().is_empty());
        let database_id = database_id.filter(|d| !d.trim().is_empty());

        match (token, database_id) {
            (Some(token), Some(database_id)) => Ok(Credentials { token, database_id }),
            (None, None) => Err(Error::Config(
                "NOTION_TOKEN and NOTION_DATABASE_ID are not set".into(),
            )),
            (None, _) => Err(Error::Config(
                "No access token found. Provide via --token or NOTION_TOKEN env var".into(),
            )),
            (_, None) => Err(Error::Config(
                "No database id found. Provide via --database-id or NOTION_DATABASE_ID env var"
                    .into(),
            )),
        }
    }
}

//! Superadmin-controlled UI documents: sidebar items, table columns per
//! page, optional platform modules and theme CSS variables.
//!
//! Each document is stored whole as JSON under its key. Reads fall back to
//! the defaults below when nothing is stored; writes replace the document.

use std::collections::BTreeMap;

use chrono::Utc;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{NewSetting, Setting};
use crate::schema::settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKey {
    Sidebar,
    Columns,
    Theme,
    Modules,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sidebar => "sidebar",
            Self::Columns => "columns",
            Self::Theme => "theme",
            Self::Modules => "modules",
        }
    }
}

impl std::str::FromStr for SettingKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sidebar" => Ok(Self::Sidebar),
            "columns" => Ok(Self::Columns),
            "theme" => Ok(Self::Theme),
            "modules" => Ok(Self::Modules),
            _ => Err(AppError::new(ErrorCode::UnknownSetting, format!("unknown setting '{s}'"))),
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleItem {
    pub key: String,
    pub label: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl ToggleItem {
    pub fn new(key: &str, label: &str, enabled: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            enabled,
        }
    }
}

pub type SidebarSettings = Vec<ToggleItem>;
pub type ColumnSettings = BTreeMap<String, Vec<ToggleItem>>;
pub type ModuleSettings = Vec<ToggleItem>;
pub type ThemeSettings = BTreeMap<String, String>;

pub const MEMBERSHIP_MODULE: &str = "membership";

pub mod defaults {
    use super::*;

    fn toggles(items: &[(&str, &str)]) -> Vec<ToggleItem> {
        items.iter().map(|(k, l)| ToggleItem::new(k, l, true)).collect()
    }

    pub fn sidebar() -> SidebarSettings {
        toggles(&[
            ("dashboard", "Dashboard"),
            ("users", "Users"),
            ("approved_users", "Approved Users"),
            ("user_passwords", "User Passwords"),
            ("assign_match", "Assign Match"),
            ("matches", "Matches"),
            ("interests", "Interests"),
            ("membership_plans", "Membership Plans"),
            ("analytics", "Analytics"),
            ("bulk_upload", "Bulk Upload"),
            ("settings", "Settings"),
        ])
    }

    pub fn columns() -> ColumnSettings {
        let mut pages = ColumnSettings::new();
        pages.insert(
            "users".into(),
            toggles(&[
                ("name", "Name"),
                ("phone", "Phone"),
                ("age", "Age"),
                ("gender", "Gender"),
                ("payment_status", "Payment"),
                ("is_approved", "Approved"),
                ("membership_type", "Membership"),
                ("created_at", "Registered"),
                ("actions", "Actions"),
            ]),
        );
        pages.insert(
            "matches".into(),
            toggles(&[
                ("user1", "User 1"),
                ("user2", "User 2"),
                ("match_score", "Score"),
                ("status", "Status"),
                ("created_at", "Created"),
                ("actions", "Actions"),
            ]),
        );
        pages.insert(
            "interests".into(),
            toggles(&[
                ("sender", "Sender"),
                ("receiver", "Receiver"),
                ("status", "Status"),
                ("sent_at", "Sent"),
            ]),
        );
        pages
    }

    pub fn modules() -> ModuleSettings {
        toggles(&[
            (MEMBERSHIP_MODULE, "Membership"),
            ("smart_match", "Smart Match Assignment"),
            ("analytics", "Analytics"),
            ("bulk_upload", "Bulk Upload"),
        ])
    }

    pub fn theme() -> ThemeSettings {
        [
            ("--primary-color", "#9f1239"),
            ("--secondary-color", "#f59e0b"),
            ("--sidebar-bg", "#1f2937"),
            ("--sidebar-text", "#f9fafb"),
            ("--font-family", "Poppins, sans-serif"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn for_key(key: SettingKey) -> serde_json::Value {
        let value = match key {
            SettingKey::Sidebar => serde_json::to_value(sidebar()),
            SettingKey::Columns => serde_json::to_value(columns()),
            SettingKey::Theme => serde_json::to_value(theme()),
            SettingKey::Modules => serde_json::to_value(modules()),
        };
        value.unwrap_or(serde_json::Value::Null)
    }
}

/// A module missing from the stored list takes its default state; unknown modules are off.
pub fn module_enabled(modules: &[ToggleItem], key: &str) -> bool {
    modules
        .iter()
        .find(|m| m.key == key)
        .map(|m| m.enabled)
        .or_else(|| defaults::modules().into_iter().find(|m| m.key == key).map(|m| m.enabled))
        .unwrap_or(false)
}

/// Keys of the enabled items, in stored order.
pub fn enabled_keys(items: &[ToggleItem]) -> Vec<&str> {
    items.iter().filter(|i| i.enabled).map(|i| i.key.as_str()).collect()
}

fn decode_or<T: DeserializeOwned>(key: SettingKey, raw: Option<&str>, fallback: impl FnOnce() -> T) -> T {
    match raw {
        None => fallback(),
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(key = key.as_str(), error = %e, "stored setting unreadable, serving defaults");
            fallback()
        }),
    }
}

pub fn load<T: DeserializeOwned>(
    conn: &mut MysqlConnection,
    key: SettingKey,
    fallback: impl FnOnce() -> T,
) -> AppResult<T> {
    let row = settings::table
        .find(key.as_str())
        .first::<Setting>(conn)
        .optional()?;
    Ok(decode_or(key, row.as_ref().map(|r| r.setting_value.as_str()), fallback))
}

/// Overwrites the whole document; last writer wins.
pub fn store<T: Serialize>(conn: &mut MysqlConnection, key: SettingKey, value: &T) -> AppResult<()> {
    let setting_value = serde_json::to_string(value)
        .map_err(|e| AppError::internal(format!("failed to encode setting: {e}")))?;
    diesel::replace_into(settings::table)
        .values(&NewSetting {
            setting_key: key.as_str(),
            setting_value,
            updated_at: Utc::now().naive_utc(),
        })
        .execute(conn)?;
    tracing::info!(key = key.as_str(), "setting replaced");
    Ok(())
}

/// Untyped read used by the generic settings endpoints.
pub fn load_document(conn: &mut MysqlConnection, key: SettingKey) -> AppResult<serde_json::Value> {
    let value = match key {
        SettingKey::Sidebar => serde_json::to_value(load(conn, key, defaults::sidebar)?),
        SettingKey::Columns => serde_json::to_value(load(conn, key, defaults::columns)?),
        SettingKey::Theme => serde_json::to_value(load(conn, key, defaults::theme)?),
        SettingKey::Modules => serde_json::to_value(load(conn, key, defaults::modules)?),
    };
    value.map_err(|e| AppError::internal(format!("failed to encode setting: {e}")))
}

/// Checks the body has the document's shape, then replaces it.
pub fn store_document(
    conn: &mut MysqlConnection,
    key: SettingKey,
    body: serde_json::Value,
) -> AppResult<serde_json::Value> {
    let normalized = normalize(key, body)?;
    store(conn, key, &normalized)?;
    Ok(normalized)
}

fn normalize(key: SettingKey, body: serde_json::Value) -> AppResult<serde_json::Value> {
    fn reshape<T: DeserializeOwned + Serialize>(key: SettingKey, body: serde_json::Value) -> AppResult<serde_json::Value> {
        let typed: T = serde_json::from_value(body).map_err(|e| {
            AppError::new(ErrorCode::ValidationError, format!("invalid {} document: {e}", key.as_str()))
        })?;
        serde_json::to_value(typed).map_err(|e| AppError::internal(e.to_string()))
    }

    match key {
        SettingKey::Sidebar => reshape::<SidebarSettings>(key, body),
        SettingKey::Columns => reshape::<ColumnSettings>(key, body),
        SettingKey::Theme => reshape::<ThemeSettings>(key, body),
        SettingKey::Modules => reshape::<ModuleSettings>(key, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_document_serves_defaults() {
        let sidebar: SidebarSettings = decode_or(SettingKey::Sidebar, None, defaults::sidebar);
        assert_eq!(sidebar, defaults::sidebar());
    }

    #[test]
    fn unreadable_document_serves_defaults() {
        let modules: ModuleSettings = decode_or(SettingKey::Modules, Some("{oops"), defaults::modules);
        assert_eq!(modules, defaults::modules());
    }

    #[test]
    fn stored_empty_list_is_returned_as_is() {
        let sidebar: SidebarSettings = decode_or(SettingKey::Sidebar, Some("[]"), defaults::sidebar);
        assert!(sidebar.is_empty());
    }

    #[test]
    fn module_lookup_falls_back_to_defaults() {
        let stored = vec![ToggleItem::new(MEMBERSHIP_MODULE, "Membership", false)];
        assert!(!module_enabled(&stored, MEMBERSHIP_MODULE));
        assert!(module_enabled(&stored, "smart_match"));
        assert!(!module_enabled(&stored, "video_calls"));
    }

    #[test]
    fn toggles_default_to_enabled_when_flag_omitted() {
        let normalized = normalize(SettingKey::Sidebar, json!([{"key": "users", "label": "Users"}])).unwrap();
        assert_eq!(normalized, json!([{"key": "users", "label": "Users", "enabled": true}]));
        assert_eq!(enabled_keys(&defaults::sidebar())[0], "dashboard");
    }

    #[test]
    fn wrong_shape_is_a_validation_error() {
        let err = normalize(SettingKey::Columns, json!(["not", "a", "map"])).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_keys_are_not_found() {
        let err = "footer".parse::<SettingKey>().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
        assert_eq!("theme".parse::<SettingKey>().unwrap(), SettingKey::Theme);
    }

    #[test]
    fn every_key_has_a_default_document() {
        for key in [SettingKey::Sidebar, SettingKey::Columns, SettingKey::Theme, SettingKey::Modules] {
            assert!(!defaults::for_key(key).is_null());
        }
    }
}

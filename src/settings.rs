//! User preferences: default selection, starred rows and output theme.
//!
//! `Settings` is never mutated in place. Updates produce a new record which
//! the single [`SettingsHandle`] owner swaps in and persists.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::config_dir;
use crate::error::Result;
use crate::types::{RecordId, Scope, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// ANSI-styled headings, errors and status lines
    #[default]
    Colored,
    /// No ANSI styling at all
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_region: u32,
    #[serde(default)]
    pub default_sort: u32,
    #[serde(default)]
    pub default_scope: Scope,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub starred_ids: BTreeSet<RecordId>,
    #[serde(default)]
    pub theme: Theme,
}

impl Settings {
    pub fn default_selection(&self) -> Selection {
        Selection::new(self.default_region, self.default_sort).with_scope(self.default_scope)
    }

    pub fn is_starred(&self, id: RecordId) -> bool {
        self.starred_ids.contains(&id)
    }

    /// Return a copy with `id` added to or removed from the starred set.
    pub fn with_star_toggled(&self, id: RecordId) -> Self {
        let mut starred_ids = self.starred_ids.clone();
        if !starred_ids.remove(&id) {
            starred_ids.insert(id);
        }
        Self {
            starred_ids,
            ..self.clone()
        }
    }

    pub fn with_default_selection(&self, selection: Selection) -> Self {
        Self {
            default_region: selection.region_id,
            default_sort: selection.sort_mode,
            default_scope: selection.scope,
            ..self.clone()
        }
    }

    pub fn with_theme(&self, theme: Theme) -> Self {
        Self {
            theme,
            ..self.clone()
        }
    }

    pub fn settings_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("settings.yaml"))
    }

    /// Load settings from disk, or defaults if none were saved yet.
    pub fn load() -> Result<Self> {
        let path = Self::settings_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_yaml_ng::to_string(self)?)?;
        Ok(())
    }
}

/// Shared owner of the current [`Settings`] record.
///
/// Readers get a cheap snapshot; writers replace the whole record.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    pub fn snapshot(&self) -> Arc<Settings> {
        self.inner.read().clone()
    }

    /// Apply `update` to the current record and store the result.
    pub fn update<F>(&self, update: F) -> Arc<Settings>
    where
        F: FnOnce(&Settings) -> Settings,
    {
        let mut guard = self.inner.write();
        let next = Arc::new(update(&guard));
        *guard = next.clone();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_star_returns_new_record() {
        let original = Settings::default();
        let starred = original.with_star_toggled(42);

        assert!(!original.is_starred(42));
        assert!(starred.is_starred(42));

        let unstarred = starred.with_star_toggled(42);
        assert!(!unstarred.is_starred(42));
        assert!(starred.is_starred(42));
    }

    #[test]
    fn test_default_selection_round_trip() {
        let settings = Settings::default().with_default_selection(Selection::new(7, 2));
        assert_eq!(settings.default_selection(), Selection::new(7, 2));

        let global = settings.with_default_selection(Selection::global(1));
        assert_eq!(global.default_selection(), Selection::global(1));
    }

    #[test]
    fn test_handle_update_replaces_snapshot() {
        let handle = SettingsHandle::new(Settings::default());
        let before = handle.snapshot();
        handle.update(|s| s.with_star_toggled(1));

        assert!(!before.is_starred(1));
        assert!(handle.snapshot().is_starred(1));
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        let yaml = serde_yaml_ng::to_string(&Settings::default().with_theme(Theme::Plain)).unwrap();
        assert!(yaml.contains("theme: plain"));
    }
}

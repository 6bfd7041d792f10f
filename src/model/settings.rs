use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_WORK_ITEMS: usize = 50;

/// User preferences from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Show every item in the project instead of only the user's own
    #[serde(default)]
    pub default_show_all: bool,
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
    /// Board page size. Zero falls back to the default.
    #[serde(default = "default_max_work_items")]
    pub max_work_items: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            default_show_all: false,
            enable_notifications: true,
            max_work_items: DEFAULT_MAX_WORK_ITEMS,
        }
    }
}

impl AppSettings {
    /// Replace out-of-range values with defaults.
    pub fn normalized(mut self) -> Self {
        if self.max_work_items == 0 {
            self.max_work_items = DEFAULT_MAX_WORK_ITEMS;
        }
        self
    }

    pub fn page_size(&self) -> usize {
        if self.max_work_items == 0 {
            DEFAULT_MAX_WORK_ITEMS
        } else {
            self.max_work_items
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_work_items() -> usize {
    DEFAULT_MAX_WORK_ITEMS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let s: AppSettings = toml::from_str("").unwrap();
        assert_eq!(s, AppSettings::default());
        assert!(s.enable_notifications);
    }

    #[test]
    fn zero_page_size_normalizes() {
        let s: AppSettings = toml::from_str("max_work_items = 0").unwrap();
        assert_eq!(s.page_size(), 50);
        assert_eq!(s.normalized().max_work_items, 50);
    }
}

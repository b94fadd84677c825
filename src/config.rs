//! Runtime settings: compiled-in defaults with environment overrides.

use std::{env, path::PathBuf, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Status, files, branches and commits, with stash as the fifth pane.
    Git,
    /// Mock workspace, packages, pull requests and greeting panes.
    Workspace,
}

impl Layout {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "git" => Some(Layout::Git),
            "workspace" | "ws" => Some(Layout::Workspace),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub layout: Layout,
    pub commit_limit: usize,
    pub max_files: usize,
    pub show_hidden: bool,
    pub mock_delay: Duration,
    pub notice_ttl: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: Layout::Git,
            commit_limit: 50,
            max_files: 100,
            show_hidden: false,
            mock_delay: Duration::from_millis(500),
            notice_ttl: Duration::from_secs(4),
            log_file: None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" | "on" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let num = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(layout) = lookup("GITDECK_LAYOUT").as_deref().and_then(Layout::parse) {
            cfg.layout = layout;
        }
        if let Some(n) = num("GITDECK_COMMIT_LIMIT").filter(|n| *n > 0) {
            cfg.commit_limit = n as usize;
        }
        if let Some(n) = num("GITDECK_MAX_FILES").filter(|n| *n > 0) {
            cfg.max_files = n as usize;
        }
        if let Some(b) = lookup("GITDECK_SHOW_HIDDEN").as_deref().and_then(parse_bool) {
            cfg.show_hidden = b;
        }
        if let Some(ms) = num("GITDECK_MOCK_DELAY_MS") {
            cfg.mock_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = num("GITDECK_NOTICE_SECS") {
            cfg.notice_ttl = Duration::from_secs(secs);
        }
        cfg.log_file = lookup("GITDECK_LOG_FILE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let cfg = from_pairs(&[]);
        assert_eq!(cfg.layout, Layout::Git);
        assert_eq!(cfg.commit_limit, 50);
        assert_eq!(cfg.max_files, 100);
        assert!(!cfg.show_hidden);
        assert_eq!(cfg.mock_delay, Duration::from_millis(500));
        assert_eq!(cfg.notice_ttl, Duration::from_secs(4));
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = from_pairs(&[
            ("GITDECK_LAYOUT", "Workspace"),
            ("GITDECK_COMMIT_LIMIT", "75"),
            ("GITDECK_MAX_FILES", "20"),
            ("GITDECK_SHOW_HIDDEN", "yes"),
            ("GITDECK_MOCK_DELAY_MS", "0"),
            ("GITDECK_LOG_FILE", "/tmp/gitdeck.log"),
        ]);
        assert_eq!(cfg.layout, Layout::Workspace);
        assert_eq!(cfg.commit_limit, 75);
        assert_eq!(cfg.max_files, 20);
        assert!(cfg.show_hidden);
        assert_eq!(cfg.mock_delay, Duration::ZERO);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/gitdeck.log")));
    }

    #[test]
    fn garbage_keeps_defaults() {
        let cfg = from_pairs(&[
            ("GITDECK_LAYOUT", "tiles"),
            ("GITDECK_COMMIT_LIMIT", "0"),
            ("GITDECK_MAX_FILES", "lots"),
            ("GITDECK_SHOW_HIDDEN", "maybe"),
            ("GITDECK_LOG_FILE", "  "),
        ]);
        assert_eq!(cfg.layout, Layout::Git);
        assert_eq!(cfg.commit_limit, 50);
        assert_eq!(cfg.max_files, 100);
        assert!(!cfg.show_hidden);
        assert!(cfg.log_file.is_none());
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Relocates every default path.
pub const HOME_ENV: &str = "NOTEKEEPER_HOME";
/// Overrides `editor.command`.
pub const EDITOR_ENV: &str = "NOTEKEEPER_EDITOR";

pub const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_HOME_DIR_NAME: &str = "notekeeper";

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Locations of every file the program reads or writes.
///
/// Relative paths are resolved against `home_dir`; an empty `home_dir` means
/// `$NOTEKEEPER_HOME`, falling back to `~/notekeeper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub home_dir: String,
    pub base: String,
    pub base_template: String,
    pub interface: String,
    pub interface_template: String,
    pub tree_template: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            base: "base.txt".to_string(),
            base_template: "template_base.txt".to_string(),
            interface: "new_note.txt".to_string(),
            interface_template: "template_interface.txt".to_string(),
            tree_template: "template_tree.txt".to_string(),
        }
    }
}

// ── Editor ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shell command; the interface path is appended as the last argument.
    pub command: String,
    pub open_on_start: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: "subl".to_string(),
            open_on_start: true,
        }
    }
}

// ── Alternate bases ───────────────────────────────────────────────────────────

/// A named base reachable through the `load`/`switch` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAlias {
    pub alias: String,
    pub path: String,
}

// ── Tree view ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Leave records with blank text out of the tree view.
    pub skip_empty_text: bool,
    /// Repeated once per level below the first.
    pub indent: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            skip_empty_text: true,
            indent: "    ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Change events closer together than this are folded into one.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// When set, logs go to this file instead of stderr.
    pub log_file: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub editor: EditorConfig,
    pub bases: Vec<BaseAlias>,
    pub tree: TreeConfig,
    pub watch: WatchConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Loads the config at `path`.  A missing file yields the defaults; a
    /// `.toml` file is read as TOML, anything else as JSON.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = if is_toml(path) {
                toml::from_str(&raw)
                    .with_context(|| format!("invalid TOML config {}", path.display()))?
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("invalid JSON config {}", path.display()))?
            };
        }

        if let Ok(command) = env::var(EDITOR_ENV) {
            if !command.trim().is_empty() {
                config.editor.command = command;
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// The directory relative paths resolve against.
    pub fn home_dir(&self) -> PathBuf {
        if !self.paths.home_dir.trim().is_empty() {
            return expand_home(&self.paths.home_dir);
        }
        default_home_dir()
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let expanded = expand_home(path);
        if expanded.is_absolute() {
            expanded
        } else {
            self.home_dir().join(expanded)
        }
    }

    pub fn base_path(&self) -> PathBuf {
        self.resolve(&self.paths.base)
    }

    pub fn base_template_path(&self) -> PathBuf {
        self.resolve(&self.paths.base_template)
    }

    pub fn interface_path(&self) -> PathBuf {
        self.resolve(&self.paths.interface)
    }

    pub fn interface_template_path(&self) -> PathBuf {
        self.resolve(&self.paths.interface_template)
    }

    pub fn tree_template_path(&self) -> PathBuf {
        self.resolve(&self.paths.tree_template)
    }

    /// Case-insensitive alias lookup.
    pub fn find_base(&self, alias: &str) -> Option<&BaseAlias> {
        let alias = alias.trim();
        self.bases
            .iter()
            .find(|base| base.alias.trim().eq_ignore_ascii_case(alias))
    }
}

/// `$NOTEKEEPER_HOME`, else `~/notekeeper`, else `./notekeeper`.
pub fn default_home_dir() -> PathBuf {
    if let Ok(home) = env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return expand_home(&home);
        }
    }
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(DEFAULT_HOME_DIR_NAME),
        None => PathBuf::from(DEFAULT_HOME_DIR_NAME),
    }
}

pub fn default_config_path() -> PathBuf {
    default_home_dir().join(CONFIG_FILE_NAME)
}

fn expand_home(path: &str) -> PathBuf {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#![doc = include_str!("../README.md")]

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "yaml-tools.toml";

/// Configuration file for yaml-tools.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Mark this configuration file as the project root.
    ///
    /// When `true`, the search stops here and `yaml-tools.toml` files from
    /// parent directories are not merged.
    #[serde(default)]
    pub root: bool,

    /// Spaces per nesting level of block mappings.
    #[serde(default)]
    pub indent: Option<usize>,

    /// Extra columns before the `-` of a block sequence nested under a key.
    #[serde(default, rename = "sequence-indent")]
    pub sequence_indent: Option<usize>,
}

impl Config {
    /// Merge a parent config into this one. Values set in the child win;
    /// `root` is not inherited.
    fn merge_parent(&mut self, parent: Config) {
        self.indent = self.indent.or(parent.indent);
        self.sequence_indent = self.sequence_indent.or(parent.sequence_indent);
    }
}

/// Find the nearest `yaml-tools.toml` starting from `start_dir`, walking upward.
pub fn find_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Search for `yaml-tools.toml` files starting from `start_dir`, walking up.
/// Merges all configs found until one with `root = true` is hit (inclusive).
/// Returns the merged config, or `None` if no config file was found.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn find_and_load(start_dir: &Path) -> Result<Option<Config>, anyhow::Error> {
    let mut configs: Vec<Config> = Vec::new();
    let mut dir = start_dir.to_path_buf();

    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            let content = std::fs::read_to_string(&candidate)?;
            let cfg: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", candidate.display()))?;
            let is_root = cfg.root;
            configs.push(cfg);
            if is_root {
                break;
            }
        }
        if !dir.pop() {
            break;
        }
    }

    let mut configs = configs.into_iter();
    let Some(mut merged) = configs.next() else {
        return Ok(None);
    };
    for parent in configs {
        merged.merge_parent(parent);
    }
    Ok(Some(merged))
}

/// Load config from the current working directory (walking upward).
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load() -> Result<Config, anyhow::Error> {
    let cwd = std::env::current_dir()?;
    Ok(find_and_load(&cwd)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_config_from_directory() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join(CONFIG_FILENAME), "indent = 4\nsequence-indent = 2\n")?;

        let config = find_and_load(tmp.path())?.expect("config should exist");
        assert_eq!(config.indent, Some(4));
        assert_eq!(config.sequence_indent, Some(2));
        assert_eq!(find_config_path(tmp.path()), Some(tmp.path().join(CONFIG_FILENAME)));
        Ok(())
    }

    #[test]
    fn walks_up_to_find_config() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let sub = tmp.path().join("a/b/c");
        fs::create_dir_all(&sub)?;
        fs::write(tmp.path().join(CONFIG_FILENAME), "indent = 3")?;

        let config = find_and_load(&sub)?.expect("config should exist");
        assert_eq!(config.indent, Some(3));
        Ok(())
    }

    #[test]
    fn returns_none_when_no_config() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = find_and_load(tmp.path())?;
        assert!(config.is_none());
        Ok(())
    }

    #[test]
    fn empty_config_is_valid() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join(CONFIG_FILENAME), "")?;

        let config = find_and_load(tmp.path())?.expect("config should exist");
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn rejects_unknown_fields() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join(CONFIG_FILENAME), "sequence_indent = 2")?;

        let error = find_and_load(tmp.path()).expect_err("unknown field");
        assert!(error.to_string().contains("failed to parse"));
        Ok(())
    }

    #[test]
    fn root_true_stops_walk() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let sub = tmp.path().join("child");
        fs::create_dir_all(&sub)?;

        fs::write(tmp.path().join(CONFIG_FILENAME), "indent = 8\nsequence-indent = 4")?;
        fs::write(sub.join(CONFIG_FILENAME), "root = true\nindent = 4")?;

        let config = find_and_load(&sub)?.expect("config should exist");
        assert_eq!(config.indent, Some(4));
        assert_eq!(config.sequence_indent, None);
        Ok(())
    }

    #[test]
    fn merges_parent_without_root() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let sub = tmp.path().join("child");
        fs::create_dir_all(&sub)?;

        fs::write(tmp.path().join(CONFIG_FILENAME), "indent = 8\nsequence-indent = 4")?;
        fs::write(sub.join(CONFIG_FILENAME), "indent = 4")?;

        let config = find_and_load(&sub)?.expect("config should exist");
        assert_eq!(config.indent, Some(4));
        assert_eq!(config.sequence_indent, Some(4));
        assert!(!config.root);
        Ok(())
    }
}

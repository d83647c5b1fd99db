use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Default capacity of the bounded input/work queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub wrap: bool,
    pub no_wrap: bool,
    pub overwrite: bool,
    pub no_history: bool,
    pub autoscroll: bool,
    pub queue_capacity: Option<usize>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; `other` wins for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            wrap: self.wrap || other.wrap,
            no_wrap: self.no_wrap || other.no_wrap,
            overwrite: self.overwrite || other.overwrite,
            no_history: self.no_history || other.no_history,
            autoscroll: self.autoscroll || other.autoscroll,
            queue_capacity: other.queue_capacity.or(self.queue_capacity),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    /// `--no-wrap` beats `--wrap` from any layer.
    pub const fn wrap_enabled(&self) -> bool {
        self.wrap && !self.no_wrap
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
            .filter(|&cap| cap > 0)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("termview").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("termview")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("termview").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("termview")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".termviewrc")
}

/// Read a flags file; a missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as one CLI flag per line.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# termview defaults (saved with --save)".to_string()];
    let switches = [
        (flags.wrap, "--wrap"),
        (flags.no_wrap, "--no-wrap"),
        (flags.overwrite, "--overwrite"),
        (flags.no_history, "--no-history"),
        (flags.autoscroll, "--autoscroll"),
    ];
    lines.extend(
        switches
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| (*flag).to_string()),
    );
    if let Some(cap) = flags.queue_capacity {
        lines.push(format!("--queue-capacity {cap}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a saved flags file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--wrap" => flags.wrap = true,
            "--no-wrap" => flags.no_wrap = true,
            "--overwrite" => flags.overwrite = true,
            "--no-history" => flags.no_history = true,
            "--autoscroll" => flags.autoscroll = true,
            "--queue-capacity" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.queue_capacity = next.parse().ok();
                    i += 1;
                }
            }
            "--log-file" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.log_file = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--queue-capacity=") {
                    flags.queue_capacity = value.parse().ok();
                } else if let Some(value) = token.strip_prefix("--log-file=") {
                    flags.log_file = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "termview",
            "--wrap",
            "--overwrite",
            "--queue-capacity",
            "64",
            "--log-file=termview.log",
            "--autoscroll",
            "notes.txt",
        ]));
        assert!(flags.wrap);
        assert!(flags.overwrite);
        assert!(flags.autoscroll);
        assert!(!flags.no_history);
        assert_eq!(flags.queue_capacity, Some(64));
        assert_eq!(flags.log_file, Some(PathBuf::from("termview.log")));
    }

    #[test]
    fn test_bad_queue_capacity_falls_back_to_default() {
        let flags = parse_flag_tokens(&tokens(&["--queue-capacity", "lots"]));
        assert_eq!(flags.queue_capacity, None);
        assert_eq!(flags.queue_capacity(), DEFAULT_QUEUE_CAPACITY);

        let zero = parse_flag_tokens(&tokens(&["--queue-capacity=0"]));
        assert_eq!(zero.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            wrap: true,
            queue_capacity: Some(8),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            overwrite: true,
            queue_capacity: Some(32),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.wrap);
        assert!(merged.overwrite);
        assert_eq!(merged.queue_capacity, Some(32));
    }

    #[test]
    fn test_no_wrap_overrides_wrap() {
        let flags = ConfigFlags {
            wrap: true,
            ..ConfigFlags::default()
        }
        .union(&ConfigFlags {
            no_wrap: true,
            ..ConfigFlags::default()
        });
        assert!(!flags.wrap_enabled());
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".termviewrc");
        let flags = ConfigFlags {
            wrap: true,
            no_history: true,
            autoscroll: true,
            queue_capacity: Some(5),
            log_file: Some(PathBuf::from("debug.log")),
            ..ConfigFlags::default()
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}

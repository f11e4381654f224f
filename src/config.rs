//! Saved default flags.
//!
//! A config file is a list of command-line flags, any number per line, with
//! `#` comments. The global file is merged with a local `.quillrc` and then
//! with the actual command line, later sources winning for valued options.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Spaces inserted for Tab when nothing else is configured.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Largest tab width accepted from config or CLI.
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_line_numbers: bool,
    pub tab_width: Option<usize>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_line_numbers: self.no_line_numbers || other.no_line_numbers,
            tab_width: other.tab_width.or(self.tab_width),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    /// Tab width to use, falling back to [`DEFAULT_TAB_WIDTH`].
    pub fn effective_tab_width(&self) -> usize {
        self.tab_width.unwrap_or(DEFAULT_TAB_WIDTH)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("quill").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("quill")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("quill").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("quill").join("config");
        }
    }

    PathBuf::from(".quillrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".quillrc")
}

/// Load flags from `path`; a missing file yields the defaults.
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

/// Write `flags` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# quill defaults (saved with --save)".to_string());
    if flags.no_line_numbers {
        lines.push("--no-line-numbers".to_string());
    }
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a saved config file if present.
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

/// Pick the flags quill knows out of a raw token list; anything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--no-line-numbers" {
            flags.no_line_numbers = true;
        } else if token == "--tab-width" {
            if let Some(next) = tokens.get(i + 1) {
                flags.tab_width = parse_tab_width(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--tab-width=") {
            flags.tab_width = parse_tab_width(value);
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_tab_width(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|w| *w <= MAX_TAB_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "quill".to_string(),
            "--no-line-numbers".to_string(),
            "--tab-width".to_string(),
            "2".to_string(),
            "--log-file=quill.log".to_string(),
            "notes.txt".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_line_numbers);
        assert_eq!(flags.tab_width, Some(2));
        assert_eq!(flags.log_file, Some(PathBuf::from("quill.log")));
    }

    #[test]
    fn test_tab_width_rejects_out_of_range_values() {
        let args = vec!["--tab-width=99".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
        let args = vec!["--tab-width".to_string(), "wide".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
    }

    #[test]
    fn test_zero_tab_width_is_kept() {
        let args = vec!["--tab-width=0".to_string()];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.effective_tab_width(), 0);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_line_numbers: true,
            tab_width: Some(8),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            tab_width: Some(2),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_line_numbers);
        assert_eq!(merged.tab_width, Some(2));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            no_line_numbers: true,
            tab_width: Some(3),
            log_file: Some(PathBuf::from("quill.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}

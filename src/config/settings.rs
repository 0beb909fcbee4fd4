//! Runtime settings (blog.toml)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional settings file looked up in the base directory
pub const SETTINGS_FILE: &str = "blog.toml";

/// Settings that shape generation but are not stored in the database
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the blog database and the generated site
    #[serde(skip)]
    pub base_dir: PathBuf,

    /// Template directory, relative to the base directory unless absolute
    pub template_dir: PathBuf,

    /// Number of posts on the index page and in the RSS feed
    pub recent_posts: usize,

    /// syntect theme used for fenced code blocks
    pub highlight_theme: String,

    /// Render a line-number gutter next to highlighted code
    pub line_numbers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            template_dir: PathBuf::from("templates"),
            recent_posts: 10,
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: true,
        }
    }
}

impl Settings {
    /// Load settings for `base_dir`, falling back to defaults when no
    /// settings file exists
    pub fn load<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let path = base_dir.join(SETTINGS_FILE);

        let mut settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            toml::from_str::<Settings>(&content)
                .with_context(|| format!("Failed to parse {:?}", path))?
        } else {
            Settings::default()
        };

        settings.base_dir = base_dir;
        Ok(settings)
    }

    /// Absolute (or base-relative) template directory
    pub fn template_dir(&self) -> PathBuf {
        if self.template_dir.is_absolute() {
            self.template_dir.clone()
        } else {
            self.base_dir.join(&self.template_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.recent_posts, 10);
        assert_eq!(settings.base_dir, dir.path());
        assert_eq!(settings.template_dir(), dir.path().join("templates"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            "recent_posts = 5\ntemplate_dir = \"theme\"\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.recent_posts, 5);
        assert_eq!(settings.template_dir(), dir.path().join("theme"));
        assert!(settings.line_numbers);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "recent_posts = \"many\"").unwrap();
        assert!(Settings::load(dir.path()).is_err());
    }
}

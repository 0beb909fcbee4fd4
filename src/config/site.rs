//! Site configuration stored in the blog database

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::helpers::join_url;

/// Root folder seeded into a freshly created store
pub const DEFAULT_ROOT_FOLDER: &str = "blog";

/// The `config` table options, read once when the store is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Public base URL of the blog, including any leading folders
    pub host_url: String,
    /// Folder (relative to the base directory) the site is generated into
    pub root_folder: String,
}

impl SiteConfig {
    pub fn new(host_url: impl Into<String>, root_folder: impl Into<String>) -> Self {
        Self {
            host_url: host_url.into(),
            root_folder: root_folder.into(),
        }
    }

    /// Public URL of a post: host URL + root folder + `posts` + id
    pub fn post_url(&self, id: i64) -> String {
        join_url(
            &self.host_url,
            &[&self.root_folder, "posts", &id.to_string()],
        )
    }

    /// Output root of the generated site
    pub fn output_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.root_folder)
    }

    /// Output directory of a single post
    pub fn post_dir(&self, base_dir: &Path, id: i64) -> PathBuf {
        self.output_dir(base_dir).join("posts").join(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_url() {
        let config = SiteConfig::new("https://example.com/blog", DEFAULT_ROOT_FOLDER);
        assert_eq!(config.post_url(1), "https://example.com/blog/blog/posts/1");
    }

    #[test]
    fn test_post_url_without_host() {
        let config = SiteConfig::new("", "site");
        assert_eq!(config.post_url(12), "site/posts/12");
    }

    #[test]
    fn test_post_dir() {
        let config = SiteConfig::new("https://example.com", "blog");
        assert_eq!(
            config.post_dir(Path::new("/srv"), 4),
            PathBuf::from("/srv/blog/posts/4")
        );
    }
}

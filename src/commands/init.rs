//! Initialize a new blog

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::prompt::Prompt;
use crate::store::Store;
use crate::templates::DEFAULT_TEMPLATES;
use crate::Blog;

/// Create the blog database (if missing), scaffold the templates and
/// write the empty listings
///
/// Without `url`, the base URL is asked for through `prompt`.
pub fn init_blog(settings: Settings, url: Option<&str>, prompt: &mut dyn Prompt) -> Result<Blog> {
    let blog = if Store::exists(&settings.base_dir) {
        if url.is_some() {
            tracing::warn!("Blog already initialized, ignoring --url");
        }
        Blog::open(settings)?
    } else if let Some(url) = url {
        Blog::create(settings, url)?
    } else {
        Blog::open_or_create(settings, prompt)?
    };

    let written = scaffold_templates(&blog.settings.template_dir())?;
    if written > 0 {
        tracing::info!("Wrote {} default template(s)", written);
    }

    blog.generator()?.write_listings()?;
    Ok(blog)
}

/// Copy the built-in templates into `dir`, leaving existing files alone
///
/// Returns how many templates were written.
pub fn scaffold_templates(dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create dir {:?}", dir))?;

    let mut written = 0;
    for (name, content) in DEFAULT_TEMPLATES {
        let path = dir.join(name);
        if path.exists() {
            tracing::debug!("Keeping existing template {:?}", path);
            continue;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::no_prompt;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_init_with_url() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        let blog = init_blog(settings, Some("https://example.com"), &mut no_prompt).unwrap();

        assert_eq!(blog.store.config().host_url, "https://example.com");
        assert!(dir.path().join("blog.db").exists());
        for (name, _) in DEFAULT_TEMPLATES {
            assert!(dir.path().join("templates").join(name).exists());
        }
        assert!(dir.path().join("blog/index.html").exists());
    }

    #[test]
    fn test_init_prompts_for_url() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        let mut prompt = |_: &str| -> io::Result<String> { Ok(" https://asked.example \n".into()) };
        let blog = init_blog(settings, None, &mut prompt).unwrap();
        assert_eq!(blog.store.config().host_url, "https://asked.example");
    }

    #[test]
    fn test_init_twice_keeps_store() {
        let dir = TempDir::new().unwrap();
        init_blog(
            Settings::load(dir.path()).unwrap(),
            Some("https://first.example"),
            &mut no_prompt,
        )
        .unwrap();
        let blog = init_blog(
            Settings::load(dir.path()).unwrap(),
            Some("https://second.example"),
            &mut no_prompt,
        )
        .unwrap();
        assert_eq!(blog.store.config().host_url, "https://first.example");
    }

    #[test]
    fn test_scaffold_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("post_template.html");
        fs::write(&custom, "mine").unwrap();

        assert_eq!(scaffold_templates(dir.path()).unwrap(), 3);
        assert_eq!(fs::read_to_string(&custom).unwrap(), "mine");
        assert_eq!(scaffold_templates(dir.path()).unwrap(), 0);
    }
}

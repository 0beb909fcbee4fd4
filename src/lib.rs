//! blogdb: a static blog generator backed by a SQLite content store
//!
//! Markdown posts are rendered to HTML, stored with their images in a
//! single database file, and written out through Tera templates. Every
//! change regenerates the index page, RSS feed and archive.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod prompt;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use crate::config::Settings;
use crate::content::Post;
use crate::generator::Generator;
use crate::prompt::Prompt;
use crate::store::Store;

const URL_QUESTION: &str =
    "Please input the base URL of your blog (including any preceding folders)";

/// The blog application: runtime settings and the open content store
pub struct Blog {
    pub settings: Settings,
    pub store: Store,
}

impl Blog {
    /// Open the blog in `settings.base_dir`, failing if it has no database
    pub fn open(settings: Settings) -> Result<Self> {
        let store = Store::open(&settings.base_dir)?;
        Ok(Self { settings, store })
    }

    /// Create a new blog in `settings.base_dir` with the given base URL
    pub fn create(settings: Settings, host_url: &str) -> Result<Self> {
        let store = Store::create(&settings.base_dir, host_url.trim())?;
        Ok(Self { settings, store })
    }

    /// Open the blog, creating the database first if there is none
    ///
    /// A new database needs the base URL of the blog, which is asked for
    /// through `prompt`. An empty answer gives relative post URLs.
    pub fn open_or_create(settings: Settings, prompt: &mut dyn Prompt) -> Result<Self> {
        if Store::exists(&settings.base_dir) {
            return Self::open(settings);
        }
        let host_url = prompt.ask(URL_QUESTION)?;
        Self::create(settings, &host_url)
    }

    /// A generator writing into this blog's output folder
    pub fn generator(&self) -> Result<Generator<'_>> {
        Generator::new(&self.store, &self.settings)
    }

    /// Add a post from a markdown file
    pub fn add_post(
        &self,
        file: &Path,
        desc: Option<&str>,
        prompt: &mut dyn Prompt,
    ) -> Result<Post> {
        commands::add::run(self, file, desc, prompt)
    }

    /// Replace the source of post `id` with a markdown file
    pub fn update_post(
        &self,
        id: i64,
        file: &Path,
        desc: Option<&str>,
        prompt: &mut dyn Prompt,
    ) -> Result<Post> {
        commands::update::run(self, id, file, desc, prompt)
    }

    /// Rewrite every post and listing from the store
    pub fn update_all(&self, prompt: &mut dyn Prompt) -> Result<usize> {
        commands::update::run_all(self, prompt)
    }

    /// Remove post `id` and its generated pages
    pub fn remove_post(&self, id: i64) -> Result<bool> {
        commands::remove::run(self, id)
    }
}

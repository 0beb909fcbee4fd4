//! Generator module - writes post pages and regenerates the index, RSS
//! feed and archive from the store

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::content::{MarkdownRenderer, Post};
use crate::prompt::Prompt;
use crate::store::{self, PostFilter, Store};
use crate::templates::{Listing, PostData, SiteData, TemplateRenderer};

/// Rendered page of a post
pub const POST_PAGE: &str = "index.html";
/// Copy of a post's markdown source
pub const POST_SOURCE: &str = "post.md";

/// Static site generator over an open store
pub struct Generator<'a> {
    store: &'a Store,
    base_dir: PathBuf,
    recent_posts: usize,
    site: SiteData,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(store: &'a Store, settings: &Settings) -> Result<Self> {
        let templates = TemplateRenderer::load(&settings.template_dir())?;
        let markdown =
            MarkdownRenderer::with_options(&settings.highlight_theme, settings.line_numbers);

        Ok(Self {
            store,
            base_dir: settings.base_dir.clone(),
            recent_posts: settings.recent_posts,
            site: SiteData::new(store.config()),
            templates,
            markdown,
        })
    }

    /// Markdown renderer configured from the settings
    pub fn markdown(&self) -> &MarkdownRenderer {
        &self.markdown
    }

    /// Output directory of a post
    pub fn post_dir(&self, id: i64) -> PathBuf {
        self.store.config().post_dir(&self.base_dir, id)
    }

    /// Write `posts/<id>/index.html` and `posts/<id>/post.md` for a saved
    /// post whose rendered HTML is `content`
    ///
    /// Returns the post's output directory.
    pub fn publish_post(&self, post: &Post, content: &str) -> Result<PathBuf> {
        let dir = self.post_dir(post.id);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create dir {:?}", dir))?;

        let data = self.post_data(post, content.to_string());
        let html = self
            .templates
            .render_post(&data, &self.site)
            .with_context(|| format!("Failed to render post {}", post.id))?;

        write_file(&dir.join(POST_PAGE), html.as_bytes())?;
        write_file(&dir.join(POST_SOURCE), post.src())?;

        tracing::debug!("Published post {} to {:?}", post.id, dir);
        Ok(dir)
    }

    /// Regenerate the index and RSS feed from the most recent posts, and
    /// the archive from all of them
    pub fn write_listings(&self) -> Result<()> {
        let recent = self.listing_data(self.recent_posts)?;
        self.write_listing(Listing::Index, &recent)?;
        self.write_listing(Listing::Rss, &recent)?;

        let all = self.listing_data(0)?;
        self.write_listing(Listing::Archive, &all)?;

        tracing::info!(
            "Regenerated listings ({} recent, {} total)",
            recent.len(),
            all.len()
        );
        Ok(())
    }

    /// Re-render every stored post, rewrite its page, source and images,
    /// then regenerate the listings
    ///
    /// `prompt` is only asked for a title when a stored post has none and
    /// its source has no heading; the answer is saved to the store before
    /// the listings are written. Returns how many posts were written.
    pub fn rebuild_all(&self, prompt: &mut dyn Prompt) -> Result<usize> {
        let posts = self.store.get_posts(&PostFilter::All, 0)?;

        for stored in &posts {
            let mut post = stored.clone();
            let rendered = post
                .render(&self.markdown, prompt)
                .with_context(|| format!("Failed to render post {}", post.id))?;
            if post.title != stored.title {
                self.store.update_post(&post)?;
                tracing::info!("Saved title {:?} for post {}", post.title, post.id);
            }
            let dir = self.publish_post(&post, &rendered.content)?;

            let images = self.store.read_images(&post)?;
            store::write_images(&images, &dir)?;
        }

        self.write_listings()?;
        tracing::info!("Rebuilt {} post(s)", posts.len());
        Ok(posts.len())
    }

    /// Delete the output directory of a post
    ///
    /// Returns whether there was anything to delete.
    pub fn remove_output(&self, id: i64) -> Result<bool> {
        let dir = self.post_dir(id);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir).with_context(|| format!("Failed to remove {:?}", dir))?;
        tracing::debug!("Removed {:?}", dir);
        Ok(true)
    }

    fn write_listing(&self, listing: Listing, posts: &[PostData]) -> Result<()> {
        let output = self
            .templates
            .render_listing(listing, posts, &self.site)
            .with_context(|| format!("Failed to render {}", listing.file_name()))?;

        let dir = self.store.config().output_dir(&self.base_dir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create dir {:?}", dir))?;
        write_file(&dir.join(listing.file_name()), output.as_bytes())
    }

    fn listing_data(&self, limit: usize) -> Result<Vec<PostData>> {
        let posts = self.store.get_posts(&PostFilter::All, limit)?;
        Ok(posts
            .iter()
            .map(|post| {
                // The stored title is authoritative here, so only the body is
                // needed and no prompt can be triggered
                let content = self.markdown.parse(&post.source_text()).content;
                self.post_data(post, content)
            })
            .collect())
    }

    fn post_data(&self, post: &Post, content: String) -> PostData {
        PostData {
            id: post.id,
            title: post.title.clone(),
            desc: post.desc.clone(),
            date: post.date.clone(),
            url: self.store.config().post_url(post.id),
            content,
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

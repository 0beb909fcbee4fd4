//! Post and Image models

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::markdown::{is_image_name, MarkdownRenderer, RenderError, Rendered};
use super::IMAGE_DIR;
use crate::prompt::Prompt;

/// A blog post
///
/// `src` is the only source of truth: the rendered HTML, the image list and
/// (when the source opens with a heading) the title are all derived from it
/// by [`Post::render`]. The public URL depends on the store and is derived by
/// [`crate::config::SiteConfig::post_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    /// Store-assigned id, `0` until the post is inserted
    pub id: i64,

    /// Post title
    pub title: String,

    /// Optional summary
    pub desc: String,

    /// Date added, `YYYY-MM-DD`; set by the store on insertion
    pub date: String,

    /// Raw markdown source
    src: Vec<u8>,

    /// Directory of the source file, used to resolve image references
    loc: Option<PathBuf>,
}

impl Post {
    /// Create an unsaved post from raw source bytes
    pub fn new(src: impl Into<Vec<u8>>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    /// Read an unsaved post from a source file, remembering its directory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
        let abs = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {:?}", path))?;

        let mut post = Self::new(src);
        post.loc = abs.parent().map(Path::to_path_buf);
        Ok(post)
    }

    /// Rebuild a post from its stored columns
    pub fn hydrate(id: i64, title: String, desc: String, date: String, src: Vec<u8>) -> Self {
        Self {
            id,
            title,
            desc,
            date,
            src,
            loc: None,
        }
    }

    /// Raw source bytes
    pub fn src(&self) -> &[u8] {
        &self.src
    }

    /// Source decoded as text (invalid UTF-8 is replaced)
    pub fn source_text(&self) -> String {
        String::from_utf8_lossy(&self.src).into_owned()
    }

    /// Directory the source was read from, if it came from a file
    pub fn loc(&self) -> Option<&Path> {
        self.loc.as_deref()
    }

    pub fn set_loc(&mut self, loc: impl Into<PathBuf>) {
        self.loc = Some(loc.into());
    }

    /// Whether the store has assigned an id yet
    pub fn is_saved(&self) -> bool {
        self.id != 0
    }

    /// Derive title, HTML and image references from the source
    ///
    /// A leading level-1 heading always sets the title. Without one, an
    /// already known title is kept, and only an untitled post asks `prompt`.
    pub fn render(
        &mut self,
        renderer: &MarkdownRenderer,
        prompt: &mut dyn Prompt,
    ) -> Result<Rendered, RenderError> {
        let rendered = renderer
            .parse(&self.source_text())
            .into_rendered(Some(&self.title), prompt)?;
        self.title = rendered.title.clone();
        Ok(rendered)
    }

    /// Copy referenced images from the source directory into
    /// `<target_dir>/img/`, keeping their relative paths
    ///
    /// Unreadable images are logged and skipped. Returns how many were
    /// copied. The commands do not call this: they store images with
    /// [`crate::store::Store::add_images`] and write them back out with
    /// [`crate::store::write_images`], so a rebuild can restore them.
    pub fn copy_images(&self, images: &[String], target_dir: &Path) -> Result<usize> {
        if images.is_empty() {
            return Ok(0);
        }
        let Some(loc) = self.loc() else {
            tracing::warn!(
                "Post {} has no source directory, skipping {} image(s)",
                self.id,
                images.len()
            );
            return Ok(0);
        };

        let mut copied = 0;
        for name in images {
            if !is_image_name(name) {
                tracing::warn!("Image path {:?} leaves the image directory, skipping", name);
                continue;
            }
            let raw = match fs::read(loc.join(name)) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Could not access {}, skipping (error: {})", name, e);
                    continue;
                }
            };

            let output_path = target_dir.join(IMAGE_DIR).join(name);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create dir {:?}", parent))?;
            }
            fs::write(&output_path, raw)
                .with_context(|| format!("Failed to write {:?}", output_path))?;
            tracing::debug!("Copied image: {:?}", output_path);
            copied += 1;
        }

        Ok(copied)
    }
}

/// An image stored alongside a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Path relative to the post's `img/` directory
    pub name: String,

    /// Image bytes
    #[serde(skip)]
    pub raw: Vec<u8>,
}

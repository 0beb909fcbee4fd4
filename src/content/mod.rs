//! Content module - posts, images and markdown rendering

mod markdown;
mod post;

pub use markdown::{
    is_image_name, Document, MarkdownRenderer, RenderError, Rendered, IMAGE_PREFIX,
};
pub use post::{Image, Post};

/// Name of the per-post image directory in the generated site
pub const IMAGE_DIR: &str = "img";

//! Add a post from a markdown file

use anyhow::{Context, Result};
use std::path::Path;

use crate::content::Post;
use crate::prompt::Prompt;
use crate::store;
use crate::Blog;

/// Render, store and publish a new post, then regenerate the listings
pub fn run(blog: &Blog, file: &Path, desc: Option<&str>, prompt: &mut dyn Prompt) -> Result<Post> {
    let generator = blog.generator()?;

    let mut post = Post::from_file(file)?;
    if let Some(desc) = desc {
        post.desc = desc.to_string();
    }
    let rendered = post
        .render(generator.markdown(), prompt)
        .with_context(|| format!("Failed to render {:?}", file))?;

    let post = blog.store.add_post(post)?;
    blog.store.add_images(&post, &rendered.images)?;
    let images = blog.store.read_images(&post)?;

    let dir = generator.publish_post(&post, &rendered.content)?;
    store::write_images(&images, &dir)?;
    generator.write_listings()?;

    tracing::info!(
        "Added post {} ({:?}) at {}",
        post.id,
        post.title,
        blog.store.config().post_url(post.id)
    );
    Ok(post)
}

//! Remove a post

use anyhow::Result;

use crate::content::Post;
use crate::Blog;

/// Delete post `id`, its generated pages, and regenerate the listings
///
/// Images stored for the post are kept in the database. Returns whether the
/// post existed.
pub fn run(blog: &Blog, id: i64) -> Result<bool> {
    let mut post = Post::default();
    post.id = id;

    let removed = blog.store.remove_post(&post)?;
    if !removed {
        tracing::warn!("No post with id {}, nothing removed", id);
    }

    let generator = blog.generator()?;
    generator.remove_output(id)?;
    generator.write_listings()?;

    if removed {
        tracing::info!("Removed post {}", id);
    }
    Ok(removed)
}

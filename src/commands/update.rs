//! Update a post from a new source file, or rebuild the whole site

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::content::Post;
use crate::prompt::Prompt;
use crate::store::{self, PostFilter};
use crate::Blog;

/// Replace the stored source of post `id` and republish it
///
/// Without a heading in the new source the stored title is kept. The
/// description is only changed when `desc` is given. Images newly
/// referenced by the source are added to the store; stored ones stay.
pub fn run(
    blog: &Blog,
    id: i64,
    file: &Path,
    desc: Option<&str>,
    prompt: &mut dyn Prompt,
) -> Result<Post> {
    let Some(existing) = blog
        .store
        .get_posts(&PostFilter::ById(id), 1)?
        .into_iter()
        .next()
    else {
        bail!("No post with id {}", id);
    };

    let generator = blog.generator()?;

    let mut post = Post::from_file(file)?;
    post.id = existing.id;
    post.title = existing.title;
    post.date = existing.date;
    post.desc = match desc {
        Some(desc) => desc.to_string(),
        None => existing.desc,
    };
    let rendered = post
        .render(generator.markdown(), prompt)
        .with_context(|| format!("Failed to render {:?}", file))?;

    blog.store.update_post(&post)?;

    let stored = blog.store.read_images(&post)?;
    let new_images: Vec<String> = rendered
        .images
        .iter()
        .filter(|name| !stored.iter().any(|image| &image.name == *name))
        .cloned()
        .collect();
    blog.store.add_images(&post, &new_images)?;
    let images = blog.store.read_images(&post)?;

    let dir = generator.publish_post(&post, &rendered.content)?;
    store::write_images(&images, &dir)?;
    generator.write_listings()?;

    tracing::info!("Updated post {} ({:?})", post.id, post.title);
    Ok(post)
}

/// Re-render every post and regenerate the listings without changing any
/// stored content
pub fn run_all(blog: &Blog, prompt: &mut dyn Prompt) -> Result<usize> {
    blog.generator()?.rebuild_all(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::commands::testing::{blog, no_prompt};
    use std::fs;

    #[test]
    fn test_update_post() {
        let (dir, blog) = blog();
        let file = dir.path().join("post.md");
        fs::write(&file, "# Before\nold body").unwrap();
        let added = add::run(&blog, &file, Some("kept"), &mut no_prompt).unwrap();

        fs::write(&file, "# After\nnew body").unwrap();
        let updated = run(&blog, added.id, &file, None, &mut no_prompt).unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.desc, "kept");
        assert_eq!(updated.date, added.date);

        let posts = blog.store.get_posts(&PostFilter::ById(added.id), 0).unwrap();
        assert_eq!(posts[0].title, "After");
        assert_eq!(posts[0].src(), b"# After\nnew body");

        let html = fs::read_to_string(dir.path().join("blog/posts/1/index.html")).unwrap();
        assert!(html.contains("<p>new body</p>"));
        let archive = fs::read_to_string(dir.path().join("blog/archive.html")).unwrap();
        assert!(archive.contains("After"));
        assert!(!archive.contains("Before"));
    }

    #[test]
    fn test_update_keeps_title_without_heading() {
        let (dir, blog) = blog();
        let file = dir.path().join("post.md");
        fs::write(&file, "# Title\nbody").unwrap();
        let added = add::run(&blog, &file, None, &mut no_prompt).unwrap();

        fs::write(&file, "headless body").unwrap();
        let updated = run(&blog, added.id, &file, Some("new desc"), &mut no_prompt).unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.desc, "new desc");
    }

    #[test]
    fn test_update_adds_new_images_only() {
        let (dir, blog) = blog();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::write(dir.path().join("b.png"), b"b").unwrap();
        let file = dir.path().join("post.md");
        fs::write(&file, "# P\n![a](img/a.png)").unwrap();
        let added = add::run(&blog, &file, None, &mut no_prompt).unwrap();

        fs::write(&file, "# P\n![a](img/a.png) ![b](img/b.png)").unwrap();
        run(&blog, added.id, &file, None, &mut no_prompt).unwrap();

        let names: Vec<String> = blog
            .store
            .read_images(&added)
            .unwrap()
            .into_iter()
            .map(|image| image.name)
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert!(dir.path().join("blog/posts/1/img/b.png").exists());
    }

    #[test]
    fn test_update_missing_post() {
        let (dir, blog) = blog();
        let file = dir.path().join("post.md");
        fs::write(&file, "# X\ny").unwrap();
        assert!(run(&blog, 5, &file, None, &mut no_prompt).is_err());
        assert!(!dir.path().join("blog/posts/5").exists());
    }

    #[test]
    fn test_update_all() {
        let (dir, blog) = blog();
        let file = dir.path().join("post.md");
        fs::write(&file, "# One\nfirst").unwrap();
        add::run(&blog, &file, None, &mut no_prompt).unwrap();
        fs::write(&file, "# Two\nsecond").unwrap();
        add::run(&blog, &file, None, &mut no_prompt).unwrap();

        fs::remove_dir_all(dir.path().join("blog")).unwrap();
        assert_eq!(run_all(&blog, &mut no_prompt).unwrap(), 2);

        for id in ["1", "2"] {
            let out = dir.path().join("blog/posts").join(id);
            assert!(out.join("index.html").exists());
            assert!(out.join("post.md").exists());
        }
        assert!(dir.path().join("blog/index.html").exists());
        assert!(dir.path().join("blog/feed.rss").exists());
        assert!(dir.path().join("blog/archive.html").exists());
    }
}

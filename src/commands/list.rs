//! List stored posts

use anyhow::Result;
use serde::Serialize;

use crate::store::PostFilter;
use crate::Blog;

/// One line of `list` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub desc: String,
    pub url: String,
}

/// Posts newest first, at most `limit` of them (`0` for all)
pub fn entries(blog: &Blog, limit: usize) -> Result<Vec<Entry>> {
    let config = blog.store.config();
    let posts = blog.store.get_posts(&PostFilter::All, limit)?;
    Ok(posts
        .into_iter()
        .map(|post| Entry {
            url: config.post_url(post.id),
            id: post.id,
            date: post.date,
            title: post.title,
            desc: post.desc,
        })
        .collect())
}

/// Print posts as text or JSON
pub fn run(blog: &Blog, limit: usize, json: bool) -> Result<()> {
    let entries = entries(blog, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Posts ({}):", entries.len());
    for entry in entries {
        println!(
            "  {:>4}  {} - {} [{}]",
            entry.id, entry.date, entry.title, entry.url
        );
    }
    Ok(())
}

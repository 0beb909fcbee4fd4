//! Post listing filters
//!
//! A listing matches on at most one column. When a filter is built from an
//! example post, the title wins over the date, and the date over the id.

use rusqlite::types::Value;

use crate::content::Post;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post
    #[default]
    All,
    ByTitle(String),
    ByDate(String),
    ById(i64),
}

impl PostFilter {
    /// Query-by-example: the first non-empty field of `title`, `date`, `id`
    pub fn from_example(post: &Post) -> Self {
        if !post.title.is_empty() {
            PostFilter::ByTitle(post.title.clone())
        } else if !post.date.is_empty() {
            PostFilter::ByDate(post.date.clone())
        } else if post.id != 0 {
            PostFilter::ById(post.id)
        } else {
            PostFilter::All
        }
    }

    /// The `WHERE` predicate and its single bound value
    pub(crate) fn predicate(&self) -> Option<(&'static str, Value)> {
        match self {
            PostFilter::All => None,
            PostFilter::ByTitle(title) => Some(("title = ?", Value::Text(title.clone()))),
            PostFilter::ByDate(date) => Some(("date_added = ?", Value::Text(date.clone()))),
            PostFilter::ById(id) => Some(("id = ?", Value::Integer(*id))),
        }
    }
}

impl From<&Post> for PostFilter {
    fn from(post: &Post) -> Self {
        PostFilter::from_example(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_example_matches_all() {
        assert_eq!(PostFilter::from_example(&Post::new("")), PostFilter::All);
        assert!(PostFilter::All.predicate().is_none());
    }

    #[test]
    fn test_title_beats_date_and_id() {
        let mut post = Post::new("");
        post.id = 4;
        post.date = "2024-01-01".to_string();
        post.title = "Hello".to_string();
        assert_eq!(
            PostFilter::from_example(&post),
            PostFilter::ByTitle("Hello".to_string())
        );
    }

    #[test]
    fn test_date_beats_id() {
        let mut post = Post::new("");
        post.id = 4;
        post.date = "2024-01-01".to_string();
        assert_eq!(
            PostFilter::from(&post),
            PostFilter::ByDate("2024-01-01".to_string())
        );
    }

    #[test]
    fn test_id_only() {
        let mut post = Post::new("");
        post.id = 9;
        let filter = PostFilter::from_example(&post);
        assert_eq!(filter, PostFilter::ById(9));
        assert_eq!(filter.predicate(), Some(("id = ?", Value::Integer(9))));
    }
}

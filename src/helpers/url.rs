//! URL helper functions

/// Append path segments to a base URL
///
/// Empty segments are skipped and slashes at the seams are collapsed, so the
/// base may or may not carry a trailing slash. An empty base yields a
/// relative path.
///
/// # Examples
/// ```ignore
/// join_url("https://example.com/blog/", &["blog", "posts", "1"])
/// // -> "https://example.com/blog/blog/posts/1"
/// ```
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();

    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !url.is_empty() {
            url.push('/');
        }
        url.push_str(segment);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://example.com/blog", &["blog", "posts", "1"]),
            "https://example.com/blog/blog/posts/1"
        );
    }

    #[test]
    fn test_join_url_trailing_slashes() {
        assert_eq!(
            join_url("https://example.com/", &["/blog/", "posts", "7"]),
            "https://example.com/blog/posts/7"
        );
    }

    #[test]
    fn test_join_url_empty_base() {
        assert_eq!(join_url("", &["blog", "posts", "3"]), "blog/posts/3");
    }

    #[test]
    fn test_join_url_skips_empty_segments() {
        assert_eq!(join_url("https://a.b", &["", "posts"]), "https://a.b/posts");
    }
}

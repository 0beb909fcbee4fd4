//! Post, index, archive and RSS templates using the Tera template engine
//!
//! Each template is read from the blog's template directory when present
//! there and otherwise taken from the defaults embedded in the binary.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{self, join_url};

pub const POST_TEMPLATE: &str = "post_template.html";
pub const INDEX_TEMPLATE: &str = "index_template.html";
pub const ARCHIVE_TEMPLATE: &str = "archive_template.html";
pub const RSS_TEMPLATE: &str = "rss_template.rss";

/// Built-in templates, by name
pub const DEFAULT_TEMPLATES: [(&str, &str); 4] = [
    (POST_TEMPLATE, include_str!("defaults/post_template.html")),
    (INDEX_TEMPLATE, include_str!("defaults/index_template.html")),
    (ARCHIVE_TEMPLATE, include_str!("defaults/archive_template.html")),
    (RSS_TEMPLATE, include_str!("defaults/rss_template.rss")),
];

/// The aggregate pages regenerated after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Index,
    Rss,
    Archive,
}

impl Listing {
    pub fn template(self) -> &'static str {
        match self {
            Listing::Index => INDEX_TEMPLATE,
            Listing::Rss => RSS_TEMPLATE,
            Listing::Archive => ARCHIVE_TEMPLATE,
        }
    }

    /// File name under the site root
    pub fn file_name(self) -> &'static str {
        match self {
            Listing::Index => "index.html",
            Listing::Rss => "feed.rss",
            Listing::Archive => "archive.html",
        }
    }
}

/// Template renderer
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load the four templates, preferring files in `template_dir`
    pub fn load(template_dir: &Path) -> Result<Self> {
        let mut sources = Vec::with_capacity(DEFAULT_TEMPLATES.len());
        for (name, default) in DEFAULT_TEMPLATES {
            let path = template_dir.join(name);
            let source = if path.is_file() {
                tracing::debug!("Using template {:?}", path);
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template {:?}", path))?
            } else {
                default.to_string()
            };
            sources.push((name, source));
        }

        let mut tera = Tera::default();

        // Post content is already HTML; templates escape plain-text fields
        // themselves
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(sources)?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("rfc2822", rfc2822_filter);

        Ok(Self { tera })
    }

    /// Render a single post page
    pub fn render_post(&self, post: &PostData, site: &SiteData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        Ok(self.tera.render(POST_TEMPLATE, &context)?)
    }

    /// Render one of the aggregate pages over `posts`, in the given order
    pub fn render_listing(
        &self,
        listing: Listing,
        posts: &[PostData],
        site: &SiteData,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", posts);
        Ok(self.tera.render(listing.template(), &context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result.trim().to_string()))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: `YYYY-MM-DD` to RFC 2822, for RSS dates
fn rfc2822_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("rfc2822", "value", String, value);
    helpers::rfc2822(&s)
        .map(tera::Value::String)
        .ok_or_else(|| tera::Error::msg(format!("rfc2822: not a date: {:?}", s)))
}

/// A post as the templates see it
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub id: i64,
    pub title: String,
    pub desc: String,
    pub date: String,
    pub url: String,
    pub content: String,
}

/// Site-wide values available to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub host_url: String,
    pub root_folder: String,
    pub index_url: String,
    pub archive_url: String,
    pub feed_url: String,
    /// Date the pages were generated, `YYYY-MM-DD`
    pub generated: String,
}

impl SiteData {
    pub fn new(config: &SiteConfig) -> Self {
        let page_url = |listing: Listing| {
            join_url(&config.host_url, &[&config.root_folder, listing.file_name()])
        };
        Self {
            host_url: config.host_url.clone(),
            root_folder: config.root_folder.clone(),
            index_url: page_url(Listing::Index),
            archive_url: page_url(Listing::Archive),
            feed_url: page_url(Listing::Rss),
            generated: helpers::today(),
        }
    }
}

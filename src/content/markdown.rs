//! Markdown rendering with title extraction, image discovery and syntax
//! highlighting

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use std::collections::HashSet;
use std::path::{Component, Path};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use thiserror::Error;

use crate::prompt::{ask_non_empty, Prompt};

/// Destination prefix marking a reference as a post image
pub const IMAGE_PREFIX: &str = "img/";

const TITLE_QUESTION: &str = "Please input a title for this post";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not read a title for the post: {0}")]
    TitlePrompt(#[from] std::io::Error),
}

/// A parsed post source, before its title is settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Text of the leading level-1 heading, if the source starts with one
    pub heading: Option<String>,
    /// HTML of everything but the leading heading
    pub content: String,
    /// Image paths referenced as `img/<path>`, prefix stripped, first-seen order
    pub images: Vec<String>,
}

/// Everything derived from a post source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

impl Document {
    /// Settle the title: the heading wins, then `known_title` if non-empty,
    /// then whatever `prompt` answers (asked until non-empty)
    pub fn into_rendered(
        self,
        known_title: Option<&str>,
        prompt: &mut dyn Prompt,
    ) -> Result<Rendered, RenderError> {
        let title = match (self.heading, known_title.map(str::trim)) {
            (Some(heading), _) => heading,
            (None, Some(known)) if !known.is_empty() => known.to_string(),
            (None, _) => ask_non_empty(prompt, TITLE_QUESTION)?,
        };

        Ok(Rendered {
            title,
            content: self.content,
            images: self.images,
        })
    }
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render a post source, asking `prompt` for a title when the source
    /// does not open with a level-1 heading
    pub fn render(&self, markdown: &str, prompt: &mut dyn Prompt) -> Result<Rendered, RenderError> {
        self.parse(markdown).into_rendered(None, prompt)
    }

    /// Parse a post source. Pure: the same input always gives the same
    /// [`Document`].
    pub fn parse(&self, markdown: &str) -> Document {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION;
        let parser = Parser::new_ext(markdown, options);

        // Definitions are known before the first event; they compete on
        // source position with the links that use them.
        let mut found: Vec<(usize, String)> = parser
            .reference_definitions()
            .iter()
            .filter_map(|(_, def)| image_path(&def.dest).map(|path| (def.span.start, path)))
            .collect();

        let mut events: Vec<Event> = Vec::new();
        let mut heading: Option<String> = None;
        let mut in_heading = false;
        let mut first = true;
        let mut code_block: Option<(Option<String>, String)> = None;

        for (event, range) in parser.into_offset_iter() {
            if let Event::Start(Tag::Image { dest_url, .. } | Tag::Link { dest_url, .. }) = &event
            {
                if let Some(path) = image_path(dest_url) {
                    found.push((range.start, path));
                }
            }

            if first {
                first = false;
                if let Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    ..
                }) = event
                {
                    in_heading = true;
                    heading = Some(String::new());
                    continue;
                }
            }

            if in_heading {
                match event {
                    Event::End(TagEnd::Heading(_)) => in_heading = false,
                    Event::Text(text) | Event::Code(text) => {
                        if let Some(h) = heading.as_mut() {
                            h.push_str(&text);
                        }
                    }
                    Event::SoftBreak | Event::HardBreak => {
                        if let Some(h) = heading.as_mut() {
                            h.push(' ');
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if let Some((lang, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                            lang.split_whitespace().next().map(str::to_string)
                        }
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Document {
            heading: heading
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty()),
            content: html_output,
            images: first_seen(found),
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `img/<path>` -> `<path>`, for paths that stay inside `img/`
fn image_path(dest: &str) -> Option<String> {
    dest.strip_prefix(IMAGE_PREFIX)
        .filter(|rest| is_image_name(rest))
        .map(str::to_string)
}

/// Whether `name` is a non-empty relative path made of plain segments only
/// (no `..`, no root, no drive prefix)
pub fn is_image_name(name: &str) -> bool {
    let path = Path::new(name);
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Order by source offset and drop repeats
fn first_seen(mut found: Vec<(usize, String)>) -> Vec<String> {
    found.sort_by_key(|(offset, _)| *offset);
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter_map(|(_, path)| seen.insert(path.clone()).then_some(path))
        .collect()
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn no_prompt() -> impl FnMut(&str) -> io::Result<String> {
        |_: &str| -> io::Result<String> { panic!("title prompt should not be used") }
    }

    #[test]
    fn test_heading_becomes_title() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer.render("# Hello\nWorld", &mut no_prompt()).unwrap();
        assert_eq!(rendered.title, "Hello");
        assert_eq!(rendered.content, "<p>World</p>\n");
        assert!(rendered.images.is_empty());
    }

    #[test]
    fn test_heading_is_removed_from_content() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer
            .render("#   Spaced *Title*   \n\nBody text.\n\n# Later", &mut no_prompt())
            .unwrap();
        assert_eq!(rendered.title, "Spaced Title");
        assert!(!rendered.content.contains("Spaced"));
        assert!(rendered.content.contains("<p>Body text.</p>"));
        // only the leading heading is taken
        assert!(rendered.content.contains("<h1>Later</h1>"));
    }

    #[test]
    fn test_setext_heading() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer
            .render("Underlined\n==========\n\ntext", &mut no_prompt())
            .unwrap();
        assert_eq!(rendered.title, "Underlined");
        assert_eq!(rendered.content, "<p>text</p>\n");
    }

    #[test]
    fn test_missing_heading_asks_once() {
        let renderer = MarkdownRenderer::new();
        let mut asked = 0;
        let mut prompt = |_: &str| {
            asked += 1;
            Ok::<_, io::Error>("Supplied".to_string())
        };
        let rendered = renderer.render("Just a paragraph.", &mut prompt).unwrap();
        assert_eq!(asked, 1);
        assert_eq!(rendered.title, "Supplied");
        assert_eq!(rendered.content, "<p>Just a paragraph.</p>\n");
    }

    #[test]
    fn test_second_level_heading_is_not_a_title() {
        let renderer = MarkdownRenderer::new();
        let mut asked = 0;
        let mut prompt = |_: &str| {
            asked += 1;
            Ok::<_, io::Error>("Asked".to_string())
        };
        let rendered = renderer.render("## Section\n\ntext", &mut prompt).unwrap();
        assert_eq!(asked, 1);
        assert_eq!(rendered.title, "Asked");
        assert!(rendered.content.contains("<h2>Section</h2>"));
    }

    #[test]
    fn test_known_title_skips_prompt() {
        let renderer = MarkdownRenderer::new();
        let rendered = renderer
            .parse("no heading here")
            .into_rendered(Some("Stored"), &mut no_prompt())
            .unwrap();
        assert_eq!(rendered.title, "Stored");
    }

    #[test]
    fn test_prompt_failure_is_an_error() {
        let renderer = MarkdownRenderer::new();
        let mut prompt =
            |_: &str| Err::<String, _>(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"));
        assert!(matches!(
            renderer.render("body", &mut prompt),
            Err(RenderError::TitlePrompt(_))
        ));
    }

    #[test]
    fn test_image_references() {
        let renderer = MarkdownRenderer::new();
        let source = "# Pics\n\n\
            ![x](img/cat.png) and [doc](img/sub/a.pdf)\n\n\
            ![far](https://example.com/img/no.png) ![near](other/img/q.png)\n\n\
            ![r][dog] ![again](img/cat.png)\n\n\
            [dog]: img/dog.jpg\n\
            [unused]: img/bird.gif\n\
            [site]: https://example.com\n";
        let doc = renderer.parse(source);
        assert_eq!(doc.images, vec!["cat.png", "sub/a.pdf", "dog.jpg", "bird.gif"]);
    }

    #[test]
    fn test_image_prefix_must_lead() {
        let renderer = MarkdownRenderer::new();
        let doc = renderer.parse("![a](./img/a.png) ![b](img/) ![c](imgs/c.png)");
        assert!(doc.images.is_empty());
    }

    #[test]
    fn test_image_paths_outside_img_are_dropped() {
        let renderer = MarkdownRenderer::new();
        let doc = renderer.parse(
            "![a](img/../index.html) ![b](img//etc/passwd) ![c](img/sub/../../x.png)\n\n\
             ![ok](img/sub/ok.png)\n\n\
             [ref]: img/../../secret.txt\n",
        );
        assert_eq!(doc.images, vec!["sub/ok.png"]);
    }

    #[test]
    fn test_is_image_name() {
        assert!(is_image_name("cat.png"));
        assert!(is_image_name("deep/cat.png"));
        assert!(!is_image_name(""));
        assert!(!is_image_name("../cat.png"));
        assert!(!is_image_name("a/../../cat.png"));
        assert!(!is_image_name("/abs/cat.png"));
    }

    #[test]
    fn test_image_in_title_is_recorded() {
        let renderer = MarkdownRenderer::new();
        let doc = renderer.parse("# Title ![icon](img/icon.png)\n\nbody");
        assert_eq!(doc.heading.as_deref(), Some("Title icon"));
        assert_eq!(doc.images, vec!["icon.png"]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = MarkdownRenderer::new();
        let source = "# Same\n\nSome *text* with ![a](img/a.png).\n\n```rust\nfn main() {}\n```\n";
        let first = renderer.render(source, &mut no_prompt()).unwrap();
        let second = renderer.render(source, &mut no_prompt()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let doc = renderer.parse("```rust\nfn main() {}\n```");
        assert!(doc.content.contains("highlight"));
        assert!(doc.content.contains("line-number"));
        assert!(doc.heading.is_none());
    }

    #[test]
    fn test_code_block_without_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false);
        let doc = renderer.parse("    indented <code>\n");
        assert!(doc.content.contains(r#"<pre><code class="language-text">"#));
        assert!(!doc.content.contains("line-number"));
        assert!(doc.content.contains("&lt;code&gt;"));
    }
}

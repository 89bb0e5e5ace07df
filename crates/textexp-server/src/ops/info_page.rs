//! Info page template.
//!
//! Placeholders are `{{tool}}`, `{{version}}`, `{{commit}}`, `{{branch}}` and
//! `{{build}}` (` (commit:.. branch:..)` or empty). Values are HTML-escaped.
//! An unknown or unterminated placeholder is a template error.

use textexp_core::error::{Result, TextExpError};
use textexp_core::About;

pub const INFO_TEMPLATE: &str = include_str!("../../templates/info.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Tool,
    Version,
    Commit,
    Branch,
    Build,
}

#[derive(Debug, PartialEq, Eq)]
enum Part<'a> {
    Text(&'a str),
    Field(Field),
}

/// Parsed template, borrowing from its source.
#[derive(Debug)]
pub struct Template<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Template<'a> {
    pub fn parse(src: &'a str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut rest = src;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                parts.push(Part::Text(&rest[..open]));
            }
            let after = &rest[open + 2..];
            let close = after.find("}}").ok_or_else(|| {
                TextExpError::Template(format!(
                    "unterminated placeholder at byte {}",
                    src.len() - rest.len() + open
                ))
            })?;
            let field = match after[..close].trim() {
                "tool" => Field::Tool,
                "version" => Field::Version,
                "commit" => Field::Commit,
                "branch" => Field::Branch,
                "build" => Field::Build,
                other => {
                    return Err(TextExpError::Template(format!(
                        "unknown placeholder {other:?}"
                    )))
                }
            };
            parts.push(Part::Field(field));
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            parts.push(Part::Text(rest));
        }

        Ok(Self { parts })
    }

    pub fn render(&self, about: &About) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(t) => out.push_str(t),
                Part::Field(Field::Tool) => push_escaped(&mut out, &about.tool),
                Part::Field(Field::Version) => push_escaped(&mut out, &about.version),
                Part::Field(Field::Commit) => push_escaped(&mut out, &about.commit),
                Part::Field(Field::Branch) => push_escaped(&mut out, &about.branch),
                Part::Field(Field::Build) => {
                    if !about.commit.is_empty() {
                        out.push_str(" (commit:");
                        push_escaped(&mut out, &about.commit);
                        out.push_str(" branch:");
                        push_escaped(&mut out, &about.branch);
                        out.push(')');
                    }
                }
            }
        }
        out
    }
}

/// Parse and render in one go.
pub fn render(src: &str, about: &About) -> Result<String> {
    Ok(Template::parse(src)?.render(about))
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_template_renders() {
        let about = About::new("Text Exporter", "0.3.0");
        let html = render(INFO_TEMPLATE, &about).unwrap();
        assert!(html.contains("<title>Text Exporter</title>"));
        assert!(html.contains("Version 0.3.0</p>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn build_details_only_with_commit() {
        let t = Template::parse("v{{version}}{{build}}").unwrap();
        let plain = About::new("Text Exporter", "0.3.0");
        assert_eq!(t.render(&plain), "v0.3.0");

        let stamped = plain.with_build("abc123", "main");
        assert_eq!(t.render(&stamped), "v0.3.0 (commit:abc123 branch:main)");
    }

    #[test]
    fn values_are_escaped() {
        let about = About::new("<b>Tool</b> & co", "1");
        let out = render("{{ tool }}", &about).unwrap();
        assert_eq!(out, "&lt;b&gt;Tool&lt;/b&gt; &amp; co");
    }

    #[test]
    fn parse_errors() {
        assert!(Template::parse("{{tool").is_err());
        let err = Template::parse("{{nope}}").unwrap_err();
        assert_eq!(err.code().as_str(), "TEMPLATE");
    }
}

//! Broken asset-link scanner for rendered pages.
//!
//! Checks the local targets of `<a href>`, `<link href>`, every `src`, and
//! SVG `<use href|xlink:href>`, walking the page as `quick_xml` events.
//! External links are skipped; absolute paths are reported because the pages
//! are opened straight from disk.

use crate::log;
use anyhow::{Context, Result, anyhow};
use quick_xml::{
    Reader,
    escape::unescape,
    events::{BytesStart, Event},
};
use regex::Regex;
use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use walkdir::WalkDir;

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Elements whose body is text, never markup.
const RAW_TEXT: [&str; 4] = ["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    AbsolutePath,
    NotFound(PathBuf),
}

/// One broken link in one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub tag: String,
    pub attr: String,
    pub link: String,
    pub problem: Problem,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  <{}> {}=\"{}\"\n  → ", self.tag, self.attr, self.link)?;
        match &self.problem {
            Problem::AbsolutePath => write!(f, "absolute path is not allowed"),
            Problem::NotFound(path) => write!(f, "file not found: {}", path.display()),
        }
    }
}

fn is_external(link: &str) -> bool {
    ["http://", "https://", "//", "mailto:", "tel:", "#"]
        .iter()
        .any(|prefix| link.starts_with(prefix))
        || SCHEME.is_match(link)
}

/// Check a single link found in a page living in `base`.
fn check_link(base: &Path, tag: &str, attr: &str, link: &str) -> Option<Finding> {
    let link = link.trim();
    if link.is_empty() || is_external(link) {
        return None;
    }

    let problem = if link.starts_with('/') {
        Problem::AbsolutePath
    } else {
        let target = link.split(['#', '?']).next().unwrap_or(link);
        if target.is_empty() {
            return None;
        }
        let resolved = base.join(target);
        if resolved.exists() {
            return None;
        }
        Problem::NotFound(resolved)
    };

    Some(Finding {
        tag: tag.to_owned(),
        attr: attr.to_owned(),
        link: link.to_owned(),
        problem,
    })
}

fn html_reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

/// Broken links in `html`, relative links resolved against `base`.
///
/// Comments are skipped by the reader. Raw-text bodies (`<script>`,
/// `<style>`, ...) are jumped over by restarting the reader at their
/// closing tag, so markup-looking strings inside them are never scanned.
pub fn scan_html(html: &str, base: &Path) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    let mut rest = html;

    'chunks: loop {
        let offset = html.len() - rest.len();
        let mut reader = html_reader(rest);

        loop {
            let event = reader.read_event().map_err(|err| {
                anyhow!(
                    "HTML parse error at byte {}: {err}",
                    offset + reader.error_position() as usize
                )
            })?;

            match event {
                Event::Start(elem) => {
                    findings.extend(check_element(&elem, base));
                    if let Some(tag) = raw_text_tag(&elem) {
                        let body = reader.buffer_position() as usize;
                        let Some(close) = find_closing_tag(&rest[body..], tag) else {
                            break 'chunks;
                        };
                        rest = &rest[body + close..];
                        continue 'chunks;
                    }
                }
                Event::Empty(elem) => findings.extend(check_element(&elem, base)),
                Event::Eof => break 'chunks,
                _ => {}
            }
        }
    }
    Ok(findings)
}

fn raw_text_tag(elem: &BytesStart<'_>) -> Option<&'static str> {
    let name = elem.name();
    RAW_TEXT
        .into_iter()
        .find(|tag| name.as_ref().eq_ignore_ascii_case(tag.as_bytes()))
}

/// Byte offset of `</tag` in `text`, ignoring case.
fn find_closing_tag(text: &str, tag: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(&format!("</{tag}"))
}

/// Link attributes of one element, checked against the disk.
fn check_element(elem: &BytesStart<'_>, base: &Path) -> Vec<Finding> {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).to_ascii_lowercase();
    let attrs: Vec<(String, String)> = elem
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_or_else(|_| raw.to_string(), |v| v.into_owned());
            (key, value)
        })
        .collect();
    let value_of = |key: &str| {
        attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let mut findings = Vec::new();
    if matches!(tag.as_str(), "a" | "link")
        && let Some(href) = value_of("href")
    {
        findings.extend(check_link(base, &tag, "href", href));
    }
    if let Some(src) = value_of("src") {
        findings.extend(check_link(base, &tag, "src", src));
    }
    if tag == "use"
        && let Some(href) = value_of("href").or_else(|| value_of("xlink:href"))
    {
        let file = href.split('#').next().unwrap_or_default();
        findings.extend(check_link(base, &tag, "href", file));
    }
    findings
}

/// Per-page findings for every `*.html` under a directory, sorted by path.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub pages: BTreeMap<PathBuf, Vec<Finding>>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.pages.values().all(Vec::is_empty)
    }

    pub fn broken_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Print one status line per page, followed by its findings.
    pub fn log(&self) {
        for (page, findings) in &self.pages {
            if findings.is_empty() {
                log!("ok"; "{}", page.display());
                continue;
            }
            let details = findings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            log!("broken"; "{}\n{details}", page.display());
        }
    }
}

/// Scan every rendered page below `sites`.
pub fn check_sites(sites: &Path) -> Result<LinkReport> {
    let mut report = LinkReport::default();

    for entry in WalkDir::new(sites).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let html = String::from_utf8_lossy(&bytes);
        let base = path.parent().unwrap_or(sites);
        let findings = scan_html(&html, base)
            .with_context(|| format!("failed to scan {}", path.display()))?;
        report.pages.insert(path.to_path_buf(), findings);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/logo.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("consular_en.html"), "").unwrap();
        dir
    }

    #[test]
    fn test_skips_external_links() {
        let dir = site();
        let html = r##"
            <a href="https://example.com">x</a>
            <a href="//cdn.example.com/a.js">x</a>
            <a href="mailto:info@example.com">x</a>
            <a href="tel:+380000000">x</a>
            <a href="#contacts">x</a>
            <img src="data:image/png;base64,AAAA">
            <a href="">x</a>
        "##;
        assert!(scan_html(html, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_existing_relative_links() {
        let dir = site();
        let html = r#"
            <a href="consular_en.html#top">EN</a>
            <img src='img/logo.svg' alt="logo">
            <svg><use xlink:href="img/logo.svg#icon"></use></svg>
        "#;
        assert!(scan_html(html, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_absolute_path_reported() {
        let dir = site();
        let findings = scan_html(r#"<link rel="stylesheet" href="/site.css">"#, dir.path()).unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].tag, "link");
        assert_eq!(findings[0].problem, Problem::AbsolutePath);
        assert!(findings[0].to_string().contains("absolute path is not allowed"));
    }

    #[test]
    fn test_missing_files_reported() {
        let dir = site();
        let html = r#"<script src="js/app.js"></script><svg><use href="img/sprite.svg#x"/></svg>"#;

        let findings = scan_html(html, dir.path()).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].tag, "script");
        assert_eq!(
            findings[0].problem,
            Problem::NotFound(dir.path().join("js/app.js"))
        );
        assert_eq!(findings[1].tag, "use");
        assert_eq!(findings[1].link, "img/sprite.svg");
    }

    #[test]
    fn test_comments_and_raw_text_ignored() {
        let dir = site();
        let html = r#"<html><head>
            <title>a <img src="nope.png"> title</title>
            <style>.x::after { content: "<img src='gone.png'>"; }</style>
            </head><body>
            <!-- <img src="old.png"> -->
            <script>var s = '<img src="ghost.png">'; if (a < b) {}</script>
            <SCRIPT src="img/logo.svg"></SCRIPT>
            <img src="img/logo.svg">
            </body></html>"#;
        assert!(scan_html(html, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_script_src_checked_before_body_skipped() {
        let dir = site();
        let html = r#"<script src="js/missing.js">var a = '<img src="x.png">';</script><img src="after.png">"#;

        let findings = scan_html(html, dir.path()).unwrap();
        let links: Vec<_> = findings.iter().map(|f| f.link.as_str()).collect();
        assert_eq!(links, vec!["js/missing.js", "after.png"]);
    }

    #[test]
    fn test_gt_inside_attribute_value() {
        let dir = site();
        let html = r#"<p><a title="a > b" href="missing.html">x</a></p>"#;

        let findings = scan_html(html, dir.path()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].link, "missing.html");
    }

    #[test]
    fn test_entities_in_links_are_decoded() {
        let dir = site();
        fs::write(dir.path().join("a&b.html"), "").unwrap();
        let html = r#"<a href="a&amp;b.html">x</a><a href="consular_en.html?x=1&amp;y=2">y</a>"#;
        assert!(scan_html(html, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_check_sites_report() {
        let dir = site();
        fs::write(dir.path().join("consular_ua.html"), r#"<img src="missing.png">"#).unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/page.html"), r#"<img src="../img/logo.svg">"#).unwrap();

        let report = check_sites(dir.path()).unwrap();
        let pages: Vec<_> = report.pages.keys().collect();
        assert_eq!(
            pages,
            vec![
                &dir.path().join("consular_en.html"),
                &dir.path().join("consular_ua.html"),
                &dir.path().join("nested/page.html"),
            ]
        );
        assert!(!report.is_clean());
        assert_eq!(report.broken_count(), 1);
    }
}

//! 404 page generation.
//!
//! Lists every rendered page under `[paths].sites` so a visitor who hits a
//! dead URL can pick a realization.
//!
//! ```html
//! <ul>
//!   <li><a href="sites/consular_en.html">consular_en.html</a></li>
//!   <li><a href="sites/consular_ua.html">consular_ua.html</a></li>
//! </ul>
//! ```

use crate::{config::SiteConfig, log, utils::fs::write_text};
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name never listed, even when the 404 page is written into `sites`.
const NOT_FOUND_PAGE: &str = "404.html";

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>404</title>
  <meta name="robots" content="noindex, nofollow">
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      display: flex;
      align-items: center;
      justify-content: center;
      font-family: system-ui, -apple-system, BlinkMacSystemFont, sans-serif;
      background: #f5f5f5;
      color: #1a1a1a;
    }

    .box {
      background: #ffffff;
      padding: 40px;
      border-radius: 16px;
      max-width: 520px;
      width: 100%;
    }

    h1 {
      margin: 0 0 16px;
      font-size: 32px;
      font-weight: 600;
    }

    p {
      margin: 0 0 24px;
      color: #555;
      font-size: 16px;
    }

    ul {
      margin: 0;
      padding: 0;
      list-style: none;
    }

    li + li {
      margin-top: 8px;
    }

    a {
      text-decoration: none;
      color: #1a1a1a;
      border-bottom: 1px solid #ccc;
    }

    a:hover {
      border-color: #1a1a1a;
    }
  </style>
</head>
<body>

  <div class="box">
    <h1>404</h1>
    <p>Available pages:</p>
    <ul>
      "#;

const TAIL: &str = r#"
    </ul>
  </div>

</body>
</html>
"#;

/// Write the 404 page to `[build].not_found`.
pub fn build_not_found(config: &SiteConfig) -> Result<PathBuf> {
    let sites = &config.paths.sites;
    if !sites.is_dir() {
        bail!("{} directory not found", sites.display());
    }

    let pages = rendered_pages(sites);
    let out = &config.build.not_found;
    write_text(out, &render(&pages))?;
    log!("404"; "{} page(s) listed in {}", pages.len(), out.display());

    Ok(out.clone())
}

/// Sorted file names of the rendered pages, the 404 page excluded.
fn rendered_pages(sites: &Path) -> Vec<String> {
    let mut pages: Vec<String> = WalkDir::new(sites)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_owned))
        .filter(|name| name.ends_with(".html") && name != NOT_FOUND_PAGE)
        .collect();
    pages.sort();
    pages
}

fn render(pages: &[String]) -> String {
    let links = pages
        .iter()
        .map(|page| format!(r#"<li><a href="sites/{page}">{page}</a></li>"#))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{HEAD}{links}{TAIL}")
}

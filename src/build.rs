//! Page building orchestration.
//!
//! A build runs in two phases that communicate through the bundle files:
//!
//! ```text
//! build_site(consular_ua)
//!     │
//!     ├── collect ──► AssetCollector walks the inline graph
//!     │                   └── write .bundle/site.css, .bundle/site.js
//!     │
//!     └── render  ──► Composer::render(root block, ROOT)
//!                         ├── reads the bundles back
//!                         └── minify (optional) → sites/consular_ua.html
//! ```
//!
//! The render phase never starts before both bundles are on disk.

use crate::{
    assets::AssetCollector,
    block::BlockStore,
    compose::{Composer, RenderOptions},
    config::SiteConfig,
    error::BlockError,
    log,
    utils::{fs::write_text, minify::minify},
};
use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

/// Build the page for one realization. Returns the written page path.
pub fn build_site(config: &SiteConfig, realization: &str) -> Result<PathBuf> {
    let realization = config.realizations.parse(realization)?;
    let root = realization.root_block();
    log!("build"; "{} (root block `{root}`)", realization.name());

    let bundle = AssetCollector::from_config(config)
        .collect(&realization)
        .with_context(|| format!("failed to collect assets for `{}`", realization.name()))?;
    bundle.write(&config.paths)?;
    log!(
        "assets";
        "{} block(s) → {}, {}",
        bundle.blocks.len(),
        config.paths.style_bundle().display(),
        config.paths.script_bundle().display()
    );

    let html = Composer::from_config(config)
        .render(root, &realization, RenderOptions::ROOT)
        .with_context(|| format!("failed to render `{root}` for `{}`", realization.name()))?;
    let html = minify(html.as_bytes(), config);

    let out = config.paths.output_page(realization.name());
    write_text(&out, &String::from_utf8_lossy(&html))?;
    log!("ok"; "rendered `{root}` with `{}` → {}", realization.name(), out.display());

    Ok(out)
}

/// Remove the bundles and every generated variant file. Variants whose name
/// starts with one of `[build].keep_prefixes` are kept.
pub fn clean(config: &SiteConfig) -> Result<usize> {
    let mut removed = 0;

    for bundle in [config.paths.style_bundle(), config.paths.script_bundle()] {
        if bundle.is_file() {
            remove(bundle)?;
            removed += 1;
        }
    }

    let store = BlockStore::from_config(config);
    if store.dir().is_dir() {
        for block in store.block_names()? {
            for variant in store.variant_files(&block) {
                let keep = variant
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| config.build.keeps(name));
                if !keep {
                    remove(variant)?;
                    removed += 1;
                }
            }
        }
    }

    if removed == 0 {
        log!("clean"; "nothing to clean");
    }
    Ok(removed)
}

fn remove(path: PathBuf) -> Result<()> {
    fs::remove_file(&path).map_err(|err| BlockError::io(&path, err))?;
    log!("clean"; "removed {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use serde_json::json;

    const ROOT: &str = "template_consular_container";

    fn page() -> Fixture {
        let fx = Fixture::new();
        fx.variant(
            ROOT,
            "consular_ua",
            json!({"lang": "uk", "inline_block": [{"block_name": "hero"}]}),
        );
        fx.template(
            ROOT,
            "<html lang=\"{{ content.lang }}\">\n<head>\n<style>{{ inline_block.include_css }}</style>\n</head>\n<body>\n{{ inline_block.hero }}\n<script>{{ inline_block.include_js }}</script>\n</body>\n</html>\n",
        );
        fx.style(ROOT, "body { margin: 0; }");
        fx.variant("hero", "default_ua", json!({"title": "Вітаємо"}));
        fx.template("hero", "<h1>{{ content.title }}</h1>");
        fx.script("hero", "console.log('hero');");
        fx
    }

    #[test]
    fn test_build_writes_page_with_bundles() {
        let fx = page();

        let out = build_site(&fx.config, "consular_ua").unwrap();
        assert_eq!(out, fx.config.paths.output_page("consular_ua"));

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("<h1>Вітаємо</h1>"));
        assert!(html.contains(&format!("/* ===== {ROOT} ===== */\nbody {{ margin: 0; }}")));
        assert!(html.contains("/* ===== hero ===== */\nconsole.log('hero');"));
        assert!(fx.config.paths.style_bundle().is_file());
    }

    #[test]
    fn test_build_is_byte_stable() {
        let fx = page();

        let first = fs::read(build_site(&fx.config, "consular_ua").unwrap()).unwrap();
        let second = fs::read(build_site(&fx.config, "consular_ua").unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_minified() {
        let mut fx = page();
        let plain = fs::read_to_string(build_site(&fx.config, "consular_ua").unwrap()).unwrap();
        fx.config.build.minify = true;
        let minified = fs::read_to_string(build_site(&fx.config, "consular_ua").unwrap()).unwrap();

        assert!(minified.len() < plain.len());
        assert!(minified.contains("<h1>Вітаємо</h1>"));
    }

    #[test]
    fn test_build_unknown_prefix() {
        let fx = page();
        let err = build_site(&fx.config, "embassy_ua").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BlockError>(),
            Some(BlockError::UnknownRealizationPrefix { .. })
        ));
        assert!(!fx.config.paths.style_bundle().exists());
    }

    #[test]
    fn test_build_missing_variant_names_paths() {
        let fx = page();
        let err = build_site(&fx.config, "consular_en").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("consular_en.json"));
        assert!(message.contains("default_en.json"));
    }

    #[test]
    fn test_clean_keeps_defaults() {
        let fx = page();
        fx.variant("hero", "test_ua", json!({}));
        build_site(&fx.config, "consular_ua").unwrap();

        let removed = clean(&fx.config).unwrap();
        // two bundles + the root's consular_ua variant
        assert_eq!(removed, 3);
        assert!(!fx.config.paths.style_bundle().exists());
        assert!(!fx.config.paths.script_bundle().exists());
        assert!(fx.config.paths.blocks.join("hero/realization/default_ua.json").exists());
        assert!(fx.config.paths.blocks.join("hero/realization/test_ua.json").exists());
        assert!(!fx.config.paths.blocks.join(ROOT).join("realization/consular_ua.json").exists());

        assert_eq!(clean(&fx.config).unwrap(), 0);
    }
}

//! Template rendering over minijinja.
//!
//! Templates are loaded by name relative to the blocks directory
//! (`hero/base.j2`), so one block template may `{% include %}` another.
//! Undefined references are errors, output is never auto-escaped, and the
//! `raise(message)` global aborts the render with `message`.

use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, context};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new(blocks_dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(blocks_dir.to_path_buf()));
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_function("raise", raise);
        Self { env }
    }

    /// Render `name` with the variant data as `content` and the rendered
    /// fragments as `inline_block`.
    pub fn render(
        &self,
        name: &str,
        content: &Map<String, Value>,
        inline_block: &BTreeMap<String, String>,
    ) -> Result<String, Error> {
        let template = self.env.get_template(name)?;
        template.render(context! {
            content => content,
            inline_block => inline_block,
        })
    }
}

fn raise(message: String) -> Result<String, Error> {
    Err(Error::new(ErrorKind::InvalidOperation, message))
}

//! Component manifest templating
//!
//! Templates are plain text with `${name}` placeholders, where a name is made of
//! letters, digits, `_`, `.` and `-`. Rendering is a literal find/replace of
//! each supplied token; there are no loops or conditionals.
//! `{{ ... }}` is left alone because Image Builder documents use it for their
//! own variables.

use crate::error::{PipelineError, PipelineResult};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;
use uuid::Uuid;

/// Token name to replacement value
pub type TokenMap = BTreeMap<String, String>;

/// How to treat tokens and placeholders that don't line up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Unmatched tokens and leftover placeholders pass through as text
    #[default]
    Lenient,
    /// Every token must be used and no placeholder may remain
    Strict,
}

/// Placeholder text for a token name
pub fn placeholder(token: &str) -> String {
    format!("${{{}}}", token)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z0-9_.\-]+)\}").expect("placeholder pattern is valid")
    })
}

/// Substitute tokens into template text
///
/// The template is scanned once, so placeholders that appear inside a
/// replacement value are left as they are.
pub fn render_str(text: &str, tokens: &TokenMap, mode: RenderMode) -> PipelineResult<String> {
    let mut used = BTreeSet::new();
    let mut unresolved: Option<String> = None;

    let rendered = placeholder_pattern().replace_all(text, |caps: &Captures<'_>| {
        let name = &caps[1];
        match tokens.get_key_value(name) {
            Some((key, value)) => {
                used.insert(key.as_str());
                value.clone()
            }
            None => {
                unresolved.get_or_insert_with(|| caps[0].to_string());
                caps[0].to_string()
            }
        }
    });

    for key in tokens.keys() {
        if used.contains(key.as_str()) {
            continue;
        }
        if mode == RenderMode::Strict {
            return Err(PipelineError::UnusedToken(key.clone()));
        }
        debug!(token = %key, "Token not present in template");
    }

    if mode == RenderMode::Strict {
        if let Some(found) = unresolved {
            return Err(PipelineError::UnresolvedPlaceholder(found));
        }
    }

    Ok(rendered.into_owned())
}

/// Render a template file into a fresh directory under `out_dir`
///
/// The rendered file keeps the template's file name and lives in its own
/// `out_dir/<uuid>/` directory, so repeated renders never collide.
pub fn render(
    template_path: &Path,
    tokens: &TokenMap,
    out_dir: &Path,
    mode: RenderMode,
) -> PipelineResult<PathBuf> {
    let text = std::fs::read_to_string(template_path).map_err(|source| {
        PipelineError::TemplateRead {
            path: template_path.to_path_buf(),
            source,
        }
    })?;

    let rendered = render_str(&text, tokens, mode)?;

    let file_name = template_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "component.template".into());
    let render_dir = out_dir.join(Uuid::new_v4().to_string());
    let output_path = render_dir.join(file_name);

    std::fs::create_dir_all(&render_dir)
        .and_then(|_| std::fs::write(&output_path, rendered))
        .map_err(|source| PipelineError::TemplateWrite {
            path: output_path.clone(),
            source,
        })?;

    debug!(
        template = %template_path.display(),
        output = %output_path.display(),
        "Rendered template"
    );

    Ok(output_path)
}

//! HTML page templates (Jinja2 syntax via minijinja).
//!
//! Templates live in `templates/pages/` and are compiled into the binary, so
//! the server does not depend on its working directory.

use axum::response::Html;
use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::error::AppError;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const PAGES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/pages/layout.html")),
    ("index.html", include_str!("../../templates/pages/index.html")),
    ("login.html", include_str!("../../templates/pages/login.html")),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Internal(err.to_string())
    }
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for &(name, source) in PAGES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page template with the given context
pub fn render(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Render a page straight into an axum HTML response
pub fn render_page(template_name: &str, ctx: Value) -> Result<Html<String>, AppError> {
    Ok(Html(render(template_name, ctx)?))
}

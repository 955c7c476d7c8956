//! URL template rendering
//!
//! Release and binary locations are Tera templates over a fixed set of
//! variables (`url`, `app`, `version`, `os`, `arch`, `ext`). Every rendered
//! URL is checked before it is handed to the HTTP client.

use serde::Serialize;
use tera::{Context, Tera};
use url::Url;

use crate::error::TemplateError;
use crate::platform::PlatformInfo;

/// Variables available to URL templates
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateVars {
    pub url: String,
    pub app: String,
    pub version: String,
    pub os: String,
    pub arch: String,
    pub ext: String,
}

impl TemplateVars {
    /// Variables for a repository, app and platform; version left empty
    pub fn new(url: &str, app: &str, platform: &PlatformInfo) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            app: app.to_string(),
            version: String::new(),
            os: platform.os.to_string(),
            arch: platform.arch.to_string(),
            ext: platform.extension().to_string(),
        }
    }

    /// Set the version variable
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }
}

/// Render a URL template and validate the result
pub fn render_url(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    let context = Context::from_serialize(vars).map_err(|e| TemplateError::Render {
        template: template.to_string(),
        message: e.to_string(),
    })?;

    let rendered =
        Tera::one_off(template, &context, false).map_err(|e| TemplateError::Render {
            template: template.to_string(),
            message: render_error_message(&e),
        })?;

    let result = rendered.trim().to_string();
    validate_url(&result)?;
    Ok(result)
}

/// Check that a URL is absolute http(s), has a host and has no control characters
pub fn validate_url(raw: &str) -> Result<(), TemplateError> {
    if raw.chars().any(char::is_control) {
        return Err(TemplateError::invalid_url(
            "URL contains invalid control characters",
        ));
    }

    let parsed = Url::parse(raw)
        .map_err(|e| TemplateError::invalid_url(format!("invalid URL format: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(TemplateError::invalid_url(format!(
                "invalid URL scheme: {} (expected http or https)",
                other
            )))
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(TemplateError::invalid_url("URL missing host"));
    }

    Ok(())
}

/// Tera nests the useful part of the message in the error source chain
fn render_error_message(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message = format!("{}: {}", message, inner);
        source = inner.source();
    }
    message
}

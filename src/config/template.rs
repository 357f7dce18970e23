//! Expansion of `{{timestamp}}` in user-supplied strings.
//!
//! Templates are parsed with Handlebars and may only contain literal text
//! and plain `{{timestamp}}` expressions. Helpers, blocks, partials,
//! comments and escaped braces are rejected, as is any other variable.
//! Output is not HTML-escaped.

use handlebars::template::TemplateElement;
use handlebars::{Handlebars, Template};
use serde::Serialize;

use crate::time::Clock;

use super::error::ConfigError;

/// Variables available to configuration templates.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// Unix timestamp in seconds, as a decimal string.
    pub timestamp: String,
}

impl TemplateContext {
    /// Captures the context from the given clock.
    #[must_use]
    pub fn capture(clock: &dyn Clock) -> Self {
        Self {
            timestamp: clock.unix_timestamp().to_string(),
        }
    }
}

/// Renders configuration templates against one captured context.
pub struct TemplateExpander {
    hbs: Handlebars<'static>,
    context: TemplateContext,
}

impl std::fmt::Debug for TemplateExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateExpander")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl TemplateExpander {
    /// Creates an expander for the given context.
    #[must_use]
    pub fn new(context: TemplateContext) -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs, context }
    }

    /// Expands `template`, reporting failures against `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTemplate`] for malformed syntax or any
    /// token other than `{{timestamp}}`.
    pub fn expand(&self, field: &'static str, template: &str) -> Result<String, ConfigError> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }

        let invalid = |reason: String| ConfigError::InvalidTemplate { field, reason };

        let compiled = Template::compile(template).map_err(|e| invalid(e.to_string()))?;
        compiled
            .elements
            .iter()
            .try_for_each(check_element)
            .map_err(invalid)?;

        self.hbs
            .render_template(template, &self.context)
            .map_err(|e| invalid(e.to_string()))
    }
}

/// Accepts literal text and bare `timestamp` expressions only.
fn check_element(element: &TemplateElement) -> Result<(), String> {
    match element {
        // Escaped `\{{` compiles to literal braces.
        TemplateElement::RawString(text) if text.contains("{{") => {
            Err("escaped braces are not supported".to_string())
        }
        TemplateElement::RawString(_) => Ok(()),
        TemplateElement::Expression(expr)
            if !expr.block
                && expr.params.is_empty()
                && expr.hash.is_empty()
                && expr.name.as_name() == Some("timestamp") =>
        {
            Ok(())
        }
        TemplateElement::Expression(expr) | TemplateElement::HtmlExpression(expr) => {
            let name = expr.name.as_name().unwrap_or("expression");
            Err(format!("unsupported token '{name}', only {{{{timestamp}}}} is recognized"))
        }
        TemplateElement::HelperBlock(_) => Err("block helpers are not supported".to_string()),
        TemplateElement::Comment(_) => Err("comments are not supported".to_string()),
        _ => Err("partials and decorators are not supported".to_string()),
    }
}

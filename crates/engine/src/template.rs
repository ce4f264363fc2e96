//! Display templates.
//!
//! The renderer is passed in explicitly by the host; cells never look up a
//! rendering context on their own.

use std::collections::BTreeMap;

use crate::value::CellValue;

pub trait TemplateRenderer {
    fn render(&self, template: &str, value: &CellValue) -> String;
}

impl<F: Fn(&str, &CellValue) -> String> TemplateRenderer for F {
    fn render(&self, template: &str, value: &CellValue) -> String {
        self(template, value)
    }
}

/// Minimal `{{ name }}` substitution. `value` is bound to the cell value;
/// other names come from host-supplied bindings; unknown names render empty.
#[derive(Debug, Clone, Default)]
pub struct BindingRenderer {
    bindings: BTreeMap<String, String>,
}

impl BindingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }
}

impl TemplateRenderer for BindingRenderer {
    fn render(&self, template: &str, value: &CellValue) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                // Unterminated tag is plain text
                out.push_str(&rest[open..]);
                return out;
            };
            let name = after_open[..close].trim();
            if name == "value" {
                out.push_str(&value.to_display_string());
            } else if let Some(bound) = self.bindings.get(name) {
                out.push_str(bound);
            }
            rest = &after_open[close + 2..];
        }

        out.push_str(rest);
        out
    }
}

//! Capability traits consumed by the core.
//!
//! Markdown-to-HTML rendering lives outside this crate. The engine only
//! needs *a* rendering capability so components can memoize derived output
//! per skin; anything implementing [`Renderer`] can be plugged in.

use crate::skins::Skin;

/// Renders markdown content under a skin's substitution context.
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str, skin: &Skin) -> String;
}

/// Markup-free stand-in renderer: applies `{{key}}` skin substitutions and
/// returns the text otherwise untouched. Used in tests and for plain-text
/// previews; real HTML rendering is supplied by the embedding application.
#[derive(Debug, Default)]
pub struct SubstitutionRenderer;

impl Renderer for SubstitutionRenderer {
    fn render(&self, markdown: &str, skin: &Skin) -> String {
        let mut out = markdown.to_string();
        for (key, value) in &skin.replacements {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn substitutes_configured_placeholders() {
        let mut replacements = BTreeMap::new();
        replacements.insert("container".to_string(), "std::vector".to_string());
        let skin = Skin::new("vec", replacements);

        let out = SubstitutionRenderer.render("Use a {{container}} here.", &skin);
        assert_eq!(out, "Use a std::vector here.");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let skin = Skin::new("empty", BTreeMap::new());
        let out = SubstitutionRenderer.render("{{mystery}} stays", &skin);
        assert_eq!(out, "{{mystery}} stays");
    }
}

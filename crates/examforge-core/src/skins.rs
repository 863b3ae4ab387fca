//! Parameter-variant substitution contexts ("skins").
//!
//! A skin maps placeholder keys to replacement values. Sections and
//! questions may each configure a skin (or a chooser over skins); at
//! assignment time the two are merged into a composite where
//! question-level entries override section-level entries sharing a key.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

/// ID of the implicit empty skin used wherever no skin is configured.
pub const DEFAULT_SKIN_ID: &str = "default";

/// A key→value substitution context.
///
/// Replacement maps are `BTreeMap` so serialized snapshots are byte-stable
/// across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skin {
    /// Identifier for this skin. Render caches key on it.
    pub skin_id: String,
    /// Placeholder replacements applied to markdown content.
    #[serde(default)]
    pub replacements: BTreeMap<String, String>,
}

impl Skin {
    pub fn new(skin_id: impl Into<String>, replacements: BTreeMap<String, String>) -> Self {
        Skin {
            skin_id: skin_id.into(),
            replacements,
        }
    }

    /// Looks up a replacement value.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.replacements.get(key).map(String::as_str)
    }
}

static DEFAULT_SKIN: LazyLock<Arc<Skin>> =
    LazyLock::new(|| Arc::new(Skin::new(DEFAULT_SKIN_ID, BTreeMap::new())));

/// The shared empty skin. Components without a configured skin resolve to
/// this one, so unskinned content still renders through the same path.
pub fn default_skin() -> Arc<Skin> {
    DEFAULT_SKIN.clone()
}

/// Merges a section skin and a question skin into the composite applied to
/// one assigned question. Question entries win on key collision.
pub fn create_composite_skin(section_skin: &Arc<Skin>, question_skin: &Arc<Skin>) -> Arc<Skin> {
    let mut replacements = section_skin.replacements.clone();
    for (k, v) in &question_skin.replacements {
        replacements.insert(k.clone(), v.clone());
    }
    Arc::new(Skin {
        skin_id: format!("{}-{}", section_skin.skin_id, question_skin.skin_id),
        replacements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skin(id: &str, pairs: &[(&str, &str)]) -> Arc<Skin> {
        Arc::new(Skin::new(
            id,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn default_skin_is_shared_and_empty() {
        let a = default_skin();
        let b = default_skin();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.skin_id, DEFAULT_SKIN_ID);
        assert!(a.replacements.is_empty());
    }

    #[test]
    fn composite_question_overrides_section() {
        let section = skin("list", &[("container", "list"), ("op", "push_back")]);
        let question = skin("deque", &[("container", "deque")]);
        let composite = create_composite_skin(&section, &question);

        assert_eq!(composite.lookup("container"), Some("deque"));
        assert_eq!(composite.lookup("op"), Some("push_back"));
        assert_eq!(composite.skin_id, "list-deque");
    }

    #[test]
    fn composite_with_default_question_skin_keeps_section_entries() {
        let section = skin("vec", &[("container", "vector")]);
        let composite = create_composite_skin(&section, &default_skin());
        assert_eq!(composite.lookup("container"), Some("vector"));
        assert_eq!(composite.skin_id, "vec-default");
    }

    #[test]
    fn composite_is_a_fresh_context() {
        let section = skin("a", &[("x", "1")]);
        let question = skin("b", &[("y", "2")]);
        let composite = create_composite_skin(&section, &question);
        assert_eq!(section.replacements.len(), 1);
        assert_eq!(question.replacements.len(), 1);
        assert_eq!(composite.replacements.len(), 2);
    }
}

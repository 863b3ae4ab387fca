//! Author-written specification types.
//!
//! A specification is the immutable, serializable description of an exam,
//! section, or question as the exam author wrote it. Specifications are
//! shared by `Arc`: object identity (the `Arc` pointer) is what the
//! component registry keys on, so two field-equal but distinct
//! specification objects are deliberately two different things.
//!
//! Anywhere a specification may appear inline, a chooser may appear
//! instead: a pool of candidates plus a selection count. Pools nest, so a
//! pool entry may itself be a chooser.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::skins::Skin;

/// Maximum length of an authored ID string.
pub const MAX_ID_LENGTH: usize = 64;

/// Checks the authored-ID pattern: a leading ASCII letter followed by
/// letters, digits, underscores, or hyphens, at most [`MAX_ID_LENGTH`]
/// characters in total.
pub fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    let starts_with_letter = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic());
    starts_with_letter
        && id.len() <= MAX_ID_LENGTH
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Which kind of component an ID or chooser refers to. Used in error
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Exam,
    Section,
    Question,
    Skin,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Exam => write!(f, "exam"),
            ComponentKind::Section => write!(f, "section"),
            ComponentKind::Question => write!(f, "question"),
            ComponentKind::Skin => write!(f, "skin"),
        }
    }
}

/// A student receiving an individualized exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    /// Stable short identifier. Default randomization seed and ID prefix.
    pub uniqname: String,
    /// Full display name.
    #[serde(default)]
    pub name: String,
}

/// Specification of a whole exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSpecification {
    /// Unique identifier for this exam.
    pub exam_id: String,
    /// Human-readable exam title.
    pub title: String,
    /// Markdown shown at the top of the exam.
    #[serde(default)]
    pub mk_instructions: String,
    /// Sections in declared order. Each entry is a section or a chooser.
    pub sections: Vec<SectionEntry>,
}

/// A slot in an exam's section list: an inline section or a chooser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionEntry {
    Chooser(SectionChooserSpec),
    Inline(Arc<SectionSpecification>),
}

/// A pool of candidate sections with a selection count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionChooserSpec {
    /// How many sections to select from the pool.
    pub choose: usize,
    /// Candidate sections; entries may themselves be choosers.
    pub pool: Vec<SectionEntry>,
}

/// Specification of one exam section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSpecification {
    /// Unique identifier for this section.
    pub section_id: String,
    /// Human-readable section title.
    pub title: String,
    /// Markdown description shown before the questions.
    #[serde(default)]
    pub mk_description: String,
    /// Optional markdown reference material shown alongside the section.
    #[serde(default)]
    pub mk_reference: Option<String>,
    /// Skin (or skin chooser) applied to the whole section.
    #[serde(default)]
    pub skin: Option<SkinEntry>,
    /// Questions in declared order. Each entry is a question or a chooser.
    pub questions: Vec<QuestionEntry>,
}

/// A slot in a section's question list: an inline question or a chooser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionEntry {
    Chooser(QuestionChooserSpec),
    Inline(Arc<QuestionSpecification>),
}

/// A pool of candidate questions with a selection count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionChooserSpec {
    /// How many questions to select from the pool.
    pub choose: usize,
    /// Candidate questions; entries may themselves be choosers.
    pub pool: Vec<QuestionEntry>,
}

/// Specification of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpecification {
    /// Unique identifier for this question.
    pub question_id: String,
    /// Markdown body of the question.
    #[serde(default)]
    pub mk_description: String,
    /// Point value. Whole points only; cross-student totals must compare
    /// exactly.
    pub points: u32,
    /// Tags for later filtering and reporting.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Skin (or skin chooser) applied to this question.
    #[serde(default)]
    pub skin: Option<SkinEntry>,
}

/// A slot wherever a skin may be configured: an inline skin or a chooser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkinEntry {
    Chooser(SkinChooserSpec),
    Inline(Arc<Skin>),
}

/// A pool of candidate skins with a selection count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinChooserSpec {
    /// How many skins to select from the pool. Anything other than one
    /// produces multiple assigned variants, which requires
    /// `allow_duplicates`.
    pub choose: usize,
    /// Candidate skins; entries may themselves be choosers.
    pub pool: Vec<SkinEntry>,
}

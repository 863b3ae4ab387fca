//! Per-student realized exam trees.
//!
//! An assigned tree is created once per student per run and is immutable
//! afterwards. Every node carries its student-scoped identifier, a
//! back-reference to the originating component, and its position among
//! siblings; questions additionally carry their resolved composite skin
//! and point value. Point totals are computed bottom-up at construction.

use std::sync::Arc;

use crate::model::StudentInfo;
use crate::registry::{Exam, Question, Section};
use crate::skins::Skin;

/// One question as assigned to one student.
#[derive(Debug, Clone)]
pub struct AssignedQuestion {
    /// Student-scoped identifier.
    pub id: String,
    /// The originating question component.
    pub question: Arc<Question>,
    /// Position of the enclosing section among its siblings.
    pub section_index: usize,
    /// Position of this question within its section.
    pub part_index: usize,
    /// Composite (section + question) skin for this instance.
    pub skin: Arc<Skin>,
    /// Point value, copied from the component.
    pub points: u32,
}

impl AssignedQuestion {
    /// Human-facing position label, e.g. `"2.3"` (1-based).
    pub fn display_index(&self) -> String {
        format!("{}.{}", self.section_index + 1, self.part_index + 1)
    }
}

/// One section as assigned to one student.
#[derive(Debug, Clone)]
pub struct AssignedSection {
    /// Student-scoped identifier.
    pub id: String,
    /// The originating section component.
    pub section: Arc<Section>,
    /// Position among sibling sections.
    pub section_index: usize,
    /// Resolved section skin.
    pub skin: Arc<Skin>,
    /// Assigned questions in order.
    pub questions: Vec<AssignedQuestion>,
    /// Sum of this section's question points.
    pub points_possible: u32,
}

impl AssignedSection {
    pub fn new(
        id: String,
        section: Arc<Section>,
        section_index: usize,
        skin: Arc<Skin>,
        questions: Vec<AssignedQuestion>,
    ) -> Self {
        let points_possible = questions.iter().map(|q| q.points).sum();
        AssignedSection {
            id,
            section,
            section_index,
            skin,
            questions,
            points_possible,
        }
    }
}

/// One student's complete realized exam.
#[derive(Debug, Clone)]
pub struct AssignedExam {
    /// Student-scoped identifier.
    pub id: String,
    /// The originating exam component.
    pub exam: Arc<Exam>,
    /// The student this instance belongs to.
    pub student: StudentInfo,
    /// Assigned sections in order.
    pub sections: Vec<AssignedSection>,
    /// Sum of all reachable question points.
    pub points_possible: u32,
}

impl AssignedExam {
    pub fn new(
        id: String,
        exam: Arc<Exam>,
        student: StudentInfo,
        sections: Vec<AssignedSection>,
    ) -> Self {
        let points_possible = sections.iter().map(|s| s.points_possible).sum();
        AssignedExam {
            id,
            exam,
            student,
            sections,
            points_possible,
        }
    }

    /// All assigned questions across sections, in exam order.
    pub fn questions(&self) -> impl Iterator<Item = &AssignedQuestion> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }
}

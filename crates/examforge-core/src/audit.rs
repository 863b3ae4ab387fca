//! Cross-student invariant checking and usage statistics.
//!
//! After each student's tree completes, the running cohort state is
//! updated: every section/question ID is pinned to the specification
//! object it was first seen with, and every exam after the first must
//! total the same number of points. A violation is an authoring defect
//! that aborts the whole batch, since a partial cohort cannot be checked
//! for fairness.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assigned::AssignedExam;
use crate::error::{GenerationError, Result};
use crate::manifest::StatsSummary;
use crate::model::ComponentKind;
use crate::registry::{Question, Section};

/// First-seen section for an ID, with its occurrence count.
#[derive(Debug, Clone)]
pub struct SectionUsage {
    pub section: Arc<Section>,
    pub count: usize,
}

/// First-seen question for an ID, with its occurrence count.
#[derive(Debug, Clone)]
pub struct QuestionUsage {
    pub question: Arc<Question>,
    pub count: usize,
}

/// Running cohort state, updated once per completed assigned exam.
#[derive(Debug)]
pub struct CohortAudit {
    allow_duplicates: bool,
    sections: HashMap<String, SectionUsage>,
    questions: HashMap<String, QuestionUsage>,
    /// Uniqname and total of the first generated exam; the expected value
    /// every later exam must match.
    expected_points: Option<(String, u32)>,
}

impl CohortAudit {
    pub fn new(allow_duplicates: bool) -> Self {
        CohortAudit {
            allow_duplicates,
            sections: HashMap::new(),
            questions: HashMap::new(),
            expected_points: None,
        }
    }

    /// Records one completed exam, checking identity and point-total
    /// invariants against everything recorded so far.
    pub fn record(&mut self, exam: &AssignedExam) -> Result<()> {
        for assigned_section in &exam.sections {
            let section = &assigned_section.section;
            match self.sections.get_mut(&section.section_id) {
                Some(usage) => {
                    if !Arc::ptr_eq(&usage.section.spec, &section.spec) {
                        return Err(GenerationError::IdCollision {
                            kind: ComponentKind::Section,
                            id: section.section_id.clone(),
                        });
                    }
                    usage.count += 1;
                }
                None => {
                    self.sections.insert(
                        section.section_id.clone(),
                        SectionUsage {
                            section: section.clone(),
                            count: 1,
                        },
                    );
                }
            }
        }

        for assigned_question in exam.questions() {
            let question = &assigned_question.question;
            match self.questions.get_mut(&question.question_id) {
                Some(usage) => {
                    if !Arc::ptr_eq(&usage.question.spec, &question.spec) {
                        return Err(GenerationError::IdCollision {
                            kind: ComponentKind::Question,
                            id: question.question_id.clone(),
                        });
                    }
                    usage.count += 1;
                }
                None => {
                    self.questions.insert(
                        question.question_id.clone(),
                        QuestionUsage {
                            question: question.clone(),
                            count: 1,
                        },
                    );
                }
            }
        }

        match &self.expected_points {
            Some((first_uniqname, expected)) => {
                // Variable-length variants are legal when duplicates are
                // allowed, so the equality check only applies otherwise.
                if !self.allow_duplicates && exam.points_possible != *expected {
                    return Err(GenerationError::PointTotalMismatch {
                        expected: *expected,
                        actual: exam.points_possible,
                        first_uniqname: first_uniqname.clone(),
                        uniqname: exam.student.uniqname.clone(),
                    });
                }
            }
            None => {
                self.expected_points =
                    Some((exam.student.uniqname.clone(), exam.points_possible));
            }
        }

        Ok(())
    }

    /// Occurrence count for a section ID across the cohort so far.
    pub fn section_count(&self, section_id: &str) -> usize {
        self.sections.get(section_id).map_or(0, |u| u.count)
    }

    /// Occurrence count for a question ID across the cohort so far.
    pub fn question_count(&self, question_id: &str) -> usize {
        self.questions.get(question_id).map_or(0, |u| u.count)
    }

    /// Per-ID usage counters, suitable for the output boundary.
    pub fn stats_summary(&self) -> StatsSummary {
        StatsSummary {
            sections: self
                .sections
                .iter()
                .map(|(id, u)| (id.clone(), u.count))
                .collect(),
            questions: self
                .questions
                .iter()
                .map(|(id, u)| (id.clone(), u.count))
                .collect(),
        }
    }
}

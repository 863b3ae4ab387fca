//! Serializable snapshots for the output boundary.
//!
//! A manifest captures everything a grading pipeline needs to reconstruct
//! an assigned exam (identifiers, positions, resolved skin values, point
//! totals) without back-references to the authored specifications.
//! Writing these anywhere is the embedding application's job; this module
//! only defines the data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assigned::{AssignedExam, AssignedQuestion, AssignedSection};

/// Snapshot of one assigned question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionManifest {
    pub id: String,
    pub question_id: String,
    pub section_index: usize,
    pub part_index: usize,
    pub skin_id: String,
    /// Fully merged composite replacements for this instance.
    pub skin_replacements: BTreeMap<String, String>,
    pub points: u32,
}

/// Snapshot of one assigned section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionManifest {
    pub id: String,
    pub section_id: String,
    pub section_index: usize,
    pub skin_id: String,
    pub questions: Vec<QuestionManifest>,
    pub points_possible: u32,
}

/// Snapshot of one student's assigned exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamManifest {
    pub id: String,
    pub exam_id: String,
    pub uniqname: String,
    pub sections: Vec<SectionManifest>,
    pub points_possible: u32,
}

impl From<&AssignedQuestion> for QuestionManifest {
    fn from(aq: &AssignedQuestion) -> Self {
        QuestionManifest {
            id: aq.id.clone(),
            question_id: aq.question.question_id.clone(),
            section_index: aq.section_index,
            part_index: aq.part_index,
            skin_id: aq.skin.skin_id.clone(),
            skin_replacements: aq.skin.replacements.clone(),
            points: aq.points,
        }
    }
}

impl From<&AssignedSection> for SectionManifest {
    fn from(asec: &AssignedSection) -> Self {
        SectionManifest {
            id: asec.id.clone(),
            section_id: asec.section.section_id.clone(),
            section_index: asec.section_index,
            skin_id: asec.skin.skin_id.clone(),
            questions: asec.questions.iter().map(QuestionManifest::from).collect(),
            points_possible: asec.points_possible,
        }
    }
}

impl From<&AssignedExam> for ExamManifest {
    fn from(ae: &AssignedExam) -> Self {
        ExamManifest {
            id: ae.id.clone(),
            exam_id: ae.exam.exam_id.clone(),
            uniqname: ae.student.uniqname.clone(),
            sections: ae.sections.iter().map(SectionManifest::from).collect(),
            points_possible: ae.points_possible,
        }
    }
}

/// Per-ID occurrence counters across a cohort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub sections: BTreeMap<String, usize>,
    pub questions: BTreeMap<String, usize>,
}

/// Cohort-level snapshot: who got which exam instance, plus usage stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSnapshot {
    pub exam_id: String,
    pub created_at: DateTime<Utc>,
    /// uniqname → assigned exam identifier.
    pub student_index: BTreeMap<String, String>,
    pub stats: StatsSummary,
}

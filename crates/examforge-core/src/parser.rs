//! TOML specification and roster loading.
//!
//! Exam specifications and student rosters are authored as TOML files.
//! Parsing produces the serde model directly; `validate_exam_spec` is a
//! separate non-fatal lint pass for problems an author would want to hear
//! about before generation runs (some of which, like duplicate IDs, are
//! guaranteed to abort generation later).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    is_valid_id, ExamSpecification, QuestionChooserSpec, QuestionEntry, QuestionSpecification,
    SectionChooserSpec, SectionEntry, SectionSpecification, SkinEntry, StudentInfo,
};

#[derive(Debug, Deserialize)]
struct ExamFile {
    exam: ExamSpecification,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    students: Vec<StudentInfo>,
}

/// Parse an exam specification from a TOML file.
pub fn parse_exam_spec(path: &Path) -> Result<Arc<ExamSpecification>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam specification: {}", path.display()))?;
    parse_exam_spec_str(&content, path)
}

/// Parse an exam specification from a TOML string (useful for testing).
pub fn parse_exam_spec_str(content: &str, source_path: &Path) -> Result<Arc<ExamSpecification>> {
    let parsed: ExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(Arc::new(parsed.exam))
}

/// Parse a student roster from a TOML file.
pub fn parse_roster(path: &Path) -> Result<Vec<StudentInfo>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster: {}", path.display()))?;
    parse_roster_str(&content, path)
}

/// Parse a student roster from a TOML string.
pub fn parse_roster_str(content: &str, source_path: &Path) -> Result<Vec<StudentInfo>> {
    let parsed: RosterFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(parsed.students)
}

/// A non-fatal authoring problem found by validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// ID of the offending component, when one exists.
    pub component_id: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn new(component_id: Option<&str>, message: impl Into<String>) -> Self {
        ValidationWarning {
            component_id: component_id.map(String::from),
            message: message.into(),
        }
    }
}

/// Lints an exam specification.
///
/// Warns about malformed IDs, choosers asking for more than their pools can
/// yield, empty pools, zero-point questions, and distinct specification
/// objects sharing an ID (the last one is certain to abort generation).
pub fn validate_exam_spec(spec: &ExamSpecification) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_sections: HashMap<String, usize> = HashMap::new();
    let mut seen_questions: HashMap<String, usize> = HashMap::new();

    if !is_valid_id(&spec.exam_id) {
        warnings.push(ValidationWarning::new(
            Some(&spec.exam_id),
            format!("malformed exam ID {:?}", spec.exam_id),
        ));
    }

    let yield_bound =
        check_section_pool(&spec.sections, &mut warnings, &mut seen_sections, &mut seen_questions);
    if spec.sections.is_empty() || yield_bound == 0 {
        warnings.push(ValidationWarning::new(
            Some(&spec.exam_id),
            "exam yields no sections",
        ));
    }

    warnings
}

/// Lints a roster: blank or duplicate uniqnames.
pub fn validate_roster(students: &[StudentInfo]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for student in students {
        if student.uniqname.trim().is_empty() {
            warnings.push(ValidationWarning::new(None, "student with blank uniqname"));
        }
        if !seen.insert(student.uniqname.clone()) {
            warnings.push(ValidationWarning::new(
                Some(&student.uniqname),
                "duplicate uniqname in roster; later entries overwrite earlier assignments",
            ));
        }
    }
    warnings
}

/// Walks a section pool, returning an upper bound on how many sections the
/// entries can yield.
fn check_section_pool(
    entries: &[SectionEntry],
    warnings: &mut Vec<ValidationWarning>,
    seen_sections: &mut HashMap<String, usize>,
    seen_questions: &mut HashMap<String, usize>,
) -> usize {
    let mut bound = 0;
    for entry in entries {
        match entry {
            SectionEntry::Inline(section) => {
                check_section(section, warnings, seen_sections, seen_questions);
                bound += 1;
            }
            SectionEntry::Chooser(chooser) => {
                bound += check_section_chooser(chooser, warnings, seen_sections, seen_questions);
            }
        }
    }
    bound
}

fn check_section_chooser(
    chooser: &SectionChooserSpec,
    warnings: &mut Vec<ValidationWarning>,
    seen_sections: &mut HashMap<String, usize>,
    seen_questions: &mut HashMap<String, usize>,
) -> usize {
    let available = check_section_pool(&chooser.pool, warnings, seen_sections, seen_questions);
    check_chooser_arithmetic("section", chooser.choose, available, warnings);
    chooser.choose.min(available)
}

fn check_section(
    section: &Arc<SectionSpecification>,
    warnings: &mut Vec<ValidationWarning>,
    seen_sections: &mut HashMap<String, usize>,
    seen_questions: &mut HashMap<String, usize>,
) {
    if !is_valid_id(&section.section_id) {
        warnings.push(ValidationWarning::new(
            Some(&section.section_id),
            format!("malformed section ID {:?}", section.section_id),
        ));
    }
    check_duplicate_id(
        "section",
        &section.section_id,
        Arc::as_ptr(section) as usize,
        seen_sections,
        warnings,
    );
    check_skin_entry(section.skin.as_ref(), &section.section_id, warnings);

    let yield_bound = check_question_pool(&section.questions, warnings, seen_questions);
    if section.questions.is_empty() || yield_bound == 0 {
        warnings.push(ValidationWarning::new(
            Some(&section.section_id),
            "section yields no questions",
        ));
    }
}

fn check_question_pool(
    entries: &[QuestionEntry],
    warnings: &mut Vec<ValidationWarning>,
    seen_questions: &mut HashMap<String, usize>,
) -> usize {
    let mut bound = 0;
    for entry in entries {
        match entry {
            QuestionEntry::Inline(question) => {
                check_question(question, warnings, seen_questions);
                bound += 1;
            }
            QuestionEntry::Chooser(chooser) => {
                bound += check_question_chooser(chooser, warnings, seen_questions);
            }
        }
    }
    bound
}

fn check_question_chooser(
    chooser: &QuestionChooserSpec,
    warnings: &mut Vec<ValidationWarning>,
    seen_questions: &mut HashMap<String, usize>,
) -> usize {
    let available = check_question_pool(&chooser.pool, warnings, seen_questions);
    check_chooser_arithmetic("question", chooser.choose, available, warnings);
    chooser.choose.min(available)
}

fn check_question(
    question: &Arc<QuestionSpecification>,
    warnings: &mut Vec<ValidationWarning>,
    seen_questions: &mut HashMap<String, usize>,
) {
    if !is_valid_id(&question.question_id) {
        warnings.push(ValidationWarning::new(
            Some(&question.question_id),
            format!("malformed question ID {:?}", question.question_id),
        ));
    }
    check_duplicate_id(
        "question",
        &question.question_id,
        Arc::as_ptr(question) as usize,
        seen_questions,
        warnings,
    );
    check_skin_entry(question.skin.as_ref(), &question.question_id, warnings);
    if question.points == 0 {
        warnings.push(ValidationWarning::new(
            Some(&question.question_id),
            "question is worth 0 points",
        ));
    }
}

fn check_skin_entry(
    entry: Option<&SkinEntry>,
    owner_id: &str,
    warnings: &mut Vec<ValidationWarning>,
) {
    match entry {
        None => {}
        Some(SkinEntry::Inline(skin)) => {
            if !is_valid_id(&skin.skin_id) {
                warnings.push(ValidationWarning::new(
                    Some(owner_id),
                    format!("malformed skin ID {:?}", skin.skin_id),
                ));
            }
        }
        Some(SkinEntry::Chooser(chooser)) => {
            let mut available = 0;
            for pool_entry in &chooser.pool {
                // Nested skin choosers are rare; count their yield bound.
                match pool_entry {
                    SkinEntry::Inline(_) => available += 1,
                    SkinEntry::Chooser(nested) => available += nested.choose,
                }
                check_skin_entry(Some(pool_entry), owner_id, warnings);
            }
            check_chooser_arithmetic("skin", chooser.choose, available, warnings);
        }
    }
}

fn check_chooser_arithmetic(
    kind: &str,
    choose: usize,
    available: usize,
    warnings: &mut Vec<ValidationWarning>,
) {
    if choose == 0 {
        warnings.push(ValidationWarning::new(
            None,
            format!("{kind} chooser selects 0 of {available} candidates"),
        ));
    }
    if choose > available {
        warnings.push(ValidationWarning::new(
            None,
            format!("{kind} chooser asks for {choose} of at most {available} candidates; generation will fail"),
        ));
    }
}

fn check_duplicate_id(
    kind: &str,
    id: &str,
    identity: usize,
    seen: &mut HashMap<String, usize>,
    warnings: &mut Vec<ValidationWarning>,
) {
    match seen.get(id) {
        Some(&prev) if prev != identity => {
            warnings.push(ValidationWarning::new(
                Some(id),
                format!("distinct {kind} specifications share the ID {id:?}; generation will abort"),
            ));
        }
        Some(_) => {}
        None => {
            seen.insert(id.to_string(), identity);
        }
    }
}

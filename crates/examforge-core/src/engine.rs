//! The exam generator: per-student randomized assignment.
//!
//! Assignment is top-down, single-pass, and synchronous: resolve the
//! exam's section choosers, then per section its skin and question
//! choosers, then per question its skin chooser, composing skins and
//! stamping student-scoped identifiers along the way. No backtracking, no
//! I/O, no suspension: determinism is the load-bearing property.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::assigned::{AssignedExam, AssignedQuestion, AssignedSection};
use crate::audit::CohortAudit;
use crate::error::{GenerationError, Result};
use crate::manifest::CohortSnapshot;
use crate::model::{ComponentKind, StudentInfo};
use crate::randomizer::{self, Randomizer, COMMON_SEED};
use crate::registry::{realize_exam, Exam, ExamSource, Question, Section};
use crate::skins::{create_composite_skin, Skin};

/// Minimum length of a uuidv5 namespace string.
pub const MIN_UUIDV5_NAMESPACE_LEN: usize = 16;

/// How student-scoped identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudentIdPolicy {
    /// Deterministic concatenation of uniqname and the node's logical path.
    Uniqname,
    /// Fresh random UUID per node. The only non-deterministic policy.
    RandomV4,
    /// Deterministic UUID v5 of uniqname + logical path under a configured
    /// namespace.
    NamespacedV5,
}

impl std::fmt::Display for StudentIdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentIdPolicy::Uniqname => write!(f, "uniqname"),
            StudentIdPolicy::RandomV4 => write!(f, "random-v4"),
            StudentIdPolicy::NamespacedV5 => write!(f, "namespaced-v5"),
        }
    }
}

impl std::str::FromStr for StudentIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "uniqname" => Ok(StudentIdPolicy::Uniqname),
            "random-v4" => Ok(StudentIdPolicy::RandomV4),
            "namespaced-v5" => Ok(StudentIdPolicy::NamespacedV5),
            other => Err(format!(
                "unknown student ID policy: {other} (expected uniqname, random-v4, or namespaced-v5)"
            )),
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Identifier policy for assigned nodes.
    pub student_ids: StudentIdPolicy,
    /// Namespace string for `namespaced-v5`; at least
    /// [`MIN_UUIDV5_NAMESPACE_LEN`] characters.
    pub uuidv5_namespace: Option<String>,
    /// Bypass randomization entirely: every chooser returns its full pool
    /// in declared order. Used for answer-key generation.
    pub choose_all: bool,
    /// Permit the same specification to appear as multiple siblings and
    /// permit skin choosers to yield more than one skin; also skips the
    /// cross-student point-total check.
    pub allow_duplicates: bool,
    /// Use one shared seed for all students instead of per-uniqname seeds.
    pub consistent_randomization: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            student_ids: StudentIdPolicy::Uniqname,
            uuidv5_namespace: None,
            choose_all: false,
            allow_duplicates: false,
            consistent_randomization: false,
        }
    }
}

/// Identifier stamping, resolved once at construction so a bad
/// configuration fails before any student is processed.
#[derive(Debug, Clone)]
enum IdStamper {
    Uniqname,
    RandomV4,
    NamespacedV5 { namespace: Uuid },
}

impl IdStamper {
    fn from_options(options: &GeneratorOptions) -> Result<Self> {
        if let Some(ns) = &options.uuidv5_namespace {
            if ns.len() < MIN_UUIDV5_NAMESPACE_LEN {
                return Err(GenerationError::InvalidOptions(format!(
                    "uuidv5_namespace must be at least {MIN_UUIDV5_NAMESPACE_LEN} characters, got {}",
                    ns.len()
                )));
            }
        }
        match options.student_ids {
            StudentIdPolicy::Uniqname => Ok(IdStamper::Uniqname),
            StudentIdPolicy::RandomV4 => Ok(IdStamper::RandomV4),
            StudentIdPolicy::NamespacedV5 => match &options.uuidv5_namespace {
                Some(ns) => Ok(IdStamper::NamespacedV5 {
                    namespace: Uuid::new_v5(&Uuid::NAMESPACE_URL, ns.as_bytes()),
                }),
                None => Err(GenerationError::InvalidOptions(
                    "student_ids = namespaced-v5 requires a uuidv5_namespace".into(),
                )),
            },
        }
    }

    fn stamp(&self, student: &StudentInfo, path: &str) -> String {
        match self {
            IdStamper::Uniqname => format!("{}-{}", student.uniqname, path),
            IdStamper::RandomV4 => Uuid::new_v4().to_string(),
            IdStamper::NamespacedV5 { namespace } => {
                let name = format!("{}-{}", student.uniqname, path);
                Uuid::new_v5(namespace, name.as_bytes()).to_string()
            }
        }
    }
}

/// Generates individualized exam instances for a cohort.
#[derive(Debug)]
pub struct ExamGenerator {
    exam: Arc<Exam>,
    options: GeneratorOptions,
    stamper: IdStamper,
    assigned_exams: Vec<Arc<AssignedExam>>,
    by_uniqname: HashMap<String, Arc<AssignedExam>>,
    audit: CohortAudit,
}

impl ExamGenerator {
    /// Realizes the exam and validates the options. Configuration errors
    /// surface here, before any generation runs.
    pub fn new(source: impl Into<ExamSource>, options: GeneratorOptions) -> Result<Self> {
        let stamper = IdStamper::from_options(&options)?;
        let exam = realize_exam(source.into())?;
        let audit = CohortAudit::new(options.allow_duplicates);
        Ok(ExamGenerator {
            exam,
            options,
            stamper,
            assigned_exams: Vec::new(),
            by_uniqname: HashMap::new(),
            audit,
        })
    }

    pub fn exam(&self) -> &Arc<Exam> {
        &self.exam
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates and records one student's exam. Either a complete,
    /// invariant-satisfying tree is produced and retained, or the batch is
    /// considered failed; no partial tree is ever kept.
    pub fn assign_randomized_exam(&mut self, student: &StudentInfo) -> Result<Arc<AssignedExam>> {
        tracing::info!(uniqname = %student.uniqname, exam_id = %self.exam.exam_id, "creating randomized exam");
        let assigned = Arc::new(self.create_randomized_exam(student)?);
        self.audit.record(&assigned)?;
        self.assigned_exams.push(assigned.clone());
        self.by_uniqname
            .insert(student.uniqname.clone(), assigned.clone());
        Ok(assigned)
    }

    /// Generates exams for a whole roster, aborting on the first defect.
    pub fn assign_randomized_exams(&mut self, students: &[StudentInfo]) -> Result<()> {
        for student in students {
            self.assign_randomized_exam(student)?;
        }
        Ok(())
    }

    /// All assigned exams, in generation order.
    pub fn assigned_exams(&self) -> &[Arc<AssignedExam>] {
        &self.assigned_exams
    }

    /// Assigned exam for a student, if one has been generated.
    pub fn assigned_exam(&self, uniqname: &str) -> Option<&Arc<AssignedExam>> {
        self.by_uniqname.get(uniqname)
    }

    /// Cohort-level snapshot for the output boundary.
    pub fn cohort_snapshot(&self) -> CohortSnapshot {
        CohortSnapshot {
            exam_id: self.exam.exam_id.clone(),
            created_at: chrono::Utc::now(),
            student_index: self
                .assigned_exams
                .iter()
                .map(|ae| (ae.student.uniqname.clone(), ae.id.clone()))
                .collect(),
            stats: self.audit.stats_summary(),
        }
    }

    fn make_seed(&self, student: &StudentInfo) -> String {
        if self.options.consistent_randomization {
            COMMON_SEED.to_string()
        } else {
            student.uniqname.clone()
        }
    }

    fn create_randomized_exam(&self, student: &StudentInfo) -> Result<AssignedExam> {
        let seed = self.make_seed(student);
        let allow_duplicates = self.options.allow_duplicates;

        let mut section_rand = if self.options.choose_all {
            Randomizer::choose_all()
        } else {
            randomizer::section_choice_randomizer(&seed, &self.exam.exam_id)
        };

        let mut chosen_sections: Vec<Arc<Section>> = Vec::new();
        for entry in &self.exam.sections {
            chosen_sections.extend(entry.resolve(&mut section_rand, allow_duplicates)?);
        }

        let mut assigned_sections = Vec::new();
        for (section_index, section) in chosen_sections.iter().enumerate() {
            assigned_sections.extend(self.create_randomized_section(
                section,
                student,
                section_index,
                &seed,
            )?);
        }

        Ok(AssignedExam::new(
            self.stamper.stamp(student, &self.exam.exam_id),
            self.exam.clone(),
            student.clone(),
            assigned_sections,
        ))
    }

    fn create_randomized_section(
        &self,
        section: &Arc<Section>,
        student: &StudentInfo,
        section_index: usize,
        seed: &str,
    ) -> Result<Vec<AssignedSection>> {
        let allow_duplicates = self.options.allow_duplicates;
        let exam_id = &self.exam.exam_id;

        let mut skin_rand = if self.options.choose_all {
            Randomizer::choose_all()
        } else {
            randomizer::section_skin_randomizer(seed, exam_id, &section.section_id)
        };
        let mut question_rand = if self.options.choose_all {
            Randomizer::choose_all()
        } else {
            randomizer::question_choice_randomizer(seed, exam_id, &section.section_id)
        };

        let section_skins = section.skin.resolve(&mut skin_rand, allow_duplicates)?;
        if !allow_duplicates && section_skins.len() != 1 {
            return Err(GenerationError::MultipleSkins {
                kind: ComponentKind::Section,
                id: section.section_id.clone(),
                count: section_skins.len(),
            });
        }

        let mut out = Vec::with_capacity(section_skins.len());
        for section_skin in &section_skins {
            let mut chosen_questions: Vec<Arc<Question>> = Vec::new();
            for entry in &section.questions {
                chosen_questions.extend(entry.resolve(&mut question_rand, allow_duplicates)?);
            }

            let mut assigned_questions = Vec::new();
            for (part_index, question) in chosen_questions.iter().enumerate() {
                assigned_questions.extend(self.create_randomized_question(
                    question,
                    student,
                    section_index,
                    part_index,
                    section_skin,
                    seed,
                )?);
            }

            out.push(AssignedSection::new(
                self.stamper
                    .stamp(student, &format!("{exam_id}-s-{}", section.section_id)),
                section.clone(),
                section_index,
                section_skin.clone(),
                assigned_questions,
            ));
        }
        Ok(out)
    }

    fn create_randomized_question(
        &self,
        question: &Arc<Question>,
        student: &StudentInfo,
        section_index: usize,
        part_index: usize,
        section_skin: &Arc<Skin>,
        seed: &str,
    ) -> Result<Vec<AssignedQuestion>> {
        let allow_duplicates = self.options.allow_duplicates;
        let exam_id = &self.exam.exam_id;

        let mut skin_rand = if self.options.choose_all {
            Randomizer::choose_all()
        } else {
            randomizer::question_skin_randomizer(seed, exam_id, &question.question_id)
        };

        let question_skins = question.skin.resolve(&mut skin_rand, allow_duplicates)?;
        if !allow_duplicates && question_skins.len() != 1 {
            return Err(GenerationError::MultipleSkins {
                kind: ComponentKind::Question,
                id: question.question_id.clone(),
                count: question_skins.len(),
            });
        }

        Ok(question_skins
            .iter()
            .map(|question_skin| AssignedQuestion {
                id: self
                    .stamper
                    .stamp(student, &format!("{exam_id}-q-{}", question.question_id)),
                question: question.clone(),
                section_index,
                part_index,
                skin: create_composite_skin(section_skin, question_skin),
                points: question.points,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ExamManifest;
    use crate::model::{
        ExamSpecification, QuestionChooserSpec, QuestionEntry, QuestionSpecification,
        SectionChooserSpec, SectionEntry, SectionSpecification, SkinChooserSpec, SkinEntry,
    };
    use std::collections::BTreeMap;

    fn student(uniqname: &str) -> StudentInfo {
        StudentInfo {
            uniqname: uniqname.into(),
            name: String::new(),
        }
    }

    fn question(id: &str, points: u32) -> Arc<QuestionSpecification> {
        Arc::new(QuestionSpecification {
            question_id: id.into(),
            mk_description: format!("Body of {id}."),
            points,
            tags: vec![],
            skin: None,
        })
    }

    fn skin(id: &str, pairs: &[(&str, &str)]) -> Arc<Skin> {
        Arc::new(Skin::new(
            id,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        ))
    }

    fn section(id: &str, questions: Vec<QuestionEntry>) -> Arc<SectionSpecification> {
        Arc::new(SectionSpecification {
            section_id: id.into(),
            title: id.into(),
            mk_description: String::new(),
            mk_reference: None,
            skin: None,
            questions,
        })
    }

    /// One chooser picking 2 of 3 sections, each picking 2 of 4 questions,
    /// all questions worth 5 points.
    fn two_of_three_exam(tag: &str) -> Arc<ExamSpecification> {
        let sections = (0..3)
            .map(|s| {
                let pool = (0..4)
                    .map(|q| QuestionEntry::Inline(question(&format!("{tag}_s{s}_q{q}"), 5)))
                    .collect();
                SectionEntry::Inline(section(
                    &format!("{tag}_s{s}"),
                    vec![QuestionEntry::Chooser(QuestionChooserSpec {
                        choose: 2,
                        pool,
                    })],
                ))
            })
            .collect();
        Arc::new(ExamSpecification {
            exam_id: format!("{tag}_exam"),
            title: "Scenario".into(),
            mk_instructions: String::new(),
            sections: vec![SectionEntry::Chooser(SectionChooserSpec {
                choose: 2,
                pool: sections,
            })],
        })
    }

    fn structure(ae: &AssignedExam) -> Vec<(String, Vec<String>)> {
        ae.sections
            .iter()
            .map(|s| {
                (
                    s.section.section_id.clone(),
                    s.questions
                        .iter()
                        .map(|q| q.question.question_id.clone())
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn two_of_three_sections_two_of_four_questions() {
        let spec = two_of_three_exam("eng_scenario");
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let alice = generator.assign_randomized_exam(&student("alice")).unwrap();
        let bob = generator.assign_randomized_exam(&student("bob")).unwrap();

        for ae in [&alice, &bob] {
            assert_eq!(ae.sections.len(), 2);
            for s in &ae.sections {
                assert_eq!(s.questions.len(), 2);
            }
            assert_eq!(ae.points_possible, 2 * 2 * 5);
        }
        assert_eq!(alice.points_possible, bob.points_possible);
    }

    #[test]
    fn cohort_of_independent_seeds_is_not_uniform() {
        let spec = two_of_three_exam("eng_spread");
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let names = ["alice", "bob", "carol", "dave", "erin"];
        let mut structures = Vec::new();
        for name in names {
            structures.push(structure(
                &generator.assign_randomized_exam(&student(name)).unwrap(),
            ));
        }
        let first = &structures[0];
        assert!(
            structures.iter().any(|s| s != first),
            "five independently seeded students all drew the same exam"
        );
    }

    #[test]
    fn consistent_randomization_gives_everyone_the_same_draw() {
        let spec = two_of_three_exam("eng_consistent");
        let mut generator = ExamGenerator::new(
            spec,
            GeneratorOptions {
                consistent_randomization: true,
                ..GeneratorOptions::default()
            },
        )
        .unwrap();
        let alice = generator.assign_randomized_exam(&student("alice")).unwrap();
        let bob = generator.assign_randomized_exam(&student("bob")).unwrap();
        assert_eq!(structure(&alice), structure(&bob));
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let spec = two_of_three_exam("eng_repro");
        let run = |spec: Arc<ExamSpecification>| {
            let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
            let ae = generator.assign_randomized_exam(&student("alice")).unwrap();
            serde_json::to_string(&ExamManifest::from(ae.as_ref())).unwrap()
        };
        assert_eq!(run(spec.clone()), run(spec));
    }

    #[test]
    fn choose_all_returns_the_full_exam_in_declared_order() {
        let spec = two_of_three_exam("eng_key");
        let mut generator = ExamGenerator::new(
            spec,
            GeneratorOptions {
                choose_all: true,
                ..GeneratorOptions::default()
            },
        )
        .unwrap();
        let key = generator.assign_randomized_exam(&student("answerkey")).unwrap();
        assert_eq!(key.sections.len(), 3);
        for (i, s) in key.sections.iter().enumerate() {
            assert_eq!(s.section.section_id, format!("eng_key_s{i}"));
            assert_eq!(s.questions.len(), 4);
        }
        assert_eq!(key.points_possible, 3 * 4 * 5);
    }

    #[test]
    fn shared_question_resolves_to_one_component_across_sections() {
        let shared = question("eng_shared_q", 5);
        let spec = Arc::new(ExamSpecification {
            exam_id: "eng_shared_exam".into(),
            title: "t".into(),
            mk_instructions: String::new(),
            sections: vec![
                SectionEntry::Inline(section(
                    "eng_shared_s0",
                    vec![QuestionEntry::Inline(shared.clone())],
                )),
                SectionEntry::Inline(section(
                    "eng_shared_s1",
                    vec![QuestionEntry::Inline(shared.clone())],
                )),
            ],
        });
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let ae = generator.assign_randomized_exam(&student("alice")).unwrap();
        let instances: Vec<_> = ae
            .questions()
            .filter(|q| q.question.question_id == "eng_shared_q")
            .collect();
        assert_eq!(instances.len(), 2);
        assert!(Arc::ptr_eq(
            &instances[0].question,
            &instances[1].question
        ));
    }

    #[test]
    fn composite_skin_merges_with_question_priority() {
        let section_spec = Arc::new(SectionSpecification {
            section_id: "eng_skin_s".into(),
            title: "t".into(),
            mk_description: String::new(),
            mk_reference: None,
            skin: Some(SkinEntry::Inline(skin(
                "sectionwide",
                &[("container", "list"), ("op", "push_front")],
            ))),
            questions: vec![QuestionEntry::Inline(Arc::new(QuestionSpecification {
                question_id: "eng_skin_q".into(),
                mk_description: String::new(),
                points: 1,
                tags: vec![],
                skin: Some(SkinEntry::Inline(skin("override", &[("container", "deque")]))),
            }))],
        });
        let spec = Arc::new(ExamSpecification {
            exam_id: "eng_skin_exam".into(),
            title: "t".into(),
            mk_instructions: String::new(),
            sections: vec![SectionEntry::Inline(section_spec)],
        });
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let ae = generator.assign_randomized_exam(&student("alice")).unwrap();
        let q = &ae.sections[0].questions[0];
        assert_eq!(q.skin.lookup("container"), Some("deque"));
        assert_eq!(q.skin.lookup("op"), Some("push_front"));
    }

    fn skin_chooser_question(tag: &str, choose: usize) -> Arc<ExamSpecification> {
        let q = Arc::new(QuestionSpecification {
            question_id: format!("{tag}_q"),
            mk_description: String::new(),
            points: 3,
            tags: vec![],
            skin: Some(SkinEntry::Chooser(SkinChooserSpec {
                choose,
                pool: vec![
                    SkinEntry::Inline(skin(&format!("{tag}_v0"), &[("v", "0")])),
                    SkinEntry::Inline(skin(&format!("{tag}_v1"), &[("v", "1")])),
                    SkinEntry::Inline(skin(&format!("{tag}_v2"), &[("v", "2")])),
                ],
            })),
        });
        Arc::new(ExamSpecification {
            exam_id: format!("{tag}_exam"),
            title: "t".into(),
            mk_instructions: String::new(),
            sections: vec![SectionEntry::Inline(section(
                &format!("{tag}_s"),
                vec![QuestionEntry::Inline(q)],
            ))],
        })
    }

    #[test]
    fn two_skins_without_allow_duplicates_is_fatal() {
        let spec = skin_chooser_question("eng_twoskin", 2);
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let err = generator
            .assign_randomized_exam(&student("alice"))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MultipleSkins {
                kind: ComponentKind::Question,
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn allow_duplicates_fans_one_question_into_one_instance_per_skin() {
        let spec = skin_chooser_question("eng_fanout", 2);
        let mut generator = ExamGenerator::new(
            spec,
            GeneratorOptions {
                allow_duplicates: true,
                student_ids: StudentIdPolicy::RandomV4,
                ..GeneratorOptions::default()
            },
        )
        .unwrap();
        let ae = generator.assign_randomized_exam(&student("alice")).unwrap();
        let instances: Vec<_> = ae.sections[0].questions.iter().collect();
        assert_eq!(instances.len(), 2);
        assert_ne!(instances[0].skin.skin_id, instances[1].skin.skin_id);
        assert_ne!(instances[0].id, instances[1].id);
        // Both variants share the position of the question they came from.
        assert_eq!(instances[0].part_index, instances[1].part_index);
        assert_eq!(ae.points_possible, 6);
    }

    #[test]
    fn namespaced_v5_requires_a_namespace() {
        let spec = two_of_three_exam("eng_ns_missing");
        let err = ExamGenerator::new(
            spec,
            GeneratorOptions {
                student_ids: StudentIdPolicy::NamespacedV5,
                ..GeneratorOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOptions(_)));
    }

    #[test]
    fn short_namespace_is_rejected_at_construction() {
        let spec = two_of_three_exam("eng_ns_short");
        let err = ExamGenerator::new(
            spec,
            GeneratorOptions {
                student_ids: StudentIdPolicy::NamespacedV5,
                uuidv5_namespace: Some("too short".into()),
                ..GeneratorOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOptions(_)));
    }

    #[test]
    fn namespaced_v5_ids_are_deterministic() {
        let spec = two_of_three_exam("eng_ns_det");
        let options = GeneratorOptions {
            student_ids: StudentIdPolicy::NamespacedV5,
            uuidv5_namespace: Some("winter-2026-final-exam".into()),
            ..GeneratorOptions::default()
        };
        let run = |spec: Arc<ExamSpecification>, options: GeneratorOptions| {
            let mut generator = ExamGenerator::new(spec, options).unwrap();
            generator
                .assign_randomized_exam(&student("alice"))
                .unwrap()
                .id
                .clone()
        };
        let a = run(spec.clone(), options.clone());
        let b = run(spec, options);
        assert_eq!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn random_v4_ids_differ_between_runs() {
        let spec = two_of_three_exam("eng_v4");
        let options = GeneratorOptions {
            student_ids: StudentIdPolicy::RandomV4,
            ..GeneratorOptions::default()
        };
        let run = |spec: Arc<ExamSpecification>, options: GeneratorOptions| {
            let mut generator = ExamGenerator::new(spec, options).unwrap();
            generator
                .assign_randomized_exam(&student("alice"))
                .unwrap()
                .id
                .clone()
        };
        assert_ne!(run(spec.clone(), options.clone()), run(spec, options));
    }

    #[test]
    fn roster_generation_and_lookup() {
        let spec = two_of_three_exam("eng_roster");
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let roster = vec![student("alice"), student("bob"), student("carol")];
        generator.assign_randomized_exams(&roster).unwrap();

        assert_eq!(generator.assigned_exams().len(), 3);
        assert!(generator.assigned_exam("bob").is_some());
        assert!(generator.assigned_exam("mallory").is_none());

        let snapshot = generator.cohort_snapshot();
        assert_eq!(snapshot.exam_id, "eng_roster_exam");
        assert_eq!(snapshot.student_index.len(), 3);
        // 2 sections and 4 questions appear per student.
        let section_total: usize = snapshot.stats.sections.values().sum();
        let question_total: usize = snapshot.stats.questions.values().sum();
        assert_eq!(section_total, 6);
        assert_eq!(question_total, 12);
    }

    #[test]
    fn student_id_policy_parse_and_display() {
        assert_eq!(
            "random-v4".parse::<StudentIdPolicy>().unwrap(),
            StudentIdPolicy::RandomV4
        );
        assert_eq!(StudentIdPolicy::NamespacedV5.to_string(), "namespaced-v5");
        assert!("uuidv6".parse::<StudentIdPolicy>().is_err());
    }

    #[test]
    fn uniqname_ids_concatenate_path_segments() {
        let spec = two_of_three_exam("eng_paths");
        let mut generator = ExamGenerator::new(spec, GeneratorOptions::default()).unwrap();
        let ae = generator.assign_randomized_exam(&student("alice")).unwrap();
        assert_eq!(ae.id, "alice-eng_paths_exam");
        for s in &ae.sections {
            assert_eq!(
                s.id,
                format!("alice-eng_paths_exam-s-{}", s.section.section_id)
            );
            for q in &s.questions {
                assert_eq!(
                    q.id,
                    format!("alice-eng_paths_exam-q-{}", q.question.question_id)
                );
            }
        }
    }
}

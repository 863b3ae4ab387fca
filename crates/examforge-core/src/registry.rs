//! Canonical runtime components and the identity-keyed registry.
//!
//! `realize_*` turns an author-written specification into its canonical
//! runtime [`Exam`]/[`Section`]/[`Question`] component. Realization is
//! memoized by specification object identity: one specification object
//! maps to exactly one component for the lifetime of the process, and two
//! distinct specification objects never collapse into one component even
//! when they are field-equal. The registry retains every component it
//! creates, so the pointer used as a key can never be recycled while the
//! process lives.
//!
//! Components also cache rendered markdown keyed by skin identity, since
//! thousands of assigned instances typically share a handful of skins.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use crate::chooser::{Chooser, ComponentRef, PoolEntry};
use crate::error::{GenerationError, Result};
use crate::model::{
    is_valid_id, ComponentKind, ExamSpecification, QuestionEntry, QuestionSpecification,
    SectionEntry, SectionSpecification, SkinEntry, MAX_ID_LENGTH,
};
use crate::skins::{default_skin, Skin};
use crate::traits::Renderer;

static EXAM_REGISTRY: LazyLock<Mutex<HashMap<usize, Arc<Exam>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static SECTION_REGISTRY: LazyLock<Mutex<HashMap<usize, Arc<Section>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static QUESTION_REGISTRY: LazyLock<Mutex<HashMap<usize, Arc<Question>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn validate_id(id: &str, kind: ComponentKind) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(GenerationError::InvalidId {
            kind,
            id: id.to_string(),
            max_len: MAX_ID_LENGTH,
        })
    }
}

/// Input to [`realize_exam`]: a fresh specification or an already-realized
/// component.
#[derive(Debug, Clone)]
pub enum ExamSource {
    Specification(Arc<ExamSpecification>),
    Component(Arc<Exam>),
}

impl From<Arc<ExamSpecification>> for ExamSource {
    fn from(spec: Arc<ExamSpecification>) -> Self {
        ExamSource::Specification(spec)
    }
}

impl From<Arc<Exam>> for ExamSource {
    fn from(component: Arc<Exam>) -> Self {
        ExamSource::Component(component)
    }
}

/// Input to [`realize_section`].
#[derive(Debug, Clone)]
pub enum SectionSource {
    Specification(Arc<SectionSpecification>),
    Component(Arc<Section>),
}

/// Input to [`realize_question`].
#[derive(Debug, Clone)]
pub enum QuestionSource {
    Specification(Arc<QuestionSpecification>),
    Component(Arc<Question>),
}

/// The canonical runtime form of an exam specification.
#[derive(Debug)]
pub struct Exam {
    pub spec: Arc<ExamSpecification>,
    pub exam_id: String,
    pub title: String,
    pub mk_instructions: String,
    /// Section slots in declared order: realized sections or choosers.
    pub sections: Vec<PoolEntry<Arc<Section>>>,
    instructions_cache: Mutex<HashMap<String, String>>,
}

impl Exam {
    fn from_spec(spec: Arc<ExamSpecification>) -> Result<Self> {
        validate_id(&spec.exam_id, ComponentKind::Exam)?;
        let sections = spec
            .sections
            .iter()
            .map(realize_section_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(Exam {
            exam_id: spec.exam_id.clone(),
            title: spec.title.clone(),
            mk_instructions: spec.mk_instructions.clone(),
            sections,
            instructions_cache: Mutex::new(HashMap::new()),
            spec,
        })
    }

    /// Instructions rendered under the default skin, memoized.
    pub fn render_instructions(&self, renderer: &dyn Renderer) -> String {
        let skin = default_skin();
        let mut cache = self
            .instructions_cache
            .lock()
            .expect("instructions cache poisoned");
        cache
            .entry(skin.skin_id.clone())
            .or_insert_with(|| renderer.render(&self.mk_instructions, &skin))
            .clone()
    }
}

/// The canonical runtime form of a section specification.
#[derive(Debug)]
pub struct Section {
    pub spec: Arc<SectionSpecification>,
    pub section_id: String,
    pub title: String,
    pub mk_description: String,
    pub mk_reference: Option<String>,
    /// Skin chooser; a fixed or absent skin is normalized to a
    /// single-candidate chooser.
    pub skin: Chooser<Arc<Skin>>,
    /// Question slots in declared order: realized questions or choosers.
    pub questions: Vec<PoolEntry<Arc<Question>>>,
    description_cache: Mutex<HashMap<String, String>>,
    reference_cache: Mutex<HashMap<String, String>>,
}

impl Section {
    fn from_spec(spec: Arc<SectionSpecification>) -> Result<Self> {
        validate_id(&spec.section_id, ComponentKind::Section)?;
        let questions = spec
            .questions
            .iter()
            .map(realize_question_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(Section {
            section_id: spec.section_id.clone(),
            title: spec.title.clone(),
            mk_description: spec.mk_description.clone(),
            mk_reference: spec.mk_reference.clone(),
            skin: realize_skin_chooser(spec.skin.as_ref())?,
            questions,
            description_cache: Mutex::new(HashMap::new()),
            reference_cache: Mutex::new(HashMap::new()),
            spec,
        })
    }

    pub fn render_description(&self, renderer: &dyn Renderer, skin: &Skin) -> String {
        let mut cache = self
            .description_cache
            .lock()
            .expect("description cache poisoned");
        cache
            .entry(skin.skin_id.clone())
            .or_insert_with(|| renderer.render(&self.mk_description, skin))
            .clone()
    }

    /// Reference material rendered under `skin`, memoized. `None` when the
    /// section has no reference material.
    pub fn render_reference(&self, renderer: &dyn Renderer, skin: &Skin) -> Option<String> {
        let mk_reference = self.mk_reference.as_ref()?;
        let mut cache = self
            .reference_cache
            .lock()
            .expect("reference cache poisoned");
        Some(
            cache
                .entry(skin.skin_id.clone())
                .or_insert_with(|| renderer.render(mk_reference, skin))
                .clone(),
        )
    }
}

/// The canonical runtime form of a question specification.
#[derive(Debug)]
pub struct Question {
    pub spec: Arc<QuestionSpecification>,
    pub question_id: String,
    pub mk_description: String,
    pub points: u32,
    pub tags: Vec<String>,
    /// Skin chooser; a fixed or absent skin is normalized to a
    /// single-candidate chooser.
    pub skin: Chooser<Arc<Skin>>,
    description_cache: Mutex<HashMap<String, String>>,
}

impl Question {
    fn from_spec(spec: Arc<QuestionSpecification>) -> Result<Self> {
        validate_id(&spec.question_id, ComponentKind::Question)?;
        Ok(Question {
            question_id: spec.question_id.clone(),
            mk_description: spec.mk_description.clone(),
            points: spec.points,
            tags: spec.tags.clone(),
            skin: realize_skin_chooser(spec.skin.as_ref())?,
            description_cache: Mutex::new(HashMap::new()),
            spec,
        })
    }

    pub fn render_description(&self, renderer: &dyn Renderer, skin: &Skin) -> String {
        let mut cache = self
            .description_cache
            .lock()
            .expect("description cache poisoned");
        cache
            .entry(skin.skin_id.clone())
            .or_insert_with(|| renderer.render(&self.mk_description, skin))
            .clone()
    }
}

impl ComponentRef for Arc<Exam> {
    const KIND: ComponentKind = ComponentKind::Exam;

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.spec) as usize
    }
}

impl ComponentRef for Arc<Section> {
    const KIND: ComponentKind = ComponentKind::Section;

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.spec) as usize
    }
}

impl ComponentRef for Arc<Question> {
    const KIND: ComponentKind = ComponentKind::Question;

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.spec) as usize
    }
}

/// Realizes an exam. Idempotent: an already-realized component is returned
/// unchanged; realizing the same specification object again returns the
/// cached component.
pub fn realize_exam(source: ExamSource) -> Result<Arc<Exam>> {
    match source {
        ExamSource::Component(component) => Ok(component),
        ExamSource::Specification(spec) => {
            let key = Arc::as_ptr(&spec) as usize;
            if let Some(existing) = EXAM_REGISTRY
                .lock()
                .expect("exam registry poisoned")
                .get(&key)
            {
                return Ok(existing.clone());
            }
            tracing::debug!(exam_id = %spec.exam_id, "realizing exam specification");
            let component = Arc::new(Exam::from_spec(spec)?);
            Ok(EXAM_REGISTRY
                .lock()
                .expect("exam registry poisoned")
                .entry(key)
                .or_insert(component)
                .clone())
        }
    }
}

/// Realizes a section. Same memoization contract as [`realize_exam`].
pub fn realize_section(source: SectionSource) -> Result<Arc<Section>> {
    match source {
        SectionSource::Component(component) => Ok(component),
        SectionSource::Specification(spec) => {
            let key = Arc::as_ptr(&spec) as usize;
            if let Some(existing) = SECTION_REGISTRY
                .lock()
                .expect("section registry poisoned")
                .get(&key)
            {
                return Ok(existing.clone());
            }
            let component = Arc::new(Section::from_spec(spec)?);
            Ok(SECTION_REGISTRY
                .lock()
                .expect("section registry poisoned")
                .entry(key)
                .or_insert(component)
                .clone())
        }
    }
}

/// Realizes a question. Same memoization contract as [`realize_exam`].
pub fn realize_question(source: QuestionSource) -> Result<Arc<Question>> {
    match source {
        QuestionSource::Component(component) => Ok(component),
        QuestionSource::Specification(spec) => {
            let key = Arc::as_ptr(&spec) as usize;
            if let Some(existing) = QUESTION_REGISTRY
                .lock()
                .expect("question registry poisoned")
                .get(&key)
            {
                return Ok(existing.clone());
            }
            let component = Arc::new(Question::from_spec(spec)?);
            Ok(QUESTION_REGISTRY
                .lock()
                .expect("question registry poisoned")
                .entry(key)
                .or_insert(component)
                .clone())
        }
    }
}

fn realize_section_entry(entry: &SectionEntry) -> Result<PoolEntry<Arc<Section>>> {
    match entry {
        SectionEntry::Inline(spec) => Ok(PoolEntry::Component(realize_section(
            SectionSource::Specification(spec.clone()),
        )?)),
        SectionEntry::Chooser(chooser) => Ok(PoolEntry::Chooser(Chooser {
            choose: chooser.choose,
            pool: chooser
                .pool
                .iter()
                .map(realize_section_entry)
                .collect::<Result<Vec<_>>>()?,
        })),
    }
}

fn realize_question_entry(entry: &QuestionEntry) -> Result<PoolEntry<Arc<Question>>> {
    match entry {
        QuestionEntry::Inline(spec) => Ok(PoolEntry::Component(realize_question(
            QuestionSource::Specification(spec.clone()),
        )?)),
        QuestionEntry::Chooser(chooser) => Ok(PoolEntry::Chooser(Chooser {
            choose: chooser.choose,
            pool: chooser
                .pool
                .iter()
                .map(realize_question_entry)
                .collect::<Result<Vec<_>>>()?,
        })),
    }
}

fn realize_skin_chooser(entry: Option<&SkinEntry>) -> Result<Chooser<Arc<Skin>>> {
    match entry {
        None => Ok(Chooser::fixed(default_skin())),
        Some(SkinEntry::Inline(skin)) => {
            validate_id(&skin.skin_id, ComponentKind::Skin)?;
            Ok(Chooser::fixed(skin.clone()))
        }
        Some(SkinEntry::Chooser(chooser)) => Ok(Chooser {
            choose: chooser.choose,
            pool: chooser
                .pool
                .iter()
                .map(realize_skin_pool_entry)
                .collect::<Result<Vec<_>>>()?,
        }),
    }
}

fn realize_skin_pool_entry(entry: &SkinEntry) -> Result<PoolEntry<Arc<Skin>>> {
    match entry {
        SkinEntry::Inline(skin) => {
            validate_id(&skin.skin_id, ComponentKind::Skin)?;
            Ok(PoolEntry::Component(skin.clone()))
        }
        SkinEntry::Chooser(chooser) => Ok(PoolEntry::Chooser(Chooser {
            choose: chooser.choose,
            pool: chooser
                .pool
                .iter()
                .map(realize_skin_pool_entry)
                .collect::<Result<Vec<_>>>()?,
        })),
    }
}

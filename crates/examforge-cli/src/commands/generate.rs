//! The `examforge generate` command.
//!
//! The output boundary of the system: drives the engine for a whole
//! cohort, then writes per-student manifests and the cohort snapshot.
//! Nothing is written until the entire batch has been generated and
//! audited, so a failed batch leaves no partial output behind.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;

use examforge_core::engine::{ExamGenerator, GeneratorOptions, StudentIdPolicy};
use examforge_core::manifest::ExamManifest;
use examforge_core::parser;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    exam_path: PathBuf,
    roster_path: PathBuf,
    output: PathBuf,
    student_ids: String,
    uuidv5_namespace: Option<String>,
    choose_all: bool,
    allow_duplicates: bool,
    consistent_randomization: bool,
) -> Result<()> {
    let student_ids: StudentIdPolicy = student_ids
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{e}"))?;

    let spec = parser::parse_exam_spec(&exam_path)?;
    let roster = parser::parse_roster(&roster_path)?;
    anyhow::ensure!(!roster.is_empty(), "roster is empty");

    let mut warnings = parser::validate_exam_spec(&spec);
    warnings.extend(parser::validate_roster(&roster));
    for w in &warnings {
        let prefix = w
            .component_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        eprintln!("{prefix} WARNING: {}", w.message);
    }

    let options = GeneratorOptions {
        student_ids,
        uuidv5_namespace,
        choose_all,
        allow_duplicates,
        consistent_randomization,
    };
    let mut generator = ExamGenerator::new(spec, options)?;
    generator.assign_randomized_exams(&roster)?;
    tracing::info!(
        students = roster.len(),
        exam_id = %generator.exam().exam_id,
        "cohort generated and audited"
    );

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    for ae in generator.assigned_exams() {
        let manifest = ExamManifest::from(ae.as_ref());
        let path = output.join(format!("{}-{}.json", ae.student.uniqname, ae.id));
        std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
    }

    let snapshot = generator.cohort_snapshot();
    let snapshot_path = output.join("cohort.json");
    std::fs::write(&snapshot_path, serde_json::to_string_pretty(&snapshot)?)
        .with_context(|| format!("failed to write snapshot {}", snapshot_path.display()))?;

    let mut table = Table::new();
    table.set_header(vec!["kind", "id", "uses"]);
    for (id, n) in &snapshot.stats.sections {
        table.add_row(vec!["section".to_string(), id.clone(), n.to_string()]);
    }
    for (id, n) in &snapshot.stats.questions {
        table.add_row(vec!["question".to_string(), id.clone(), n.to_string()]);
    }
    println!("{table}");

    println!(
        "Generated {} exams for {} into {}",
        generator.assigned_exams().len(),
        snapshot.exam_id,
        output.display()
    );

    Ok(())
}

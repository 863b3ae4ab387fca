//! The `examforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(exam_path: PathBuf) -> Result<()> {
    let spec = examforge_core::parser::parse_exam_spec(&exam_path)?;

    println!("Exam: {} ({} top-level section entries)", spec.exam_id, spec.sections.len());

    let warnings = examforge_core::parser::validate_exam_spec(&spec);
    for w in &warnings {
        let prefix = w
            .component_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Exam specification valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}

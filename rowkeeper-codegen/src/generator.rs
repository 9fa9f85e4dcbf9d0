//! Generation driver: introspect, then write stub and base files per table.
//!
//! Layout under the output directory:
//!
//! ```text
//! <output>/<entity>.rs                 stub, written only when absent
//! <output>/generated/<entity>_base.rs  metadata, rewritten every run
//! <output>/generated/mod.rs            declares every *_base module present
//! ```

use crate::error::Result;
use crate::introspect::introspect;
use crate::table::TableDefinition;
use crate::writer::EntityWriter;
use rowkeeper::Executor;
use std::fs;
use std::path::{Path, PathBuf};

/// What one run touched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files created or rewritten
    pub written: Vec<PathBuf>,
    /// Stubs left alone because they already existed
    pub kept: Vec<PathBuf>,
    /// Tables not generated, with the reason
    pub skipped_tables: Vec<(String, String)>,
}

pub struct Generator<'a> {
    db: &'a dyn Executor,
    output: PathBuf,
    only: Option<Vec<String>>,
    writer: EntityWriter,
}

impl<'a> Generator<'a> {
    pub fn new(db: &'a dyn Executor, output: impl Into<PathBuf>) -> Self {
        Self {
            db,
            output: output.into(),
            only: None,
            writer: EntityWriter::new(),
        }
    }

    /// Restrict generation to these tables.
    #[must_use]
    pub fn only_tables(mut self, tables: Vec<String>) -> Self {
        self.only = if tables.is_empty() { None } else { Some(tables) };
        self
    }

    pub fn run(&self) -> Result<GenerationReport> {
        let generated_dir = self.output.join("generated");
        fs::create_dir_all(&generated_dir)?;

        let tables = introspect(self.db, self.only.as_deref())?;
        let mut report = GenerationReport::default();

        for table in &tables {
            if table.primary_key().is_none() {
                log::warn!("skipping {}: no single-column primary key", table.table_name);
                report.skipped_tables.push((
                    table.table_name.clone(),
                    "no single-column primary key".to_string(),
                ));
                continue;
            }
            self.write_table(table, &generated_dir, &mut report)?;
        }

        let mod_path = generated_dir.join("mod.rs");
        let modules = base_modules(&generated_dir)?;
        fs::write(&mod_path, self.writer.generated_mod_source(&modules)?)?;
        report.written.push(mod_path);

        log::info!(
            "generated {} file(s), kept {} stub(s), skipped {} table(s)",
            report.written.len(),
            report.kept.len(),
            report.skipped_tables.len()
        );
        Ok(report)
    }

    fn write_table(
        &self,
        table: &TableDefinition,
        generated_dir: &Path,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let module = table.module_name();

        let stub_path = self.output.join(format!("{module}.rs"));
        if stub_path.exists() {
            log::debug!("keeping existing stub {}", stub_path.display());
            report.kept.push(stub_path);
        } else {
            fs::write(&stub_path, self.writer.stub_source(table)?)?;
            report.written.push(stub_path);
        }

        let base_path = generated_dir.join(format!("{module}_base.rs"));
        fs::write(&base_path, self.writer.base_source(table)?)?;
        report.written.push(base_path);
        Ok(())
    }
}

/// Sorted `*_base` module names found in the generated directory.
fn base_modules(generated_dir: &Path) -> Result<Vec<String>> {
    let mut modules = Vec::new();
    for entry in fs::read_dir(generated_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if stem.ends_with("_base") {
                modules.push(stem.to_string());
            }
        }
    }
    modules.sort();
    Ok(modules)
}

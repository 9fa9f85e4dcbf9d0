//! Code generation writer
//!
//! Two files per table: a base file holding the table's metadata constants
//! (rewritten on every run) and a stub holding the entity's behavior and
//! constructor (written once, then owned by the user).

use crate::error::{CodegenError, Result};
use crate::table::TableDefinition;
use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

const BASE_HEADER: &str = "// Generated by rowkeeper-codegen. Do not edit: this file is rewritten on every run.";
const STUB_HEADER: &str = "// Generated once by rowkeeper-codegen. Add hooks and custom behavior here.";

#[derive(Debug, Default)]
pub struct EntityWriter;

impl EntityWriter {
    pub fn new() -> Self {
        Self
    }

    /// Source of `generated/<module>_base.rs`.
    pub fn base_source(&self, table: &TableDefinition) -> Result<String> {
        let primary_key = table.primary_key().ok_or_else(|| {
            CodegenError::Generation(format!(
                "table `{}` has no single-column primary key",
                table.table_name
            ))
        })?;
        let table_name = table.table_name.as_str();
        let columns = table.column_names();

        let tokens = quote! {
            use rowkeeper::Metadata;

            pub const TABLE_NAME: &str = #table_name;
            pub const COLUMNS: &[&str] = &[#(#columns),*];
            pub const PRIMARY_KEY: &str = #primary_key;

            pub fn metadata() -> rowkeeper::Result<Metadata> {
                Metadata::new(TABLE_NAME, COLUMNS.iter().copied(), PRIMARY_KEY)
            }
        };

        Ok(render(BASE_HEADER, &tokens))
    }

    /// Source of `<module>.rs`.
    pub fn stub_source(&self, table: &TableDefinition) -> Result<String> {
        let behavior = ident(&format!("{}Behavior", table.entity_name()))?;
        let base_module = ident(&format!("{}_base", table.module_name()))?;

        let tokens = quote! {
            use super::generated::#base_module;
            use rowkeeper::{Entity, RecordBehavior};
            use std::sync::Arc;

            pub struct #behavior;

            impl RecordBehavior for #behavior {}

            pub fn entity() -> rowkeeper::Result<Arc<Entity>> {
                Entity::builder(#base_module::metadata()?)
                    .behavior(#behavior)
                    .build()
            }
        };

        Ok(render(STUB_HEADER, &tokens))
    }

    /// Source of `generated/mod.rs` declaring every base module.
    pub fn generated_mod_source(&self, base_modules: &[String]) -> Result<String> {
        let modules = base_modules
            .iter()
            .map(|m| ident(m))
            .collect::<Result<Vec<_>>>()?;

        let tokens = quote! {
            #(pub mod #modules;)*
        };

        Ok(render(BASE_HEADER, &tokens))
    }
}

fn ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name)
        .map_err(|e| CodegenError::Generation(format!("`{name}` is not a valid identifier: {e}")))
}

fn render(header: &str, tokens: &TokenStream) -> String {
    let body = format_code(&tokens.to_string());
    format!("{header}\n\n{body}")
}

/// Format code with rustfmt, returning it unformatted when rustfmt is missing
/// or rejects it.
fn format_code(code: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let child = Command::new("rustfmt")
        .args(["--edition", "2021", "--emit", "stdout"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match child {
        Ok(child) => child,
        Err(err) => {
            log::debug!("rustfmt unavailable ({err}), writing unformatted source");
            return code.to_string();
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(code.as_bytes()).is_err() {
            return code.to_string();
        }
    }

    match child.wait_with_output() {
        Ok(output) if output.status.success() => {
            String::from_utf8(output.stdout).unwrap_or_else(|_| code.to_string())
        }
        _ => {
            log::warn!("rustfmt failed, writing unformatted source");
            code.to_string()
        }
    }
}

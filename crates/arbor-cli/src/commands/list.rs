//! List command implementation.
//!
//! Shows the saved models and contracts in a directory.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use arbor_ext_json::{list_json_files, load_contract_file, load_model_file};

use crate::commands::Context;
use crate::output::print_output;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

/// One listed file.
#[derive(Debug, Serialize, Tabled)]
struct FileEntry {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Summary")]
    summary: String,
}

fn describe(path: &Path) -> FileEntry {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Ok(model) = load_model_file(path) {
        let summary = match model.dt() {
            Some(dt) => format!("{} steps, dt {dt}", model.steps()),
            None => format!("{} steps, template", model.steps()),
        };
        return FileEntry {
            file,
            kind: "model",
            summary,
        };
    }

    if let Ok(contract) = load_contract_file(path) {
        let summary = format!(
            "{} {} {} K={} T={}",
            contract.kind().style(),
            contract.side(),
            contract.underlying(),
            contract.strike(),
            contract.expiration()
        );
        return FileEntry {
            file,
            kind: "contract",
            summary,
        };
    }

    FileEntry {
        file,
        kind: "other",
        summary: String::new(),
    }
}

/// Execute the list command.
pub fn execute(args: ListArgs, ctx: &Context) -> Result<()> {
    let entries: Vec<FileEntry> = list_json_files(&args.dir)?
        .iter()
        .map(|path| describe(path))
        .collect();
    tracing::debug!(count = entries.len(), dir = %args.dir.display(), "listed files");

    print_output(&entries, ctx.format)
}

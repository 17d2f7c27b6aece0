use crate::support::{self, Context};
use migaudit_table::{split, write_dataset_csv};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

pub fn run(input: PathBuf, size: usize, output: PathBuf, json_output: bool, ctx: &Context) {
    let rows = support::read_dataset_or_exit(&input, ctx.load);
    let chunks = split(&rows, size).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let prefix = output.display().to_string();
    let mut files = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let path = PathBuf::from(chunk.file_name(&prefix));
        write_dataset_csv(&path, &chunk.rows).unwrap_or_else(|e| {
            eprintln!("error: failed to write {}: {e}", path.display());
            std::process::exit(1);
        });
        debug!(path = %path.display(), rows = chunk.rows.len(), "wrote chunk");
        files.push(path.display().to_string());
    }

    if json_output {
        support::print_json(&json!({
            "action": "split",
            "rows": rows.len(),
            "size": size,
            "files": files,
        }));
    } else {
        println!(
            "migaudit split\n  Rows: {}\n  Files: {}",
            rows.len(),
            files.len()
        );
        for file in &files {
            println!("    {file}");
        }
    }
}

use crate::support::{self, Context};
use migaudit_table::{filter_by_ids, write_dataset_csv};
use serde_json::json;
use std::path::PathBuf;

pub fn run(
    input: PathBuf,
    column: String,
    ids: PathBuf,
    output: PathBuf,
    json_output: bool,
    ctx: &Context,
) {
    let rows = support::read_dataset_or_exit(&input, ctx.load);
    let id_rows = support::read_dataset_or_exit(&ids, ctx.load);
    let kept = filter_by_ids(&rows, &id_rows, &column).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    write_dataset_csv(&output, &kept).unwrap_or_else(|e| {
        eprintln!("error: failed to write {}: {e}", output.display());
        std::process::exit(1);
    });

    if json_output {
        support::print_json(&json!({
            "action": "filter",
            "column": column,
            "outputPath": output.display().to_string(),
            "kept": kept.len(),
            "total": rows.len(),
        }));
    } else {
        println!(
            "migaudit filter\n  Column: {column}\n  Kept: {} of {}\n  Output: {}",
            kept.len(),
            rows.len(),
            output.display()
        );
    }
}

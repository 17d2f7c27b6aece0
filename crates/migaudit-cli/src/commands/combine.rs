use crate::support::{self, Context};
use migaudit_table::{combine, write_dataset_csv};
use serde_json::json;
use std::path::PathBuf;

pub fn run(item: PathBuf, thesis: PathBuf, output: PathBuf, json_output: bool, ctx: &Context) {
    let items = support::read_dataset_or_exit(&item, ctx.load);
    let theses = support::read_dataset_or_exit(&thesis, ctx.load);
    let combined = combine(&items, &theses).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    write_dataset_csv(&output, &combined).unwrap_or_else(|e| {
        eprintln!("error: failed to write {}: {e}", output.display());
        std::process::exit(1);
    });

    if json_output {
        support::print_json(&json!({
            "action": "combine",
            "outputPath": output.display().to_string(),
            "items": items.len(),
            "theses": theses.len(),
            "columns": combined.headers().len(),
        }));
    } else {
        println!(
            "migaudit combine\n  Items: {}\n  Theses: {}\n  Columns: {}\n  Output: {}",
            items.len(),
            theses.len(),
            combined.headers().len(),
            output.display()
        );
    }
}

use crate::support;
use migaudit_table::{flatten_jsonl, write_dataset_csv};
use serde_json::json;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

pub fn run(record_type: String, input: PathBuf, output: PathBuf, json_output: bool) {
    let record_type = support::parse_record_type_or_exit(&record_type);
    let file = File::open(&input).unwrap_or_else(|e| {
        eprintln!("error: failed to open {}: {e}", input.display());
        std::process::exit(1);
    });
    let (dataset, stats) = flatten_jsonl(
        BufReader::new(file),
        &input.display().to_string(),
        record_type,
    )
    .unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    write_dataset_csv(&output, &dataset).unwrap_or_else(|e| {
        eprintln!("error: failed to write {}: {e}", output.display());
        std::process::exit(1);
    });

    if json_output {
        support::print_json(&json!({
            "action": "flatten",
            "recordType": record_type,
            "outputPath": output.display().to_string(),
            "records": stats.records,
            "columns": dataset.headers().len(),
            "droppedKeys": stats.dropped_keys,
        }));
    } else {
        println!(
            "migaudit flatten\n  Record type: {record_type}\n  Records: {}\n  Dropped keys: {}\n  Output: {}",
            stats.records,
            stats.dropped_keys,
            output.display()
        );
    }
}

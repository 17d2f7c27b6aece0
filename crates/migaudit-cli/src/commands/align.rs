use crate::support::{self, Context};
use migaudit_kernel::Side;
use migaudit_table::write_aligned_csv;
use serde_json::json;
use std::path::PathBuf;

pub fn run(
    record_type: String,
    source: PathBuf,
    target: PathBuf,
    output: PathBuf,
    json_output: bool,
    ctx: &Context,
) {
    let record_type = support::parse_record_type_or_exit(&record_type);
    let config = record_type.config();
    let source_rows = support::read_dataset_or_exit(&source, ctx.load);
    let target_rows = support::read_dataset_or_exit(&target, ctx.load);

    for (side, dataset) in [(Side::Source, &source_rows), (Side::Target, &target_rows)] {
        if let Some(column) = config.key(side).iter().find(|c| !dataset.has_column(c)) {
            eprintln!("error: {side} dataset is missing join column `{column}`");
            std::process::exit(1);
        }
    }

    let rows = write_aligned_csv(
        &output,
        &source_rows,
        config.key(Side::Source),
        &target_rows,
        config.key(Side::Target),
    )
    .unwrap_or_else(|e| {
        eprintln!("error: failed to write joined dataset: {e}");
        std::process::exit(1);
    });

    if json_output {
        support::print_json(&json!({
            "action": "align",
            "recordType": record_type,
            "outputPath": output.display().to_string(),
            "rows": rows,
            "sourceKey": config.key(Side::Source),
            "targetKey": config.key(Side::Target),
        }));
    } else {
        println!(
            "migaudit align\n  Record type: {record_type}\n  Rows: {rows}\n  Output: {}",
            output.display()
        );
    }
}

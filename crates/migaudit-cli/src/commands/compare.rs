use crate::support::{self, Context};
use chrono::Utc;
use migaudit_kernel::audit;
use migaudit_table::{LoadOptions, file_digest, write_report_csv};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Args {
    pub record_type: String,
    pub source: PathBuf,
    pub target: PathBuf,
    pub output: PathBuf,
    pub empty_as_text: bool,
    pub fail_on_mismatch: bool,
    pub json: bool,
}

pub fn run(args: Args, ctx: &Context) {
    let record_type = support::parse_record_type_or_exit(&args.record_type);
    let load = if args.empty_as_text {
        LoadOptions {
            empty_as_missing: false,
        }
    } else {
        ctx.load
    };

    let source = support::read_dataset_or_exit(&args.source, load);
    let target = support::read_dataset_or_exit(&args.target, load);

    let report = audit(&record_type.config(), &source, &target, &ctx.vocab).unwrap_or_else(|e| {
        eprintln!("error: {record_type} audit aborted: {e}");
        std::process::exit(1);
    });

    let inputs = json!({
        "source": input_info(&args.source, source.len()),
        "target": input_info(&args.target, target.len()),
    });

    write_report_csv(&args.output, &report).unwrap_or_else(|e| {
        eprintln!("error: failed to write report: {e}");
        std::process::exit(1);
    });

    info!(
        path = %args.output.display(),
        rows = report.rows.len(),
        "wrote audit report"
    );

    let summary = report.summary();
    if args.json {
        let payload = json!({
            "action": "compare",
            "recordType": record_type,
            "reportPath": args.output.display().to_string(),
            "generatedAt": Utc::now().to_rfc3339(),
            "inputs": inputs,
            "summary": summary,
        });
        support::print_json(&payload);
    } else {
        println!(
            "migaudit compare\n  Source: {}\n  Target: {}\n  Report: {}",
            args.source.display(),
            args.target.display(),
            args.output.display()
        );
        print!("{summary}");
    }

    if args.fail_on_mismatch && report.has_failures() {
        std::process::exit(2);
    }
}

fn input_info(path: &Path, rows: usize) -> serde_json::Value {
    let digest = file_digest(path).unwrap_or_else(|e| {
        eprintln!("error: failed to hash {}: {e}", path.display());
        std::process::exit(1);
    });
    json!({
        "path": path.display().to_string(),
        "sha256": digest,
        "rows": rows,
    })
}

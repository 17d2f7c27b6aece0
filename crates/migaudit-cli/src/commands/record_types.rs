use crate::support;
use migaudit_kernel::{RecordType, Side};
use serde_json::json;

pub fn run(json_output: bool) {
    let configs: Vec<_> = RecordType::ALL.into_iter().map(RecordType::config).collect();

    if json_output {
        let items: Vec<_> = configs
            .iter()
            .map(|config| {
                json!({
                    "recordType": config.record_type,
                    "sourceKey": config.key(Side::Source),
                    "targetKey": config.key(Side::Target),
                    "fields": config.fields.iter().map(|field| json!({
                        "label": field.label,
                        "source": field.source,
                        "target": field.target,
                        "comparator": field.comparator,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        support::print_json(&json!({ "recordTypes": items }));
        return;
    }

    println!("migaudit record-types");
    for config in &configs {
        println!(
            "\n  {} (key {} = {})",
            config.record_type,
            config.key(Side::Source).join("+"),
            config.key(Side::Target).join("+")
        );
        for field in &config.fields {
            println!(
                "    {:<28} {:<22} {} -> {}",
                field.label,
                field.comparator.name(),
                field.source.join(", "),
                field.target.join(", ")
            );
        }
    }
}

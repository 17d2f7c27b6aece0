//! migaudit CLI: the `migaudit` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let config = support::load_config_or_exit(cli.config.as_deref());
    support::init_logging_or_exit(cli.log_level.as_deref(), cli.log_format, &config.logging);
    let ctx = support::build_context_or_exit(&config);

    match cli.command {
        Commands::Compare {
            record_type,
            source,
            target,
            output,
            empty_as_text,
            fail_on_mismatch,
            json,
        } => commands::compare::run(
            commands::compare::Args {
                record_type,
                source,
                target,
                output,
                empty_as_text,
                fail_on_mismatch,
                json,
            },
            &ctx,
        ),

        Commands::Align {
            record_type,
            source,
            target,
            output,
            json,
        } => commands::align::run(record_type, source, target, output, json, &ctx),

        Commands::Flatten {
            record_type,
            input,
            output,
            json,
        } => commands::flatten::run(record_type, input, output, json),

        Commands::Filter {
            input,
            column,
            ids,
            output,
            json,
        } => commands::filter::run(input, column, ids, output, json, &ctx),

        Commands::Split {
            input,
            size,
            output,
            json,
        } => commands::split::run(input, size, output, json, &ctx),

        Commands::Combine {
            item,
            thesis,
            output,
            json,
        } => commands::combine::run(item, thesis, output, json, &ctx),

        Commands::RecordTypes { json } => commands::record_types::run(json),
    }
}

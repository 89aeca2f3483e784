//! Printing of command results.
//!
//! Separate from the commands so glean can be used as a library. Every
//! printer has a `_to` variant taking a writer, used by the tests.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, InitSummary, PluginListing, PluginSection,
};
use crate::utils::{max_width, pad_end};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Extract(summary) => {
            print_extract_to(summary, &mut io::stdout().lock());
            print_failed_files_warning(summary.failed_files(), verbose);
        }
        CommandSummary::Json(json) => println!("{}", json),
        CommandSummary::Plugins(listings) => print_plugins_to(listings, &mut io::stdout().lock()),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print every plugin section followed by the run footer.
pub fn print_extract_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    for (i, section) in summary.sections.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(writer);
        }
        print_section(section, writer);
    }

    if let Some(name) = &summary.stopped_by {
        let _ = writeln!(
            writer,
            "\n{} critical plugin '{}' failed, remaining plugins were skipped",
            "warning:".bold().yellow(),
            name
        );
    }

    let failed = summary.sections.iter().filter(|s| !s.success).count();
    let plugins = summary.sections.len();
    let counts = format!(
        "{} {}",
        plugins,
        if plugins == 1 { "plugin" } else { "plugins" }
    );
    let footer = match summary.elapsed_ms {
        Some(ms) => format!("Finished {} in {}ms", counts, ms),
        None => format!("Finished {}", counts),
    };
    if failed == 0 {
        let _ = writeln!(writer, "\n{} {}", SUCCESS_MARK.green(), footer.green());
    } else {
        let _ = writeln!(
            writer,
            "\n{} {} ({} failed)",
            FAILURE_MARK.red(),
            footer,
            failed.to_string().red()
        );
    }
}

fn print_section<W: Write>(section: &PluginSection, writer: &mut W) {
    let mark = if section.success {
        SUCCESS_MARK.green()
    } else {
        FAILURE_MARK.red()
    };
    let meta = &section.metadata;
    let _ = writeln!(
        writer,
        "{} {} {}",
        mark,
        section.name.bold(),
        format!("({} of {} files)", meta.processed, meta.filtered).dimmed()
    );

    for error in &section.errors {
        let _ = writeln!(writer, "{} {}", "error:".bold().red(), error);
    }
    for warning in &section.warnings {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), warning);
    }
    if let Some(body) = &section.body {
        let _ = writeln!(writer, "{}", body.trim_end());
    }
}

/// Print a warning about files that failed during processing.
pub fn print_failed_files_warning(count: usize, verbose: bool) {
    print_failed_files_warning_to(count, verbose, &mut io::stderr().lock());
}

pub fn print_failed_files_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be processed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print the plugin table: name, priority, version, description.
pub fn print_plugins_to<W: Write>(listings: &[PluginListing], writer: &mut W) {
    let name_width = max_width(listings.iter().map(|l| l.name.as_str()));
    for listing in listings {
        let mut notes = Vec::new();
        if !listing.dependencies.is_empty() {
            notes.push(format!("depends on: {}", listing.dependencies.join(", ")));
        }
        if !listing.enabled {
            notes.push("disabled".to_string());
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" {}", format!("({})", notes.join("; ")).dimmed())
        };

        let _ = writeln!(
            writer,
            "{}  {:>3}  {}  {}{}",
            pad_end(&listing.name, name_width).bold(),
            listing.priority,
            listing.version.dimmed(),
            listing.description,
            notes
        );
    }
}

fn print_init(summary: &InitSummary) {
    match &summary.error {
        Some(error) => eprintln!("Error: {}", error),
        None => println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", summary.file).green()
        ),
    }
}

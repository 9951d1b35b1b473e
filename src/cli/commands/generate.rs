//! Generate command implementation

use crate::cli::commands::open_generator;
use crate::cli::GenerateArgs;
use crate::config::ConfigOverrides;
use crate::render::split_document;
use anyhow::Result;
use bytesize::ByteSize;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Execute the generate command
pub fn execute(
    root: &Path,
    config: Option<&Path>,
    args: GenerateArgs,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let overrides = ConfigOverrides {
        project_name: args.name,
        output_file: args.output,
        ignore_file: args.ignore_file,
        max_output_characters: args.max_chars,
        no_split: args.no_split,
        exclude_files: args.exclude_files,
        exclude_folders: args.exclude_folders,
    };
    let generator = open_generator(root, config, overrides)?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_message("Scanning project...");
        progress
    };

    let scan = generator.select_with_progress(|progress| {
        spinner.set_message(format!(
            "Scanning project... {} directories, {} files selected",
            progress.dirs_visited, progress.files_selected
        ));
    })?;

    spinner.set_message(format!("Rendering {} files...", scan.files.len()));
    let document = generator.render(&scan.files);
    let config = generator.config();

    if args.dry_run {
        spinner.finish_and_clear();
        if quiet {
            return Ok(());
        }

        let total_chars = document.char_len();
        println!("{}", "Dry run: nothing written".bright_blue());
        println!("  • Files selected: {}", scan.stats.files_selected);
        println!("  • Document size: {} characters", total_chars);
        if total_chars > config.max_output_characters {
            if config.split_output {
                let parts = split_document(&document, config.max_output_characters);
                println!("  • Would split into {} parts", parts.len());
            } else {
                println!(
                    "  • Would truncate to {} characters",
                    config.max_output_characters
                );
            }
        }
        if verbose {
            for file in &scan.files {
                println!("    {} {}", "•".green(), file);
            }
        }
        return Ok(());
    }

    spinner.set_message("Writing output...");
    let report = generator.write(&document)?;
    spinner.finish_and_clear();

    if quiet {
        return Ok(());
    }

    println!(
        "{} Generated context for '{}'",
        "✓".green().bold(),
        config.project_name.bold()
    );
    println!(
        "  • Files embedded: {} ({} skipped, {} directories pruned)",
        scan.stats.files_selected, scan.stats.files_skipped, scan.stats.dirs_pruned
    );
    println!("  • Characters: {}", report.total_chars);
    if report.truncated {
        println!(
            "  {} Output truncated to {} characters (splitting disabled)",
            "!".yellow(),
            report.written_chars
        );
    }
    for file in &report.files {
        let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
        println!("  • Wrote {} ({})", file.display().to_string().cyan(), ByteSize::b(size));
    }

    if verbose {
        for (dir, decision) in &scan.pruned_dirs {
            println!("    {} {}/ ({})", "-".dimmed(), dir, decision);
        }
    }

    println!();
    println!("Review the issues and design decisions sections, then paste the document into a new conversation.");

    Ok(())
}

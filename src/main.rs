use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use gotag::config::{self, CliRequests, ConfigError, FileConfig};
use gotag::driver::{DriverError, FileDriver, FileReport, FileStatus, RunSummary};
use gotag::logging;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(name = "gotag")]
#[command(about = "Add or remove struct tags in Go source files", long_about = None)]
#[command(version)]
struct Cli {
    /// Go files, directories or glob patterns to rewrite
    files: Vec<String>,

    /// Tag to add as KEY:STYLE (styles: camel, snake, go, upper, lower)
    #[arg(short, long, value_name = "KEY:STYLE", value_delimiter = ',')]
    add: Vec<String>,

    /// Tag key to remove
    #[arg(short, long, value_name = "KEY", value_delimiter = ',')]
    remove: Vec<String>,

    /// Insert new tags after this many existing ones; negative replaces all
    #[arg(short, long, allow_negative_numbers = true)]
    index: Option<i64>,

    /// Config file (defaults to $GOTAG_CONFIG, then ./.gotag.toml)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Dry run - show what would be changed without modifying files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if cli.files.is_empty() {
        usage();
    }

    let file_config = load_file_config(cli.config.as_deref()).unwrap_or_else(|e| fail_config(e));

    let requests = CliRequests {
        add: cli.add,
        remove: cli.remove,
        index: cli.index,
    };
    let tag_config =
        config::build(file_config.as_ref(), &requests).unwrap_or_else(|e| fail_config(e));

    if tag_config.is_empty() {
        usage();
    }

    let driver = FileDriver::new(&tag_config).dry_run(cli.dry_run);
    let summary = match driver.run(&cli.files) {
        Ok(summary) => summary,
        Err(e @ DriverError::Pattern { .. }) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(4);
        }
        Err(e) => return Err(e.into()),
    };

    report(&summary, cli.dry_run, cli.diff);

    if !summary.is_success() {
        process::exit(1);
    }

    Ok(())
}

/// Load the config file, if one is configured or present.
fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
    let dir = env::current_dir().unwrap_or_else(|_| ".".into());
    match config::discover(explicit, &dir) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config file");
            config::load_from_path(&path).map(Some)
        }
        None => Ok(None),
    }
}

/// Report a configuration error and exit with its category's code.
fn fail_config(error: ConfigError) -> ! {
    eprintln!("{} {}", "error:".red().bold(), error);
    process::exit(error.exit_code());
}

/// Print help and exit successfully, as for an explicit `--help`.
fn usage() -> ! {
    let _ = Cli::command().print_help();
    process::exit(0);
}

/// Print per-file results, diffs and the summary.
fn report(summary: &RunSummary, dry_run: bool, show_diff: bool) {
    if dry_run {
        println!("{}", "[DRY RUN - no files were modified]".cyan());
    }

    for file in &summary.reports {
        print_report(file);
        if show_diff && file.is_changed() {
            display_diff(&file.path, &file.original, &file.rewritten);
        }
    }

    for failure in &summary.failures {
        eprintln!("{} {}", "✗".red(), failure);
    }

    println!();
    println!("{}", "Summary:".bold());
    let changed_label = if dry_run { "would change" } else { "changed" };
    println!(
        "  {} {}",
        format!("{}", summary.changed()).green(),
        changed_label
    );
    println!("  {} unchanged", format!("{}", summary.unchanged()).yellow());
    println!("  {} failed", format!("{}", summary.failures.len()).red());
}

/// One status line per file.
fn print_report(file: &FileReport) {
    let fields = file.stats.changed();
    let plural = if fields == 1 { "" } else { "s" };
    match file.status {
        FileStatus::Rewritten => println!(
            "{} {}: {} field{} updated",
            "✓".green(),
            file.path.display(),
            fields,
            plural
        ),
        FileStatus::WouldRewrite => println!(
            "{} {}: would update {} field{}",
            "✓".green(),
            file.path.display(),
            fields,
            plural
        ),
        FileStatus::Unchanged => {
            println!("{} {}: unchanged", "⊙".yellow(), file.path.display())
        }
    }
}

/// Show a unified diff between original and rewritten content.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (tagged)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => continue,
        };
        print!("{}", line);
    }
    println!();
}

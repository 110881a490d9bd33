use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use markup_patcher::{
    builtin_recipe, load_from_path, resolve_target, InsertionOutcome, PatchOutcome, Recipe,
    TextPatcher,
};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "markup-patcher")]
#[command(about = "Rename labels and insert markup blocks by literal anchor", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch the target file in place (default when no command is given)
    Apply {
        #[command(flatten)]
        target: TargetArgs,

        /// Dry run - show what would change without writing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Fail on missing or duplicated anchors instead of skipping
        #[arg(long)]
        strict: bool,
    },

    /// Report where each rename and insertion would land without writing
    Check {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Default)]
struct TargetArgs {
    /// File to patch (defaults to the recipe's target)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML recipe (defaults to the built-in average-stake recipe)
    #[arg(short, long)]
    recipe: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Apply {
            target,
            dry_run,
            diff,
            strict,
        }) => cmd_apply(target, dry_run, diff, strict),
        Some(Commands::Check { target }) => cmd_check(target),
        None => cmd_apply(TargetArgs::default(), false, false, false),
    }
}

/// Helper: Build the patcher from the recipe and target flags
fn build_patcher(args: TargetArgs) -> Result<TextPatcher> {
    let recipe: Recipe = match &args.recipe {
        Some(path) => load_from_path(path)?,
        None => builtin_recipe(),
    };
    let target = resolve_target(args.file, &recipe);
    let patcher = TextPatcher::new(target, recipe);
    tracing::debug!(
        path = %patcher.target().display(),
        recipe = %patcher.recipe().meta.name,
        "resolved target"
    );
    Ok(patcher)
}

/// Helper: Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_apply(args: TargetArgs, dry_run: bool, show_diff: bool, strict: bool) -> Result<()> {
    let patcher = build_patcher(args)?.strict(strict);

    let outcome = if dry_run {
        patcher.plan()?
    } else {
        patcher.run()?
    };

    if show_diff && outcome.original != outcome.patched.as_str() {
        display_diff(&outcome.target, &outcome.original, outcome.patched.as_str());
    }

    if dry_run {
        println!("{}", "[DRY RUN - target was not written]".cyan());
        report_outcome(&outcome);
    } else {
        println!("{}", outcome.confirmation());
    }

    Ok(())
}

fn cmd_check(args: TargetArgs) -> Result<()> {
    let patcher = build_patcher(args)?;
    let outcome = patcher.plan()?;

    println!("{}", "Patch Check Report".bold());
    println!("Recipe: {}", patcher.recipe().meta.name);
    println!("Target: {}", patcher.target().display());
    println!();

    let problems = report_outcome(&outcome);

    if problems > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Print one line per rename and insertion; returns how many need attention.
fn report_outcome(outcome: &PatchOutcome) -> usize {
    let mut problems = 0;

    for rename in &outcome.report.renames {
        if rename.replaced > 0 {
            println!(
                "{} rename {:?}: {} occurrence(s)",
                "✓".green(),
                rename.search,
                rename.replaced
            );
        } else {
            println!("{} rename {:?}: not present", "⊘".cyan(), rename.search);
        }
    }

    for insertion in &outcome.report.insertions {
        match insertion {
            InsertionOutcome::Inserted {
                anchor_occurrences, ..
            } if *anchor_occurrences > 1 => {
                println!("{} {}", "⊙".yellow(), insertion);
                problems += 1;
            }
            InsertionOutcome::Inserted { .. } => println!("{} {}", "✓".green(), insertion),
            InsertionOutcome::AnchorMissing { .. }
            | InsertionOutcome::CloseMarkerMissing { .. } => {
                println!("{} {}", "✗".red(), insertion);
                problems += 1;
            }
        }
    }

    problems
}

//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::core::file_reader::{FileReadConfig, DEFAULT_MAX_FILE_SIZE};
use crate::core::model::Summary;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::rename::pairs::parse_pairs;
use crate::rename::plan::RenameOptions;

/// rebrand - replace a project template's placeholder name throughout a tree.
#[derive(Parser, Debug)]
#[command(name = "rebrand")]
#[command(
    author,
    version,
    about,
    long_about = r#"rebrand replaces the placeholder name of a project template with your own.

Every occurrence of each search token is replaced inside file contents, every
directory named exactly like a search token is renamed, and the git staging
index is cleared so the tree shows up as a fresh set of changes.

Default token pairs (applied in this order):
- demo-bd -> change-me
- demo_bd -> change_me

Running without a command is the same as `rebrand apply` on the current
directory. Version-control metadata (.git, .hg, .svn) is never rewritten.

Examples:
    rebrand
    rebrand plan --format md
    rebrand apply --pair demo-bd=acme-api --pair demo_bd=acme_api
    rebrand check
"#
)]
pub struct Cli {
    /// Root directory of the project tree.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory of the project tree (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root. The staging index is only\n\
reset when ROOT itself is a git repository root."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for the ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw (one affected path per line)"
    )]
    pub format: String,

    /// Disable colored output.
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output on the stderr summary line. Useful when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress the stderr summary line and all log output below error level.\n\
Results are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log every planned and applied change to stderr. RUST_LOG, when set,\n\
takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Tree selection and token options shared by every command
#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Token pair to replace, as OLD=NEW (repeatable).
    #[arg(
        long = "pair",
        value_name = "OLD=NEW",
        long_help = "Token pair to replace, as OLD=NEW. Repeat to give several pairs;\n\
they are applied in the order given.\n\n\
When omitted, the template defaults are used:\n\
  --pair demo-bd=change-me --pair demo_bd=change_me\n\n\
Tokens must be non-empty and must not contain path separators, since they are\n\
also used as directory names."
    )]
    pub pairs: Vec<String>,

    /// Honor .gitignore/.ignore files.
    #[arg(
        long,
        long_help = "Honor .gitignore, .ignore and global git excludes when selecting files\n\
and directories. By default every file in the tree is processed."
    )]
    pub respect_ignore: bool,

    /// How to treat binary files (skip/rewrite).
    #[arg(
        long,
        default_value = "skip",
        value_parser = ["skip", "rewrite"],
        value_name = "MODE",
        long_help = "How to treat files whose first 8 KiB contain a NUL byte.\n\n\
- skip (default): leave them untouched and report them\n\
- rewrite: substitute tokens in their bytes like any other file"
    )]
    pub binary: String,

    /// Skip files larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE, value_name = "BYTES")]
    pub max_file_size: u64,
}

impl Default for SelectArgs {
    fn default() -> Self {
        Self {
            pairs: Vec::new(),
            respect_ignore: false,
            binary: "skip".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl SelectArgs {
    /// Build rename options; fails on malformed `--pair` values
    pub fn to_options(&self, reset_index: bool) -> Result<RenameOptions> {
        Ok(RenameOptions {
            pairs: parse_pairs(&self.pairs)?,
            read: FileReadConfig {
                max_file_size: self.max_file_size,
                binary_strategy: self.binary.parse().unwrap_or_default(),
            },
            respect_ignore: self.respect_ignore,
            reset_index,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite contents, rename directories and reset the staging index.
    #[command(
        long_about = "Replace every search token in file contents, rename every directory\n\
named exactly like a search token (deepest first), then delete the git staging\n\
index.\n\n\
Before anything is written, rename destinations are checked; if one already exists\n\
the run aborts without modifying the tree. Any later failure aborts immediately\n\
with a non-zero exit; re-running completes an interrupted run.\n\n\
Examples:\n\
  rebrand apply\n\
  rebrand apply --pair demo_bd=acme --keep-index\n"
    )]
    Apply {
        #[command(flatten)]
        select: SelectArgs,

        /// Do not delete the git staging index.
        #[arg(long)]
        keep_index: bool,
    },

    /// Show what apply would change, without touching anything.
    #[command(
        long_about = "Compute every edit, directory rename and index action that apply would\n\
perform and print them with applied=false. The tree is not modified.\n\n\
Example:\n\
  rebrand plan --format md\n"
    )]
    Plan {
        #[command(flatten)]
        select: SelectArgs,

        /// Plan without the staging index reset.
        #[arg(long)]
        keep_index: bool,
    },

    /// Report remaining search tokens; exit 1 when any remain.
    #[command(
        long_about = "Walk the tree with the same selection rules as apply and report every\n\
line still containing a search token and every directory still named like one.\n\n\
Exits with status 1 when anything is found, so it can gate CI.\n\n\
Example:\n\
  rebrand check --format md\n"
    )]
    Check {
        #[command(flatten)]
        select: SelectArgs,
    },
}

/// Which command produced a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Apply,
    Plan,
    Check,
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

/// One-line human summary for stderr
fn summary_line(action: Action, summary: &Summary) -> String {
    match action {
        Action::Check => format!("{} no search tokens remain", "✓".green()),
        Action::Apply | Action::Plan => {
            let verb = if action == Action::Apply {
                ("rewrote", "renamed")
            } else {
                ("would rewrite", "would rename")
            };
            let mut line = format!(
                "{} {} {} ({}), {} {}",
                if action == Action::Apply { "✓".green() } else { "•".cyan() },
                verb.0,
                plural(summary.edits, "file", "files"),
                plural(summary.replacements, "replacement", "replacements"),
                verb.1,
                plural(summary.renames, "directory", "directories"),
            );
            if summary.skipped > 0 {
                line.push_str(&format!(
                    ", {}",
                    format!("skipped {}", plural(summary.skipped, "file", "files")).yellow()
                ));
            }
            if summary.errors > 0 {
                line.push_str(&format!(
                    ", {}",
                    plural(summary.errors, "conflict", "conflicts").red()
                ));
            }
            line
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("cannot access root directory {}", cli.root.display()))?;

    let command = cli.command.unwrap_or(Commands::Apply {
        select: SelectArgs::default(),
        keep_index: false,
    });

    let (action, summary) = match command {
        Commands::Apply { select, keep_index } => {
            let options = select.to_options(!keep_index)?;
            (
                Action::Apply,
                crate::rename::apply::run_apply(&root, &options, render_config)?,
            )
        }
        Commands::Plan { select, keep_index } => {
            let options = select.to_options(!keep_index)?;
            (
                Action::Plan,
                crate::rename::plan::run_plan(&root, &options, render_config)?,
            )
        }
        Commands::Check { select } => {
            let options = select.to_options(false)?;
            (
                Action::Check,
                crate::rename::check::run_check(&root, &options, render_config)?,
            )
        }
    };

    if !cli.quiet {
        eprintln!("{}", summary_line(action, &summary));
    }

    Ok(())
}

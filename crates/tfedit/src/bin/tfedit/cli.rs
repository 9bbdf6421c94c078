//! tfedit cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; tfedit ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a built-in rule set to a configuration file
    ///
    /// Reads from stdin and prints to stdout unless a file is given
    Filter(FilterCommand),

    /// Generate a tfmigrate migration file
    Migration(MigrationCommand),

    /// Print the references of each top-level block
    #[command(alias = "refs")]
    References(ReferencesCommand),
}

#[derive(Parser, Debug)]
pub struct FilterCommand {
    /// Rule set to apply, available: awsv4upgrade
    pub filter_type: String,

    #[clap(flatten)]
    pub input: InputArgs,

    /// Update the file in place instead of printing it
    ///
    /// The file is only written when all rules succeeded
    #[clap(short = 'u', long = "update")]
    pub update: bool,
}

#[derive(Parser, Debug)]
pub struct MigrationCommand {
    #[command(subcommand)]
    pub command: MigrationSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum MigrationSubCommand {
    /// Import every resource `terraform plan` would create
    ///
    /// Expects the output of `terraform show -json <planfile>`
    Fromplan(FromplanCommand),
}

#[derive(Parser, Debug)]
pub struct FromplanCommand {
    /// Plan in JSON, `-` reads stdin
    #[clap(short = 'f', long = "file", default_value = "-")]
    pub file: PathBuf,

    /// Migration file to write, `-` prints to stdout
    ///
    /// Nothing is written when there is nothing to import
    #[clap(short = 'o', long = "out", default_value = "-")]
    pub out: PathBuf,

    /// Working directory set in the migration
    #[clap(short = 'd', long = "dir", default_value = "")]
    pub dir: String,
}

#[derive(Parser, Debug)]
pub struct ReferencesCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Configuration file, `-` reads stdin
    #[clap(short = 'f', long = "file", default_value = "-")]
    pub file: PathBuf,
}

impl InputArgs {
    pub fn is_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

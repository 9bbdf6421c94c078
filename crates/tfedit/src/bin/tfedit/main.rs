mod cli;

use anyhow::Context;
use std::path::Path;
use tfedit::document::Document;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TFEDIT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Filter(filter_cli) => filter(filter_cli),
        cli::Command::Migration(migration_cli) => migration(migration_cli),
        cli::Command::References(references_cli) => references(references_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn filter(cli: cli::FilterCommand) -> anyhow::Result<()> {
    anyhow::ensure!(
        !(cli.update && cli.input.is_stdin()),
        "--update requires a file, not stdin"
    );

    let mut document = load(&cli.input)?;
    let filter = tfedit::rules::filter_by_type(&cli.filter_type)?;
    filter
        .filter(&mut document)
        .with_context(|| format!("Failed to apply {}", cli.filter_type))?;

    let output = document.to_string();
    if cli.update {
        std::fs::write(&cli.input.file, output)
            .with_context(|| format!("Failed to write {}", cli.input.file.display()))?;
    } else {
        print!("{output}");
    }

    Ok(())
}

pub fn migration(cli: cli::MigrationCommand) -> anyhow::Result<()> {
    match cli.command {
        cli::MigrationSubCommand::Fromplan(fromplan_cli) => fromplan(fromplan_cli),
    }
}

fn fromplan(cli: cli::FromplanCommand) -> anyhow::Result<()> {
    let plan = read(&cli.file)?;
    let migration = tfedit::migration::generate_from_plan(&plan, &cli.dir)?;

    if migration.is_empty() {
        tracing::info!("Nothing to import, no migration written");
        return Ok(());
    }

    if cli.out.as_os_str() == "-" {
        print!("{migration}");
    } else {
        std::fs::write(&cli.out, migration)
            .with_context(|| format!("Failed to write {}", cli.out.display()))?;
    }

    Ok(())
}

pub fn references(cli: cli::ReferencesCommand) -> anyhow::Result<()> {
    let document = load(&cli.input)?;
    let references = document.references();

    match cli.output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &references)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), &references)?;
            println!();
        }
    };

    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<Document> {
    let source = read(&input.file)?;
    let document = Document::parse(&source)
        .with_context(|| format!("Failed to load {}", input.file.display()))?;
    Ok(document)
}

/// Reads `path`, or stdin for `-`
fn read(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read stdin");
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

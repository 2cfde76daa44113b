use clap::{Parser, Subcommand};
use longan::ooxml::extract::dump_media;
use longan::ooxml::{Document, ExportOptions, LoadOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "longan", version, about = "Dissect Office Open XML packages")]
struct Cli {
    /// Skip the archive CRC check
    #[arg(long, global = true)]
    no_verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show package kind, main part, core properties and feature counts
    Info {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Export parts and relationships as JSON
    Json {
        /// Include base64 part contents
        #[arg(long)]
        streams: bool,
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Write image, audio, video and font parts to <OUT>/<file stem>/parts
    Media {
        #[arg(short, long)]
        out: PathBuf,
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "longan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = LoadOptions::new().with_verify_integrity(!cli.no_verify);

    let failures = match &cli.command {
        Commands::Info { files } => run(files, &options, print_info),
        Commands::Json { files, streams } => {
            let export = ExportOptions::new().with_streams(*streams);
            run(files, &options, |doc| print_json(doc, &export))
        },
        Commands::Media { files, out } => run(files, &options, |doc| write_media(doc, out)),
    };

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Analyze every file independently; returns how many could not be analyzed.
fn run<F>(files: &[PathBuf], options: &LoadOptions, action: F) -> usize
where
    F: Fn(&Document) -> longan::Result<()>,
{
    let mut failures = 0usize;
    for file in files {
        let result = Document::open_with(file, options)
            .map_err(longan::Error::from)
            .and_then(|doc| action(&doc));
        if let Err(e) = result {
            tracing::error!(file = %file.display(), error = %e, "could not analyze file");
            failures += 1;
        }
    }

    if failures > 0 {
        tracing::warn!(failures, total = files.len(), "some files failed");
    }
    failures
}

fn print_info(doc: &Document) -> longan::Result<()> {
    println!("{}", doc.path().display());
    println!("  kind:          {}", doc.kind());
    println!("  macro-enabled: {}", doc.is_macro_enabled());
    println!("  template:      {}", doc.is_template());
    println!("  parts:         {}", doc.parts().len());
    println!("  relationships: {}", doc.relationships().len());

    match doc.main_part() {
        Ok(part) => println!("  main part:     {} ({})", part.name(), part.content_type()),
        Err(e) => println!("  main part:     <{}>", e),
    }

    let props = doc.core_properties();
    if props.is_empty() {
        println!("  core properties: none");
    } else {
        println!("  core properties ({}):", props.name);
        for (label, value) in [
            ("title", &props.title),
            ("subject", &props.subject),
            ("creator", &props.creator),
            ("keywords", &props.keywords),
            ("last modified by", &props.last_modified_by),
            ("created", &props.created),
            ("modified", &props.modified),
            ("revision", &props.revision),
        ] {
            if !value.is_empty() {
                println!("    {}: {}", label, value);
            }
        }
    }

    println!("  features:");
    for (feature, parts) in doc.features().iter() {
        if !parts.is_empty() {
            println!("    {}: {}", feature, parts.len());
        }
    }
    Ok(())
}

fn print_json(doc: &Document, options: &ExportOptions) -> longan::Result<()> {
    println!("{}", doc.to_json(options)?);
    Ok(())
}

fn write_media(doc: &Document, out: &Path) -> longan::Result<()> {
    let stem = doc
        .path()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let dir = out.join(stem).join("parts");

    let written = dump_media(doc, &dir)?;
    tracing::info!(
        file = %doc.path().display(),
        count = written.len(),
        dir = %dir.display(),
        "dumped media parts"
    );
    Ok(())
}

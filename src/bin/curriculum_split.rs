//! curriculum_split - split curriculum decree PDFs by subject
//!
//! Usage:
//!   curriculum_split split <FOLDER>
//!   curriculum_split split <PDF> <TOC> --output-dir out/
//!   curriculum_split validate <TOC>
//!   curriculum_split schema
//!
//! Set `RUST_LOG=debug` for per-boundary detail.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;

use curriculum_split::segment::SourceIdentity;
use curriculum_split::toc::{parse_candidate, toc_json_schema, JsonFileSource};
use curriculum_split::{discover_inputs, InputPair, Result, SplitConfig, Splitter};

#[derive(Parser)]
#[command(name = "curriculum_split", version, about = "Split curriculum PDFs into per-subject files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TOC and split its PDF
    Split {
        /// Input folder holding one PDF and one TOC JSON (outputs of earlier runs
        /// are ignored), or the PDF itself
        path: PathBuf,
        /// TOC JSON (required when PATH is a PDF)
        toc: Option<PathBuf>,
        /// Directory for the output files (default: next to the PDF)
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,
        /// Region used in output names (default: taken from the folder layout)
        #[arg(long)]
        region: Option<String>,
        /// Educational stage used in output names (default: taken from the folder layout)
        #[arg(long)]
        stage: Option<String>,
        /// Also extract design-guidance and key-competencies sections
        #[arg(long)]
        include_sections: bool,
        /// Save the validated TOC as {stem}_toc.validated.json
        #[arg(long)]
        audit_toc: bool,
        /// Save a rejected TOC as {stem}_toc_error.json
        #[arg(long)]
        dump_invalid: bool,
        /// Print the split report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a TOC without touching any PDF
    Validate {
        /// TOC JSON (surrounding text is tolerated)
        toc: PathBuf,
    },
    /// Print the JSON Schema a TOC must follow
    Schema,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Split {
            path,
            toc,
            output_dir,
            region,
            stage,
            include_sections,
            audit_toc,
            dump_invalid,
            json,
        } => {
            let (inputs, identity) = resolve_inputs(&path, toc)?;
            let identity = SourceIdentity::new(
                region.unwrap_or(identity.region),
                stage.unwrap_or(identity.stage),
            );

            let mut config = SplitConfig::new()
                .with_sections(include_sections)
                .with_audit_toc(audit_toc)
                .with_invalid_dump(dump_invalid);
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }

            let splitter = Splitter::new(config);
            let source = JsonFileSource::new(&inputs.toc);
            let report = splitter.run(&source, &inputs.pdf, &identity)?;

            for notice in report.plan.warnings() {
                eprintln!("warning: {notice}");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for output in &report.outputs {
                    println!("{} ({} pages)", output.path.display(), output.pages);
                }
            }
            Ok(())
        },
        Commands::Validate { toc } => {
            let raw = fs::read_to_string(&toc)?;
            let toc = parse_candidate(&raw)?;
            println!(
                "OK: {} subjects, offset {}",
                toc.subjects().len(),
                toc.offset().get()
            );
            let missing = toc.missing_subjects();
            if !missing.is_empty() {
                eprintln!("warning: listed subjects without page ranges: {}", missing.join(", "));
            }
            Ok(())
        },
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&toc_json_schema()?)?);
            Ok(())
        },
    }
}

fn resolve_inputs(path: &Path, toc: Option<PathBuf>) -> Result<(InputPair, SourceIdentity)> {
    match toc {
        Some(toc) => {
            let pair = InputPair::from_paths(path, toc)?;
            let identity = SourceIdentity::from_pdf_path(&pair.pdf);
            Ok((pair, identity))
        },
        None => {
            let pair = discover_inputs(path)?;
            let folder = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            Ok((pair, SourceIdentity::from_folder(&folder)))
        },
    }
}

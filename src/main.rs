// EXAM EXTRACTOR - PDF question booklet to sectioned JSON plus a quality report
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use exam_extractor::{logging, ContentExtractor, ContentValidator, ExamConfig, ExtractError, Extraction, Status};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Exam booklet to extract
    pdf_file: PathBuf,
    /// Directory for images, JSON and text dumps
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    expected_questions: Option<usize>,
    #[arg(long)]
    expected_images: Option<usize>,
    /// Also write each page's raw text
    #[arg(long)]
    dump_text: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", e.render());
            return ExitCode::FAILURE;
        }
    };

    logging::init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            println!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<ExamConfig> {
    let mut config = ExamConfig::load(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(n) = args.expected_questions {
        config.expected_questions = n;
    }
    if let Some(n) = args.expected_images {
        config.expected_images = n;
    }
    config.dump_text |= args.dump_text;
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let pdf_path = args.pdf_file.as_path();
    println!("📄 Starting PDF analysis for: {}", pdf_path.display());

    if !pdf_path.is_file() {
        return Err(ExtractError::NotFound(pdf_path.to_path_buf()).into());
    }

    let config = load_config(args)?;
    let extractor = ContentExtractor::new(config);
    extractor
        .setup_directories()
        .context("creating output directories")?;
    let config = extractor.config();

    println!("🔍 Extracting content...");
    let extraction = extractor.extract_all_content(pdf_path)?;
    if let Extraction::Empty { diagnostic, .. } = &extraction {
        println!("⚠️  Could not read PDF, continuing with empty content: {}", diagnostic);
    }
    let content = extraction.into_content();

    let content_path = config.content_path();
    exam_extractor::write_json(&content_path, &content)?;
    println!("💾 Extracted content saved to {}", content_path.display());

    println!("✅ Validating extraction quality...");
    let report = ContentValidator::from_config(config).validate_extraction(&content, &config.images_dir())?;
    let report_path = config.report_path();
    exam_extractor::write_json(&report_path, &report)?;
    println!("💾 Validation report saved to {}", report_path.display());

    println!("\n--- Processing complete for {} ---", display_name(pdf_path));
    println!("Overall Score: {:.1}%", report.scores.overall_score);
    println!("Status: {}", report.status);
    if report.status == Status::Fail {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!("  - {}", rec);
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod gpa;
mod grades;
mod loader;
mod models;
mod report;
mod retake;

use crate::gpa::GpaEngine;
use crate::grades::{Grade, GradePointTable};
use crate::retake::{RetakeAnalyzer, RetakePolicy};

#[derive(Parser)]
#[command(name = "gpa-retake-advisor")]
#[command(about = "GPA calculator with course retake recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AnalysisArgs {
    /// Course file with `code,credits,grade` lines
    #[arg(long)]
    csv: PathBuf,
    /// Grade assumed for every retaken course
    #[arg(long, env = "GPA_RETAKE_GRADE", default_value = "D")]
    retake_grade: Grade,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the GPA only
    Gpa {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print current GPA and retake recommendations
    Analyze {
        #[command(flatten)]
        args: AnalysisArgs,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        args: AnalysisArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn analyzer(retake_grade: Grade) -> RetakeAnalyzer {
    RetakeAnalyzer::new(
        GpaEngine::new(GradePointTable::standard()),
        RetakePolicy {
            assumed_retake_grade: retake_grade,
        },
    )
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Gpa { csv } => {
            let courses = loader::load_courses(&csv)?;
            let gpa = GpaEngine::default().compute_gpa(&courses);
            println!("Your CURRENT GPA is: {gpa:.3}");
        }
        Commands::Analyze { args, json } => {
            let courses = loader::load_courses(&args.csv)?;
            let analyzer = analyzer(args.retake_grade);
            let result = analyzer.analyze(&courses);
            let projections = analyzer.projections(&courses, &result);
            debug!(
                must_retake = result.must_retake.len(),
                should_retake = result.should_retake.len(),
                "Analysis complete"
            );

            if json {
                println!("{}", report::render_json(&result, &projections)?);
            } else {
                print!("{}", report::render_summary(&result, &projections));
            }
        }
        Commands::Report { args, out } => {
            let courses = loader::load_courses(&args.csv)?;
            let analyzer = analyzer(args.retake_grade);
            let result = analyzer.analyze(&courses);
            let projections = analyzer.projections(&courses, &result);
            let report = report::build_report(
                &args.csv.display().to_string(),
                chrono::Local::now().date_naive(),
                &result,
                &projections,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "Report written");
        }
    }

    Ok(())
}

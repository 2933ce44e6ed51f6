use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use resume_pdf::layout::OverflowPolicy;
use resume_pdf::{FontChoice, RenderOptions};

/// Render a résumé content record (JSON) to a one-page, two-column PDF.
#[derive(Parser, Debug)]
#[command(name = "resume-pdf", version, about)]
struct Cli {
    /// Content record to render
    input: PathBuf,

    /// Output PDF [default: INPUT with a .pdf extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Font family candidates, first match wins
    #[arg(long, default_value = resume_pdf::fonts::DEFAULT_FAMILIES)]
    font: String,

    /// Use the standard Helvetica faces instead of system fonts
    #[arg(long, conflicts_with = "font")]
    builtin_fonts: bool,

    /// Warn instead of failing when a column runs past the bottom margin
    #[arg(long)]
    allow_overflow: bool,

    /// Add the recommendations section to the left column
    #[arg(long)]
    recommendations: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            fonts: if self.builtin_fonts {
                FontChoice::Builtin
            } else {
                FontChoice::System(self.font.clone())
            },
            overflow: if self.allow_overflow {
                OverflowPolicy::Warn
            } else {
                OverflowPolicy::Fail
            },
            include_recommendations: self.recommendations,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    match resume_pdf::convert_json_to_pdf(&cli.input, &output, &cli.options()) {
        Ok(()) => {
            log::info!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

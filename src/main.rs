mod output;
mod parser;
mod record;
mod settings;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info};

use parser::grammar::Variant;
use record::LinkShape;
use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "extract-examples",
    about = "Extract prompt examples from a README into JSON"
)]
struct Cli {
    /// README to read (default: README.md or README_en.md under --root)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// JSON file to write (default: examples.json or examples_en.json under --root)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// README convention (default: inferred from the input file name)
    #[arg(short, long, value_enum)]
    language: Option<Variant>,
    /// Shape of `original_link` in the output
    #[arg(long, value_enum)]
    link_shape: Option<LinkShape>,
    /// Directory the default file names are resolved against
    #[arg(long)]
    root: Option<PathBuf>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            input: cli.input,
            output: cli.output,
            language: cli.language,
            link_shape: cli.link_shape,
            root: cli.root,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::load(Cli::parse().into())?;
    debug!(?settings, "resolved settings");
    run(&settings)
}

fn run(settings: &Settings) -> anyhow::Result<()> {
    if !settings.input.exists() {
        bail!("input file not found: {}", settings.input.display());
    }
    info!(variant = %settings.variant, input = %settings.input.display(), "extracting examples");
    let markdown = fs::read_to_string(&settings.input)
        .with_context(|| format!("reading {}", settings.input.display()))?;

    let extraction = parser::extract(&markdown, settings.variant);
    println!("{}", extracted_message(settings.variant, extraction.records.len()));
    if !extraction.skipped.is_empty() {
        info!(skipped = extraction.skipped.len(), "some example headings were not extracted");
    }

    output::write_json(&settings.output, &extraction.records, settings.link_shape)?;
    println!(
        "{}",
        saved_message(settings.variant, &settings.output.display().to_string())
    );
    Ok(())
}

fn extracted_message(variant: Variant, count: usize) -> String {
    match variant {
        Variant::Cn => format!("从中文README中提取到 {} 个案例", count),
        Variant::En => format!("Extracted {} examples from English README", count),
    }
}

fn saved_message(variant: Variant, path: &str) -> String {
    match variant {
        Variant::Cn => format!("案例数据已保存至 {}", path),
        Variant::En => format!("Examples saved to {}", path),
    }
}

//! external-text CLI - Main entry point

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use external_text::RenderMode;

mod render;

#[derive(Parser)]
#[command(name = "external-text")]
#[command(version)]
#[command(about = "Render texts from an external text bundle", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the text at PATH from a JSON or YAML bundle
    Render {
        /// Bundle file (.json, .yaml or .yml)
        bundle: String,

        /// Path of the text in the bundle (e.g. `intro.steps[0]`)
        path: String,

        /// How to render each text: raw, string or markdown
        #[arg(long = "as", default_value = "markdown")]
        mode: RenderMode,

        /// Data variable (KEY=VALUE)
        #[arg(short = 'D', long = "data")]
        data: Vec<String>,

        /// JSON or YAML file with data variables
        #[arg(long)]
        data_file: Option<String>,

        /// Give up after this many evaluation passes
        #[arg(long)]
        max_passes: Option<usize>,

        /// Drop raw HTML from Markdown output
        #[arg(long)]
        no_raw_html: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = match cli.verbose {
        0 => "external_text=warn",
        1 => "external_text=debug",
        _ => "external_text=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            bundle,
            path,
            mode,
            data,
            data_file,
            max_passes,
            no_raw_html,
        } => render::execute(render::RenderArgs {
            bundle,
            path,
            mode,
            data,
            data_file,
            max_passes,
            raw_html: !no_raw_html,
        }),
    }
}

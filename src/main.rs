use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcribai::cli::{Cli, Commands};
use transcribai::config::Config;
use transcribai::summarize::{GroqSummarizer, Summarizer};
use transcribai::transcript::{Acquisition, TranscriptPipeline};
use transcribai::{output, utils};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcribai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Check for the fallback tooling (non-fatal: the primary path works without it)
    let missing_deps = utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - the primary transcript path does not need them)");
    }

    let config = Config::load().await?;

    match cli.command {
        Commands::Transcript {
            url,
            output,
            format,
        } => {
            let pipeline = TranscriptPipeline::new(&config);
            let acquisition = acquire_with_progress(&pipeline, &url, cli.quiet).await?;

            let content = output::format_transcript(&acquisition, &format)?;
            match output {
                Some(path) => {
                    output::save_to_file(&content, &path).await?;
                    println!("Transcript saved to: {}", path.display());
                }
                None => output::print_to_console(&content),
            }
        }
        Commands::Summarize {
            url,
            output,
            format,
        } => {
            let summarizer = GroqSummarizer::from_env(config.summarizer.clone())?;

            let pipeline = TranscriptPipeline::new(&config);
            let acquisition = acquire_with_progress(&pipeline, &url, cli.quiet).await?;

            let progress = spinner("Generating excerpts...", cli.quiet);
            let excerpts = summarizer.summarize(&acquisition.transcript).await;
            progress.finish_and_clear();
            let excerpts = excerpts?;

            let content = output::format_excerpts(&excerpts, &format)?;
            match output {
                Some(path) => {
                    output::save_to_file(&content, &path).await?;
                    println!("Excerpts saved to: {}", path.display());
                }
                None => output::print_to_console(&content),
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file manually to change settings:");
                config.display();
            }
        }
    }

    Ok(())
}

async fn acquire_with_progress(
    pipeline: &TranscriptPipeline,
    url: &str,
    quiet: bool,
) -> Result<Acquisition> {
    let progress = spinner("Fetching transcript...", quiet);
    let result = pipeline.acquire(url).await;
    progress.finish_and_clear();

    let acquisition = result.map_err(|error| {
        if let Some(diagnostic) = error.diagnostic() {
            tracing::debug!("Provider diagnostic: {}", diagnostic);
        }
        error
    })?;

    tracing::info!(
        "Acquired {} characters of transcript for {}",
        acquisition.transcript.len(),
        acquisition.video_id
    );
    Ok(acquisition)
}

fn spinner(message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    progress.set_message(message);
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress
}

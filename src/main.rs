use anyhow::Result;
use clap::{Parser, Subcommand};
use image_studio::app::{App, EditInput, ImageOutcome, ImageOutput};
use image_studio::models::AspectRatio;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-studio")]
#[command(about = "Edit and generate images and videos through OpenRouter")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Edit an image, optionally restricted to a masked region.
    Edit {
        #[arg(long)]
        image: PathBuf,
        /// PNG mask; white marks the area to change.
        #[arg(long)]
        mask: Option<PathBuf>,
        /// Additional reference image.
        #[arg(long)]
        reference: Option<PathBuf>,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "output/edited")]
        output: PathBuf,
    },
    /// Generate an image from a prompt.
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "output/generated")]
        output: PathBuf,
    },
    /// Generate a video, optionally from a starting image.
    Video {
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "16:9", value_parser = parse_aspect_ratio_arg)]
        aspect_ratio: AspectRatio,
    },
}

fn parse_aspect_ratio_arg(input: &str) -> std::result::Result<AspectRatio, String> {
    input.parse()
}

fn report(outcome: ImageOutcome) {
    match outcome.output {
        ImageOutput::Saved(path) => info!("Image saved to {}", path.display()),
        ImageOutput::Remote(url) => info!("Image available at {}", url),
    }
    if let Some(text) = outcome.text {
        info!("Model said: {}", text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Edit {
            image,
            mask,
            reference,
            prompt,
            output,
        } => {
            let input = EditInput {
                image,
                mask,
                reference,
                prompt,
            };
            app.edit(&input, &output).await.map(report)
        }
        Command::Generate { prompt, output } => app.generate(&prompt, &output).await.map(report),
        Command::Video {
            image,
            prompt,
            aspect_ratio,
        } => app
            .video(image.as_deref(), &prompt, aspect_ratio)
            .await
            .map(|url| info!("Video available at {}", url)),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use map_prompt_client::models::ClientConfig;
use map_prompt_client::PromptClient;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "map-prompt")]
#[command(about = "Ask a hosted AI provider about places on the map")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the predictive analytics assistant a question.
    Chat {
        prompt: String,
        /// Fail on errors instead of printing an empty answer.
        #[arg(long)]
        strict: bool,
    },
    /// Generate a picture of a location.
    Image {
        location: String,
        /// Download the image to this path instead of printing its URL.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "map_prompt_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let client = PromptClient::new(ClientConfig::from_env()?)?;

    match args.command {
        Command::Chat { prompt, strict } => {
            let answer = if strict {
                client.chat(&prompt).await?
            } else {
                client.get_chat_response(&prompt).await
            };
            if answer.is_empty() {
                warn!("No answer received");
            }
            println!("{}", answer);
        }
        Command::Image { location, output } => {
            let image = client.get_image(&location).await?;
            match output {
                Some(path) => image.save(&path).await?,
                None => match image.source_uri() {
                    Some(url) => println!("{}", url),
                    None => bail!("Provider returned inline image data; pass --output to save it"),
                },
            }
            info!("Image for {} ready", location);
        }
    }

    Ok(())
}

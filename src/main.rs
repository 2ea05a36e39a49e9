//! parley binary entry point.

use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use parley::agent::{create_react_agent, CALENDAR_AGENT_PROMPT};
use parley::cli::{ChatArgs, Cli, Commands, SendArgs, ServeArgs};
use parley::config::ParleyConfig;
use parley::error::{ParleyError, Result};
use parley::models::GoogleModel;
use parley::relay::{ImageInput, Relay};
use parley::types::{GenerationSettings, ImageContent};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    parley::cli::logging::init(cli.verbose, cli.json_logs);

    let result = match ParleyConfig::from_env() {
        Ok(config) => match cli.command {
            Commands::Serve(args) => handle_serve(config, args).await,
            Commands::Send(args) => handle_send(&config, args).await,
            Commands::Chat(args) => handle_chat(&config, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_serve(mut config: ParleyConfig, args: ServeArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.no_signature_check {
        config.validate_signature = false;
    }
    parley::server::serve(&config).await
}

async fn handle_send(config: &ParleyConfig, args: SendArgs) -> Result<()> {
    let relay = Relay::new(config)?;
    let images: Vec<ImageInput> = args.images.into_iter().map(ImageInput::from_url).collect();
    let reply = relay.invoke(&args.id, &args.message, &images).await?;
    println!("{reply}");
    Ok(())
}

async fn handle_chat(config: &ParleyConfig, args: ChatArgs) -> Result<()> {
    let model: GoogleModel = args.model.parse().unwrap_or(GoogleModel::Custom(args.model));
    let provider = parley::provider::create_google_provider(model, config)?;

    let prompt = match args.system {
        Some(system) => system,
        None => {
            let today = chrono::Local::now().format("%Y-%m-%d").to_string();
            CALENDAR_AGENT_PROMPT.render(&HashMap::from([("today", today)]))
        }
    };

    let images = args
        .images
        .iter()
        .map(|url| {
            ImageContent::from_data_url(url).ok_or_else(|| {
                ParleyError::InvalidArgument(format!("--image must be a base64 data URL: {url}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let settings = GenerationSettings {
        temperature: args.temperature,
        ..Default::default()
    };

    let agent = create_react_agent(
        Arc::new(provider),
        parley::agent::react::DEFAULT_AGENT_NAME,
        Some(prompt),
        parley::tools::builtin::all_tools(),
    )
    .with_settings(settings);

    let reply = if images.is_empty() {
        agent.reply(args.prompt).await?
    } else {
        agent.reply_with_images(args.prompt, images).await?
    };
    println!("{reply}");
    Ok(())
}

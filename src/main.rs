//! sereno: command-line front end for the Sereno assistive client.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sereno::api::{SensorCheck, SerenoClient};
use sereno::chat::ChatSession;
use sereno::clipboard::SystemClipboard;
use sereno::config::Config;
use sereno::mic::MicSimulator;
use sereno::noise::{NoiseColor, NoisePlayer};
use sereno::prompts::{EntryRenderer, PromptList, PromptLoader};
use sereno::speech;

#[derive(Parser, Debug)]
#[command(name = "sereno", about = "Assistive social-communication client")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides api.base_url)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List social scripts (remote, or the built-in emergency list)
    Scripts {
        /// Copy script N (1-based) to the clipboard
        #[arg(long)]
        copy: Option<usize>,
        /// Speak script N (1-based)
        #[arg(long)]
        speak: Option<usize>,
    },
    /// Chat with the assistant; interactive when TEXT is omitted
    Chat {
        text: Option<String>,
        /// Image to send along with the message
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Run the microphone-level simulation
    Mic {
        /// Stop after N ticks (runs until Ctrl+C otherwise)
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Play masking noise
    Noise {
        #[arg(long, default_value_t = 60)]
        seconds: u64,
        /// white or brown
        #[arg(long)]
        color: Option<String>,
    },
    /// Ask for a social strategy for a situation
    Helper { situation: String },
    /// Ask the backend to check sensor readings
    Sensor {
        #[arg(long)]
        sound: Option<f64>,
        #[arg(long)]
        brightness: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug,reqwest=info,hyper=info,hyper_util=info")
    } else {
        EnvFilter::new("info,reqwest=warn,hyper=warn,hyper_util=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load(args.config.as_deref());
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    info!("Backend: {}", config.api.base_url);

    let client = SerenoClient::new(&config.api)?;

    match args.command {
        Command::Scripts { copy, speak } => run_scripts(&config, client, copy, speak).await?,
        Command::Chat { text, image } => run_chat(client, text, image).await?,
        Command::Mic { ticks } => {
            let mut mic = MicSimulator::new(config.mic.clone());
            mic.toggle();
            let device_id = config.api.device_id.clone();
            tokio::select! {
                _ = mic.run(&client, device_id, ticks) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            println!("Alertas de som alto: {}", mic.alerts());
        }
        Command::Noise { seconds, color } => {
            let mut player = NoisePlayer::new(config.noise.clone());
            if let Some(name) = color {
                let color = NoiseColor::from_name(&name)
                    .ok_or_else(|| format!("unknown noise color: {name}"))?;
                player.set_color(color);
            }
            player.toggle()?;
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            player.toggle()?;
        }
        Command::Helper { situation } => {
            println!("{}", client.social_helper(&situation).await?);
        }
        Command::Sensor { sound, brightness } => {
            let advice = client.sensor_check(&SensorCheck { sound, brightness }).await?;
            println!("Som alto: {}", if advice.sound_alert { "sim" } else { "não" });
            println!("Brilho intenso: {}", if advice.brightness_alert { "sim" } else { "não" });
            for tip in advice.tips {
                println!("- {tip}");
            }
        }
    }

    Ok(())
}

async fn run_scripts(
    config: &Config,
    client: SerenoClient,
    copy: Option<usize>,
    speak: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = EntryRenderer::new(
        Arc::new(SystemClipboard::new(&config.clipboard)),
        speech::from_config(&config.speech),
        &config.speech.locale,
    );
    let loader = PromptLoader::new(client, renderer);

    let mut board = PromptList::new();
    loader.load_prompts(&mut board).await;

    for (i, entry) in board.entries().iter().enumerate() {
        println!("{:>2}. \"{}\"", i + 1, entry.text());
    }

    let pick = |n: usize| {
        n.checked_sub(1)
            .and_then(|i| board.get(i))
            .ok_or_else(|| format!("no script #{n} (1..={})", board.len()))
    };
    if let Some(n) = copy {
        pick(n)?.copy();
    }
    if let Some(n) = speak {
        pick(n)?.speak();
    }

    Ok(())
}

async fn run_chat(
    client: SerenoClient,
    text: Option<String>,
    image: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ChatSession::new(client);
    if let Some(path) = image {
        session.attach(&path)?;
    }

    if let Some(text) = text {
        if let Some(reply) = session.send(&text).await {
            println!("{}", reply.text);
        }
        return Ok(());
    }

    println!("Chat interativo. Comandos: /attach <arquivo>, /clear, /quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        } else if line == "/clear" {
            session.clear_attachment();
        } else if let Some(path) = line.strip_prefix("/attach ") {
            match session.attach(Path::new(path.trim())) {
                Ok(a) => println!("📎 {}", a.file_name),
                Err(e) => eprintln!("Não foi possível anexar: {e}"),
            }
        } else if let Some(reply) = session.send(line).await {
            println!("> {}", reply.text);
        }
    }

    Ok(())
}

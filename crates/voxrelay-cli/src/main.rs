//! voxrelay CLI - talk to the assistant through a voxrelay server
//!
//! Asks questions with the run/poll driver and turns answers into speech.

mod api;
mod config;

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use tokio_util::sync::CancellationToken;
use voxrelay::{AssistantRelay, DriverError, RunDriver, SpeechPayload};

use api::RelayClient;
use config::Config;

#[derive(Parser)]
#[command(name = "voxrelay")]
#[command(about = "voxrelay CLI - ask the assistant and synthesize speech", long_about = None)]
#[command(version)]
struct Cli {
    /// Log driver activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant one question and wait for the answer
    Ask {
        /// Question text
        text: String,
        /// Also synthesize the answer
        #[arg(short, long)]
        speak: bool,
        /// Voice id or name (defaults to the configured voice)
        #[arg(long)]
        voice: Option<String>,
        /// Where to write the audio
        #[arg(short, long, default_value = "answer.mp3")]
        out: PathBuf,
    },

    /// Interactive conversation (empty line or "exit" to quit)
    Chat,

    /// List available voices
    Voices,

    /// Synthesize text to an audio file
    Say {
        /// Text to speak
        text: String,
        /// Voice id or name (defaults to the configured voice)
        #[arg(long)]
        voice: Option<String>,
        /// TTS model id (server default if omitted)
        #[arg(short, long)]
        model: Option<String>,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Check the relay is up and configured
    Health,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the relay base URL
    SetUrl { url: String },
    /// Set the default voice (id or name)
    SetVoice { voice: String },
    /// Set the poll interval in milliseconds
    SetInterval { millis: u64 },
    /// Set the maximum polls per question (0 = no cap)
    SetMaxAttempts { attempts: u32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("voxrelay=debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Ask {
            text,
            speak,
            voice,
            out,
        } => cmd_ask(text, speak, voice, out).await,
        Commands::Chat => cmd_chat().await,
        Commands::Voices => cmd_voices().await,
        Commands::Say {
            text,
            voice,
            model,
            out,
        } => cmd_say(text, voice, model, out).await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)),
        Commands::Health => cmd_health().await,
    }
}

// ============================================
// Helpers
// ============================================

fn driver(config: &Config) -> RunDriver<RelayClient> {
    RunDriver::new(RelayClient::new(&config.base_url)).with_settings(config.poll_settings())
}

/// Resolves on Ctrl-C; never resolves if the signal cannot be watched
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Ask through the driver until `interrupt` resolves.
///
/// An interrupt cancels the next poll; a poll already in flight finishes.
/// The interrupt future is dropped as soon as the ask returns.
async fn ask_until<R, F>(
    driver: &RunDriver<R>,
    text: &str,
    interrupt: F,
) -> Result<String, DriverError>
where
    R: AssistantRelay,
    F: Future<Output = ()>,
{
    let cancel = CancellationToken::new();
    let ask = driver.ask_with_cancel(text, &cancel);
    tokio::pin!(ask);

    tokio::select! {
        result = &mut ask => result,
        _ = interrupt => {
            cancel.cancel();
            ask.await
        }
    }
}

/// Run `work` unless Ctrl-C arrives first
async fn interruptible<T>(work: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        result = work => result,
        _ = ctrl_c() => bail!("Interrupted"),
    }
}

/// Ask one question, showing progress while the driver polls
async fn ask_once(driver: &RunDriver<RelayClient>, text: &str) -> Result<Option<String>> {
    eprint!("{}", "Thinking... ".dimmed());

    match ask_until(driver, text, ctrl_c()).await {
        Ok(answer) => {
            eprintln!("{}", "done".green());
            Ok(Some(answer))
        }
        Err(DriverError::Cancelled) => {
            eprintln!("{}", "cancelled".yellow());
            Ok(None)
        }
        Err(DriverError::Timeout { attempts, elapsed }) => {
            eprintln!("{}", "timed out".red());
            bail!(
                "No answer after {} polls ({:.1}s). Try `voxrelay config set-max-attempts`.",
                attempts,
                elapsed.as_secs_f32()
            )
        }
        Err(e) => {
            eprintln!("{}", "failed".red());
            Err(e.into())
        }
    }
}

/// Map a voice name to its id using the catalog; unknown keys pass through
async fn resolve_voice(client: &RelayClient, voice: String) -> Result<String> {
    let catalog = client.list_voices().await?;
    Ok(catalog
        .find(&voice)
        .map(|v| v.voice_id.clone())
        .unwrap_or(voice))
}

async fn speak_to(
    client: &RelayClient,
    text: String,
    voice: String,
    model: Option<String>,
    out: &Path,
) -> Result<()> {
    let voice_id = resolve_voice(client, voice).await?;
    let payload = SpeechPayload {
        text: Some(text),
        voice_id: Some(voice_id),
        model_id: model,
    };

    let bytes = client.synthesize_to_file(&payload, out).await?;
    println!("{} Wrote {} bytes to {:?}", "✓".green(), bytes, out);
    Ok(())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_ask(text: String, speak: bool, voice: Option<String>, out: PathBuf) -> Result<()> {
    let config = Config::load()?;
    let voice = if speak {
        Some(
            config
                .voice_or_default(voice)
                .context("No voice given. Use --voice or `voxrelay config set-voice`.")?,
        )
    } else {
        None
    };

    let driver = driver(&config);

    let Some(answer) = ask_once(&driver, &text).await? else {
        return Ok(());
    };
    println!("{}", answer);

    // Ctrl-C no longer ends the process once it has been watched
    if let Some(voice) = voice {
        interruptible(speak_to(driver.relay(), answer, voice, None, &out)).await?;
    }

    Ok(())
}

async fn cmd_chat() -> Result<()> {
    let config = Config::load()?;
    let driver = driver(&config);

    println!(
        "{} {}",
        "Chatting via".bold(),
        driver.relay().base_url().cyan()
    );
    println!("{}", "Empty line or \"exit\" to quit, Ctrl-C cancels a pending answer.".dimmed());

    loop {
        let text: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("exit") {
            break;
        }

        match ask_once(&driver, text).await {
            Ok(Some(answer)) => println!("{} {}\n", "Assistant:".cyan().bold(), answer),
            Ok(None) => {}
            Err(e) => println!("{} {:#}\n", "Error:".red().bold(), e),
        }
    }

    Ok(())
}

async fn cmd_voices() -> Result<()> {
    let config = Config::load()?;
    let client = RelayClient::new(&config.base_url);

    let catalog = client.list_voices().await?;

    if catalog.voices.is_empty() {
        println!("{}", "No voices available.".yellow());
        return Ok(());
    }

    println!("{}", "Voices:".bold());
    for voice in &catalog.voices {
        let marker = if config.default_voice.as_deref() == Some(voice.voice_id.as_str())
            || config
                .default_voice
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(&voice.name))
        {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {} [{}]{}",
            voice.name.cyan(),
            voice.voice_id.dimmed(),
            voice.category.as_deref().unwrap_or("-"),
            marker
        );
    }

    Ok(())
}

async fn cmd_say(
    text: String,
    voice: Option<String>,
    model: Option<String>,
    out: PathBuf,
) -> Result<()> {
    let config = Config::load()?;
    let voice = config
        .voice_or_default(voice)
        .context("No voice given. Use --voice or `voxrelay config set-voice`.")?;

    let client = RelayClient::new(&config.base_url);
    speak_to(&client, text, voice, model, &out).await
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);
            println!("  Poll interval: {} ms", config.poll_interval_ms);
            println!(
                "  Max polls: {}",
                if config.max_poll_attempts == 0 {
                    "unlimited".to_string()
                } else {
                    config.max_poll_attempts.to_string()
                }
            );
            if let Some(secs) = config.poll_deadline_secs {
                println!("  Deadline: {} s", secs);
            }
            println!(
                "  Default voice: {}",
                config.default_voice.as_deref().unwrap_or("None").cyan()
            );
            return Ok(());
        }
        ConfigAction::SetUrl { url } => {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        ConfigAction::SetVoice { voice } => {
            config.default_voice = Some(voice);
        }
        ConfigAction::SetInterval { millis } => {
            if millis == 0 {
                bail!("Poll interval must be greater than zero");
            }
            config.poll_interval_ms = millis;
        }
        ConfigAction::SetMaxAttempts { attempts } => {
            config.max_poll_attempts = attempts;
        }
    }

    config.save()?;
    println!("{} Saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

async fn cmd_health() -> Result<()> {
    let config = Config::load()?;
    let client = RelayClient::new(&config.base_url);

    print!("Checking {}... ", config.base_url);
    let health = match client.health().await {
        Ok(h) => h,
        Err(e) => {
            println!("{}", "Failed".red());
            return Err(e);
        }
    };
    println!("{} ({} v{})", "OK".green(), health.status, health.version);

    let flag = |set: bool| if set { "configured".green() } else { "missing".red() };
    println!("  Voice: {}", flag(health.voice_configured));
    println!("  Assistant: {}", flag(health.assistant_configured));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use voxrelay::PollSettings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn relay_answering(polls_before_answer: u64) -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/assistant/runs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "thread_id": "t1", "run_id": "r1" })),
            )
            .mount(&server)
            .await;

        if polls_before_answer > 0 {
            Mock::given(method("GET"))
                .and(path("/api/assistant/runs"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({ "status": "pending" })),
                )
                .up_to_n_times(polls_before_answer)
                .mount(&server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path("/api/assistant/runs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "completed", "answer": "ok" })),
            )
            .mount(&server)
            .await;

        server
    }

    fn driver_for(server: &MockServer, max_attempts: u32) -> RunDriver<RelayClient> {
        RunDriver::new(RelayClient::new(&server.uri())).with_settings(PollSettings {
            interval: Duration::from_millis(20),
            max_attempts: Some(max_attempts),
            deadline: None,
        })
    }

    #[tokio::test]
    async fn test_interrupt_listener_is_released_after_answer() {
        let server = relay_answering(1).await;
        let driver = driver_for(&server, 10);

        let (tx, rx) = oneshot::channel::<()>();
        let interrupt = async move {
            let _ = rx.await;
        };

        let answer = ask_until(&driver, "hello", interrupt).await.unwrap();

        assert_eq!(answer, "ok");
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_interrupt_cancels_pending_question() {
        let server = relay_answering(u64::MAX).await;
        let driver = driver_for(&server, 1_000);

        let err = ask_until(&driver, "hello", tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap_err();

        assert!(matches!(err, DriverError::Cancelled));
    }
}

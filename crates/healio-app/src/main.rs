//! Healio application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the inference client and speech engine
//! 4. Run the terminal event loop: stdin lines, inference replies and
//!    speech completion events are handled one at a time on a single thread

mod cli;
mod commands;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use healio_chat::{ChatOrchestrator, PendingReply, RemoveOutcome, ReplyOutcome};
use healio_core::config::HealioConfig;
use healio_core::error::Result;
use healio_inference::{GeminiClient, InferenceClient, InferenceError};
use healio_speech::{
    event_channel, CommandSpeechEngine, SilentSpeechEngine, SpeechAdapter, SpeechEngine,
    ToggleOutcome,
};

use cli::CliArgs;
use commands::{Command, HELP_TEXT};

/// A finished network call, returned to the event loop.
struct InferenceDone {
    pending: PendingReply,
    result: std::result::Result<String, InferenceError>,
}

type ReplySender = mpsc::UnboundedSender<InferenceDone>;

enum Flow {
    Continue,
    Quit,
}

/// Run the request off the loop; the reply comes back on `tx`.
fn spawn_request(client: Arc<dyn InferenceClient>, pending: PendingReply, tx: ReplySender) {
    tokio::spawn(async move {
        let result = client.complete(pending.context()).await;
        if tx.send(InferenceDone { pending, result }).is_err() {
            tracing::debug!("Event loop gone; dropping reply");
        }
    });
}

fn build_speech_engine(config: &HealioConfig) -> Arc<dyn SpeechEngine> {
    match (config.speech.enabled, config.speech.program.as_deref()) {
        (true, Some(program)) if !program.trim().is_empty() => {
            tracing::info!(program, "Speech enabled");
            Arc::new(CommandSpeechEngine::new(program, config.speech.args.clone()))
        }
        (true, _) => {
            tracing::info!("No speech program configured; replies will not be read aloud");
            Arc::new(SilentSpeechEngine::new())
        }
        (false, _) => {
            tracing::info!("Speech disabled");
            Arc::new(SilentSpeechEngine::new())
        }
    }
}

fn print_status(chat: &ChatOrchestrator) {
    if let Some(line) = render::status(chat.store().ui()) {
        println!("{line}");
    }
}

async fn handle_line(chat: &mut ChatOrchestrator, line: &str, replies: &ReplySender) -> Flow {
    let command = match commands::parse(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{e}");
            return Flow::Continue;
        }
    };

    match command {
        Command::Empty => {}
        Command::Send(text) => {
            chat.set_input(text);
            match chat.begin_submit() {
                Ok(pending) => spawn_request(chat.client(), pending, replies.clone()),
                Err(e) => println!("{e}"),
            }
        }
        Command::Save => {
            chat.save_current_session();
            println!("Chat saved.");
            println!("{}", render::saved_list(chat.store()));
        }
        Command::New => {
            chat.new_chat();
            println!("{}", render::transcript(chat.store()));
        }
        Command::Sidebar => {
            if chat.toggle_sidebar() {
                println!("{}", render::saved_list(chat.store()));
            } else {
                println!("Sidebar closed.");
            }
        }
        Command::List => println!("{}", render::saved_list(chat.store())),
        Command::Open(index) => match chat.select_session(index) {
            Ok(()) => println!("{}", render::transcript(chat.store())),
            Err(e) => println!("{e}"),
        },
        Command::Remove(index) => match chat.confirm_and_remove(index) {
            Ok(RemoveOutcome::Removed(_)) => println!("Chat removed."),
            Ok(RemoveOutcome::AwaitingConfirmation(pending)) => {
                println!("{}", render::confirmation(&pending))
            }
            Err(e) => println!("{e}"),
        },
        Command::Answer(choice) => match chat.resolve_removal(choice) {
            Ok(Some(_)) => println!("Chat removed."),
            Ok(None) => println!("Nothing removed."),
            Err(e) => println!("{e}"),
        },
        Command::Speak(index) => match chat.toggle_speech(index).await {
            Ok(ToggleOutcome::Started(_)) => println!("Speaking message {}.", index + 1),
            Ok(ToggleOutcome::Stopped) => println!("Stopped speaking."),
            Ok(ToggleOutcome::Busy) => println!("Speech is busy."),
            Ok(ToggleOutcome::Failed) => println!("Speech is unavailable."),
            Err(e) => println!("{e}"),
        },
        Command::Help => println!("{HELP_TEXT}"),
        Command::Quit => return Flow::Quit,
    }

    print_status(chat);
    Flow::Continue
}

async fn show_reply(chat: &mut ChatOrchestrator, done: InferenceDone) {
    match chat.finish_reply(done.pending, done.result).await {
        ReplyOutcome::Replied(_) => {
            let transcript = chat.store().transcript();
            if let Some(last) = transcript.last() {
                println!("{}", render::turn(transcript.len() - 1, last));
            }
        }
        ReplyOutcome::Empty => println!("(no reply)"),
        ReplyOutcome::Failed | ReplyOutcome::Discarded => {}
    }
    print_status(chat);
}

async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.resolve_config_path();
    let config_found = config_path.exists();
    let mut config = if config_found {
        HealioConfig::load(&config_path)?
    } else {
        HealioConfig::default()
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    // Tracing. Logs go to stderr so they never interleave with the chat.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Healio v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_path.display(), found = config_found, "Configuration resolved");

    // Fails fast on a missing key, before any UI is shown.
    let client = GeminiClient::new(&config.inference)?;
    tracing::info!(model = client.model(), "Inference client ready");

    let (speech_tx, mut speech_rx) = event_channel();
    let speech = SpeechAdapter::new(build_speech_engine(&config), speech_tx);
    let mut chat = ChatOrchestrator::new(&config, Arc::new(client), speech);

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<InferenceDone>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Healio - mental health support chat. Type /help for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if let Flow::Quit = handle_line(&mut chat, &line, &reply_tx).await {
                    break;
                }
            }
            Some(done) = reply_rx.recv() => show_reply(&mut chat, done).await,
            Some(event) = speech_rx.recv() => {
                chat.handle_speech_event(event);
            }
        }
    }

    tracing::info!(saved = chat.store().saved_len(), "Healio exiting");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("healio: {e}");
            ExitCode::FAILURE
        }
    }
}

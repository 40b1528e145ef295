//! pdf-speech - Convert PDF files to speech audio, one WAV file per text chunk

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_speech::config::PdfSpeechConfig;
use pdf_speech::output;
use pdf_speech::pdf::PdfExtractReader;
use pdf_speech::tts::espeak::EspeakEngine;
use pdf_speech::tts::{self, SpeechEngine};
use pdf_speech::{ConversionSettings, ConversionWorker, ProgressEvent, RenderFailurePolicy, RunState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "pdf-speech")]
#[command(about = "Convert PDF files to speech audio, one WAV file per text chunk", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the PDF file
    pdf_file: Option<PathBuf>,

    /// Voice: "default", an index from `pdf-speech voices`, or a voice id
    #[arg(long)]
    voice: Option<String>,

    /// Speech rate in words per minute (50-300)
    #[arg(long)]
    rate: Option<u32>,

    /// Volume (0.1-1.0)
    #[arg(long)]
    volume: Option<f32>,

    /// Maximum characters per chunk
    #[arg(long)]
    max_chars: Option<usize>,

    /// Write audio files here instead of <storage-root>/PDFtoSpeech/output
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Base storage location (default: home directory)
    #[arg(long)]
    storage_root: Option<PathBuf>,

    /// What to do when a chunk fails to render: continue or abort
    #[arg(long)]
    on_render_error: Option<RenderFailurePolicy>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the voices the speech engine offers
    Voices {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that PDF extraction and speech synthesis are available
    Check,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice {
        /// "default", a voice index, or a voice id
        voice: String,
    },
    /// Set default speech rate
    SetRate {
        /// Words per minute (50-300)
        value: u32,
    },
    /// Set default volume
    SetVolume {
        /// Value (0.1-1.0)
        value: f32,
    },
    /// Set maximum characters per chunk
    SetMaxChars {
        /// Characters (at least 1)
        value: usize,
    },
    /// Set the base storage location for output
    SetStorageRoot {
        /// Directory under which PDFtoSpeech/output is created
        path: PathBuf,
    },
    /// Set the policy for chunks that fail to render
    SetOnRenderError {
        /// continue or abort
        policy: RenderFailurePolicy,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Handle subcommands
    match &args.command {
        Some(Commands::Voices { json }) => {
            return handle_voices_command(*json);
        }
        Some(Commands::Check) => {
            return handle_check_command();
        }
        Some(Commands::Config { action }) => {
            return handle_config_command(action);
        }
        None => {}
    }

    // Load configuration
    let config = PdfSpeechConfig::load().context("Failed to load configuration")?;

    let settings = build_settings(&args, &config);
    let storage_root = args.storage_root.clone().or_else(|| config.storage_root.clone());
    let output_dir =
        output::resolve_output_dir(args.output_dir.as_deref(), storage_root.as_deref());

    let worker = ConversionWorker::new(
        Arc::new(PdfExtractReader),
        Arc::new(EspeakEngine::new(&config.espeak_command)),
        output_dir,
    );

    if args.debug {
        eprintln!("PDF: {:?}", args.pdf_file);
        eprintln!("Output: {}", worker.output_dir().display());
        eprintln!("Voice: {}", settings.voice.voice);
        eprintln!("Rate: {} WPM", settings.voice.rate_wpm);
        eprintln!("Volume: {}%", (settings.voice.volume * 100.0).round());
        eprintln!("Max chars: {}", settings.max_chars);
        eprintln!("On render error: {}", settings.on_render_error);
    }

    if let Some(ref pdf) = args.pdf_file {
        eprintln!("Selected: {}", pdf.display());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = worker.start(args.pdf_file.as_deref(), settings, tx)?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% ({elapsed}) {msg}")?
            .progress_chars("#>-"),
    );

    let mut stopping = false;
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(ProgressEvent::Progress(percent)) => pb.set_position(percent as u64),
                Some(ProgressEvent::Log(line)) => pb.println(line),
                Some(ProgressEvent::Finished(_)) | None => break,
            },
            _ = tokio::signal::ctrl_c(), if !stopping => {
                pb.println("Stopping conversion...");
                worker.stop();
                stopping = true;
            }
        }
    }

    let report = tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("Task join error")?;

    match report.state {
        RunState::Completed => {
            pb.finish_with_message("Done");
            if let Some(ref notice) = report.notice {
                eprintln!("{}", notice);
            } else {
                eprintln!(
                    "\nWrote {} file(s) to {}",
                    report.files.len(),
                    report.output_dir.display()
                );
            }
            if report.chunks_failed > 0 {
                eprintln!("Failed chunks: {}", report.chunks_failed);
            }
            Ok(())
        }
        RunState::Cancelled => {
            pb.abandon_with_message("Stopped");
            eprintln!("\nStopped after {} file(s)", report.files.len());
            Ok(())
        }
        _ => {
            pb.abandon_with_message("Failed");
            anyhow::bail!(
                "{}",
                report.error.as_deref().unwrap_or("Conversion failed")
            )
        }
    }
}

/// Merge CLI overrides over configured defaults.
fn build_settings(args: &Args, config: &PdfSpeechConfig) -> ConversionSettings {
    let mut config = config.clone();
    if let Some(ref voice) = args.voice {
        config.voice = voice.clone();
    }
    if let Some(rate) = args.rate {
        config.rate = rate;
    }
    if let Some(volume) = args.volume {
        config.volume = volume;
    }
    if let Some(max_chars) = args.max_chars {
        config.max_chars = max_chars;
    }
    if let Some(policy) = args.on_render_error {
        config.on_render_error = policy;
    }
    config.conversion_settings()
}

fn handle_voices_command(json: bool) -> Result<()> {
    let config = PdfSpeechConfig::load()?;
    let engine = EspeakEngine::new(&config.espeak_command);
    let voices = engine.voices().context("Failed to load voices")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    println!("default");
    for (i, voice) in voices.iter().enumerate() {
        println!("{}: {} ({})", i, voice.name, voice.id);
    }
    Ok(())
}

fn handle_check_command() -> Result<()> {
    let config = PdfSpeechConfig::load()?;
    let engine = EspeakEngine::new(&config.espeak_command);
    let mut ok = true;

    println!("PDF extraction: built in (pdf-extract)");

    match engine.version() {
        Ok(version) => println!("Speech engine: {}", version),
        Err(e) => {
            println!("Speech engine: FAILED - {}", e);
            ok = false;
        }
    }

    if ok {
        match engine.voices() {
            Ok(voices) => println!("Voices: {}", voices.len()),
            Err(e) => {
                println!("Voices: FAILED - {}", e);
                ok = false;
            }
        }
    }

    let settings = config.conversion_settings();
    println!(
        "Defaults: voice {}, {} WPM, volume {}%",
        settings.voice.voice,
        settings.voice.rate_wpm,
        (settings.voice.volume * 100.0).round()
    );

    if !ok {
        anyhow::bail!("Speech synthesis is not available. Install eSpeak NG.");
    }
    println!("Ready to convert");
    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = PdfSpeechConfig::load()?;
            println!("Configuration file: {:?}", PdfSpeechConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("rate = {}", config.rate);
            println!("volume = {}", config.volume);
            println!("max_chars = {}", config.max_chars);
            if let Some(root) = &config.storage_root {
                println!("storage_root = \"{}\"", root.display());
            } else {
                println!("storage_root = (home directory)");
            }
            println!("on_render_error = \"{}\"", config.on_render_error);
            println!("espeak_command = \"{}\"", config.espeak_command);
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = PdfSpeechConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", voice);
        }
        ConfigAction::SetRate { value } => {
            let mut config = PdfSpeechConfig::load()?;
            config.rate = (*value).clamp(tts::MIN_RATE_WPM, tts::MAX_RATE_WPM);
            config.save()?;
            println!("Default rate set to: {} WPM", config.rate);
        }
        ConfigAction::SetVolume { value } => {
            let mut config = PdfSpeechConfig::load()?;
            config.volume = value.clamp(tts::MIN_VOLUME, tts::MAX_VOLUME);
            config.save()?;
            println!("Default volume set to: {}", config.volume);
        }
        ConfigAction::SetMaxChars { value } => {
            let mut config = PdfSpeechConfig::load()?;
            config.max_chars = (*value).max(1);
            config.save()?;
            println!("Max chars per chunk set to: {}", config.max_chars);
        }
        ConfigAction::SetStorageRoot { path } => {
            let mut config = PdfSpeechConfig::load()?;
            config.storage_root = Some(path.clone());
            config.save()?;
            println!(
                "Output directory is now: {}",
                output::output_dir(path).display()
            );
        }
        ConfigAction::SetOnRenderError { policy } => {
            let mut config = PdfSpeechConfig::load()?;
            config.on_render_error = *policy;
            config.save()?;
            println!("Render failure policy set to: {}", policy);
        }
    }
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use interview_assistant::api::ApiServer;
use interview_assistant::{
    Config, CredentialOverrides, DevDefaults, InterviewQuestion, InterviewSession, ResponseMode,
    SynthesisResult, credentials,
};

const DEV_DEFAULTS_ENV: &str = "INTERVIEW_DEV_DEFAULTS";

/// Interview Assistant - persona interview answers with optional speech
#[derive(Parser)]
#[command(name = "interview", version, about)]
struct Cli {
    /// Path to the .docx holding the Gemini API key (falls back to GEMINI_KEY_PATH)
    #[arg(long, global = true)]
    gemini_key_path: Option<PathBuf>,

    /// Path to the GCP service-account JSON for TTS (falls back to GCP_KEY_PATH)
    #[arg(long, global = true)]
    gcp_key_path: Option<PathBuf>,

    /// Fall back to secrets/ in the working directory when no path is configured
    #[arg(
        long,
        global = true,
        env = DEV_DEFAULTS_ENV,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    dev_defaults: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// List the interview questions
    Questions,
    /// Answer one question
    Ask {
        /// Question number (1-5)
        number: usize,

        /// Also synthesize the answer and write the MP3 here
        #[arg(long)]
        audio: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,interview_assistant=info",
        1 => "info,interview_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let command = cli.command.unwrap_or(Command::Serve { port: None });

    if matches!(command, Command::Questions) {
        for question in InterviewQuestion::ALL {
            println!("{}. {question}", question.index() + 1);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let overrides = CredentialOverrides {
        gemini_key_path: cli.gemini_key_path.or(config.credentials.gemini_key_path.take()),
        gcp_key_path: cli.gcp_key_path.or(config.credentials.gcp_key_path.take()),
    };
    let dev = cli.dev_defaults.then(DevDefaults::local);

    let credentials = credentials::resolve(&overrides, dev.as_ref())?;
    let session = InterviewSession::from_config(&config, &credentials)?;

    match command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            ApiServer::new(session, port)
                .with_static_dir(config.server.static_dir.clone())
                .run()
                .await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ask { number, audio } => ask(&session, number, audio).await,
        Command::Questions => Ok(ExitCode::SUCCESS),
    }
}

/// Answer one question on stdout, optionally writing the audio clip
async fn ask(
    session: &InterviewSession,
    number: usize,
    audio_path: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let question = number
        .checked_sub(1)
        .and_then(InterviewQuestion::from_index)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "question number must be between 1 and {}",
                InterviewQuestion::ALL.len()
            )
        })?;

    let mode = if audio_path.is_some() {
        ResponseMode::TextAndAudio
    } else {
        ResponseMode::TextOnly
    };

    println!("Q: {question}\n");

    let response = session.respond(question, mode).await;
    println!("{}", session.display_text(&response.text));

    let Some(path) = audio_path else {
        return Ok(ExitCode::SUCCESS);
    };

    match response.audio {
        Some(SynthesisResult::Audio(clip)) => {
            std::fs::write(&path, &clip.bytes)?;
            println!("\nSaved {} bytes of audio to {}", clip.bytes.len(), path.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(SynthesisResult::Unavailable { reason }) => {
            eprintln!("\nNo audio available: {reason}");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Top-level CLI parser for the `vgl` binary.
#[derive(Debug, Parser)]
#[command(name = "vgl", version, about = "Vigil - external dependency diagnostics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Probe every configured external service.
    Services,
    /// Deepgram speech-to-text: key check and live streaming session.
    Stt(SttArgs),
    /// Backend realtime WebSocket: health, reachability, audio transmission.
    Listen(ListenArgs),
    /// Show what is configured, with secrets masked.
    Env,
}

#[derive(Clone, Debug, Args)]
pub struct SttArgs {
    /// Skip pushing tone audio over the live session.
    #[arg(long)]
    pub no_audio: bool,

    /// Seconds to keep draining events after the close request.
    #[arg(long, default_value_t = 5)]
    pub wait: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ListenArgs {
    /// STT backend the listen endpoint should use.
    #[arg(long, default_value = "deepgram")]
    pub stt_service: String,

    /// Also stream one second of tone audio after connecting.
    #[arg(long)]
    pub send_audio: bool,
}

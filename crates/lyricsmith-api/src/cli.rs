//! CLI command definitions for the `lyricsmith` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use lyricsmith_infra::config::DEFAULT_CONFIG_FILE;
use lyricsmith_types::generation::GenerationRequest;
use lyricsmith_types::language::Language;

/// Turn memories into song lyrics.
#[derive(Parser)]
#[command(name = "lyricsmith", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default tracing directives for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info,tower_http=warn",
            1 => "debug,hyper=info,reqwest=info",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve(ServeArgs),

    /// Print the generation prompt for a memory without calling the model.
    Prompt(PromptArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Host to bind to (overrides the config file).
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Path to the TOML config file.
    #[arg(short, long, env = "LYRICSMITH_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct PromptArgs {
    /// The memory or story the song is about.
    #[arg(long)]
    pub memory: String,

    /// Output language: english, hindi or telugu.
    #[arg(long, default_value = "english")]
    pub language: Language,

    #[arg(long, default_value = "")]
    pub emotion: String,

    #[arg(long, default_value = "")]
    pub genre: String,

    #[arg(long, default_value = "")]
    pub mood: String,

    #[arg(long, default_value = "")]
    pub tone: String,

    /// Who the song is for.
    #[arg(long, default_value = "")]
    pub song_for: String,

    /// Cliché to avoid (repeatable).
    #[arg(long = "avoid")]
    pub avoid_cliches: Vec<String>,
}

impl PromptArgs {
    pub fn into_request(self) -> GenerationRequest {
        GenerationRequest {
            memory: self.memory.trim().to_string(),
            emotion: self.emotion,
            genre: self.genre,
            mood: self.mood,
            tone: self.tone,
            song_for: self.song_for,
            avoid_cliches: self.avoid_cliches,
            language: self.language,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn prompt_args_build_request() {
        let cli = Cli::try_parse_from([
            "lyricsmith",
            "prompt",
            "--memory",
            " monsoon evenings ",
            "--language",
            "Telugu",
            "--avoid",
            "heart of gold",
            "--avoid",
            "fire",
        ])
        .unwrap();

        let Commands::Prompt(args) = cli.command else {
            panic!("expected prompt subcommand");
        };
        let request = args.into_request();
        assert_eq!(request.memory, "monsoon evenings");
        assert_eq!(request.language, Language::Telugu);
        assert_eq!(request.avoid_cliches, vec!["heart of gold", "fire"]);
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(
            Cli::try_parse_from(["lyricsmith", "prompt", "--memory", "x", "--language", "klingon"])
                .is_err()
        );
    }

    #[test]
    fn verbosity_selects_filter() {
        let cli = Cli::try_parse_from(["lyricsmith", "--quiet", "prompt", "--memory", "x"]).unwrap();
        assert_eq!(cli.log_filter(), "error");

        let cli = Cli::try_parse_from(["lyricsmith", "-vv", "prompt", "--memory", "x"]).unwrap();
        assert_eq!(cli.log_filter(), "trace");
    }
}

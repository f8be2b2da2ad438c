use clap::{ArgAction, Parser};
use std::{net::SocketAddr, path::PathBuf};

/// Recipesnap server configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "recipesnap", version, about = "Snap a photo of your ingredients, get recipes")]
pub struct Config {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (-q, -qq, -qqq)
    #[arg(short = 'q', action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Address to bind the HTTP server to
    #[arg(long, env = "RECIPESNAP_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Optional log file path (logs are written to stdout + this file)
    #[arg(long, env = "RECIPESNAP_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// CORS allowed origin (e.g., <https://recipes.yourdomain.com>)
    /// If not set, allows all origins
    #[arg(long, env = "RECIPESNAP_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Gemini API key. Required: the server refuses to start without it.
    #[arg(long, env = "RECIPESNAP_GEMINI_API_KEY", required = true)]
    pub gemini_api_key: String,

    /// Gemini model to use
    #[arg(long, env = "RECIPESNAP_GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    /// Gemini API base URL
    #[arg(
        long,
        env = "RECIPESNAP_GEMINI_API_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub gemini_api_url: String,

    /// Instructional prompt sent with every image
    #[arg(long, env = "RECIPESNAP_PROMPT", default_value = DEFAULT_PROMPT)]
    pub prompt: String,
}

const DEFAULT_PROMPT: &str = "Identify the ingredients in this image. \
Based on these ingredients, generate 3 creative and delicious recipes. \
For each recipe, provide a name, a short, enticing description, a list of \
the ingredients needed, and step-by-step cooking instructions.";

impl Config {
    #[must_use]
    pub fn verbosity_delta(&self) -> i16 {
        i16::from(self.verbose) - i16::from(self.quiet)
    }

    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_delta() {
            d if d <= -2 => "error",
            -1 => "warn",
            0 => "info,recipesnap=info,axum=info,tower_http=info",
            1 => "debug,recipesnap=debug,axum=info,tower_http=info",
            2 => "trace,recipesnap=trace,axum=debug,tower_http=trace,hyper=info",
            _ => "trace,recipesnap=trace,axum=trace,tower_http=trace,hyper=debug",
        }
    }
}

//! Server configuration from command-line flags and environment variables.

use clap::Parser;

/// Default cap on bytes buffered from one upload request (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Name the browser saves the generated file under.
pub const DEFAULT_DOWNLOAD_NAME: &str = "generated-document.pdf";

/// Serve the customer deck generator.
#[derive(Parser, Debug, Clone)]
#[command(name = "deckgen-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind to
    #[arg(long, env = "DECKGEN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "DECKGEN_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum total bytes accepted in one upload request
    #[arg(long, env = "DECKGEN_MAX_UPLOAD", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// File name the form saves downloads under
    #[arg(long, env = "DECKGEN_DOWNLOAD_NAME", default_value = DEFAULT_DOWNLOAD_NAME)]
    pub download_name: String,
}

impl Config {
    /// The subset of configuration request handlers need.
    pub fn settings(&self) -> Settings {
        Settings {
            max_upload_bytes: self.max_upload_bytes,
            download_name: self.download_name.clone(),
        }
    }
}

/// Per-application settings shared with handlers through `web::Data`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub max_upload_bytes: usize,
    pub download_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

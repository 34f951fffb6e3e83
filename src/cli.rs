use clap::{Parser, Subcommand};
use mediatab_source::StreamKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediatab")]
#[command(author, version, about = "Structured media metadata from MediaInfo reports")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a media file and print its structured report
    Info {
        /// File to analyze
        #[arg(required = true)]
        file: PathBuf,

        /// Stream index passed to the engine
        #[arg(long, default_value = "0")]
        stream: usize,

        /// Only print this section (e.g. "Video" or "Audio #2")
        #[arg(long)]
        section: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Stream the file to the engine in chunks instead of passing its path
        #[arg(long)]
        buffered: bool,
    },

    /// Print a single field of one stream
    Get {
        /// File to analyze
        #[arg(required = true)]
        file: PathBuf,

        /// Field name as the engine knows it (e.g. "Format", "Width")
        #[arg(required = true)]
        key: String,

        /// Stream kind: general, video, audio, text, other, image, menu
        #[arg(long, default_value = "video")]
        kind: StreamKind,

        /// Index of the stream within its kind
        #[arg(long, default_value = "0")]
        stream: usize,
    },

    /// Structure a saved CSV report ("-" reads stdin)
    Structure {
        /// Report file
        #[arg(required = true)]
        report: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the MediaInfo engine is available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

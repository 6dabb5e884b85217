use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "scanray")]
#[command(about = "A multithreaded scanline path tracer")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "1920", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "1080", help = "Image height in pixels")]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100", help = "Number of samples per pixel")]
    pub samples_per_pixel: u32,

    /// Maximum number of ray bounces
    #[arg(long, default_value = "50", help = "Maximum number of ray bounces")]
    pub max_depth: u32,

    /// Number of render threads (defaults to available hardware parallelism)
    #[arg(long, short = 'j', help = "Number of render threads (defaults to available hardware parallelism)")]
    pub threads: Option<usize>,

    /// Output image file path (format chosen by extension: .png or .jpg)
    #[arg(short, long, default_value = "output.png", help = "Output image file path (format chosen by extension: .png or .jpg)")]
    pub output: String,

    /// Also write a JPG copy to this path
    #[arg(long, help = "Also write a JPG copy to this path")]
    pub jpg: Option<String>,

    /// Also write a plain-text P3 PPM file to this path
    #[arg(long, help = "Also write a plain-text P3 PPM file to this path")]
    pub ppm: Option<String>,

    /// Send the finished image to a TEV viewer at this address
    #[arg(long, help = "Send the finished image to a TEV viewer at this address (IP or IP:port)")]
    pub tev_address: Option<String>,

    /// Write a chrome://tracing profile of the run to this path
    #[arg(long, help = "Write a chrome://tracing profile of the run to this path")]
    pub trace: Option<String>,
}

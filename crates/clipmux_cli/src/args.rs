//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Download a video's streams, optionally clip them, and mux everything
/// (captions included) into one file.
#[derive(Parser, Debug)]
#[command(name = "clipmux", version, about)]
pub struct Args {
    /// Video URLs; asked for interactively when none are given
    pub urls: Vec<String>,

    #[arg(short, long, conflicts_with = "quiet")]
    /// Show every external command and its output
    pub verbose: bool,

    #[arg(short, long)]
    /// Only show errors
    pub quiet: bool,

    #[arg(short, long, value_name = "ID")]
    /// The stream to download; asked for after listing when omitted
    pub itag: Option<String>,

    #[arg(long, value_name = "LANGUAGE")]
    /// Caption language, matched against caption names [default: English]
    pub lang: Option<String>,

    #[arg(short, long)]
    /// List the available streams and exit
    pub list: bool,

    #[arg(short, long, value_name = "TIME")]
    /// Clip start, as seconds or [HH:]MM:SS[.mmm]
    pub start: Option<String>,

    #[arg(short, long, value_name = "TIME")]
    /// Clip length, as seconds or [HH:]MM:SS[.mmm]
    pub duration: Option<String>,

    #[arg(short, long, value_name = "FILE")]
    /// TOML settings file
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "FILE", conflicts_with = "config")]
    /// Write a settings file with every default and exit
    pub init_config: Option<PathBuf>,
}

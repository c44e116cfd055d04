//! Subtitle writers.
//!
//! Each writer is a pure function that takes SubtitleData and returns a formatted string.

mod srt;

pub use srt::{format_srt_time, write_srt};

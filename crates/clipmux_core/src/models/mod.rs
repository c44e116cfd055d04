//! Data models for clipmux.
//!
//! This module contains the core data structures shared by every stage:
//! - Enums for stream and artifact kinds
//! - Catalog descriptors (streams, captions)
//! - The requested time window and fetched artifacts

mod enums;
mod media;
mod window;

pub use enums::{ArtifactKind, StreamKind};
pub use media::{ArtifactSource, CaptionDescriptor, FetchedArtifact, StreamDescriptor};
pub use window::TimeWindow;

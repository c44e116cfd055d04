//! Pipeline step implementations.
//!
//! Each step handles one stage of a URL's run, in this order.

mod captions;
mod cleanup;
mod fetch;
mod finalize;
mod resolve;
mod select;

pub use captions::CaptionsStep;
pub use cleanup::CleanupStep;
pub use fetch::FetchStep;
pub use finalize::FinalizeStep;
pub use resolve::ResolveStep;
pub use select::SelectStep;

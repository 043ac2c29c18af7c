//! Core daemon protocol types.

mod reply;
mod step;

pub use reply::{REJECTED, Reply};
pub use step::Step;

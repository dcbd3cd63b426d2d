//! # Supervised groups.
//!
//! - [`Group`]: members sharing one [`Scope`](crate::Scope); the first error cancels it;
//! - [`Config`]: grace period and quit signals used by [`Group::supervise`].

mod config;
mod group;

pub use config::Config;
pub use group::Group;

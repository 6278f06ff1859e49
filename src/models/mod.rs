//! Data models for stored records and inbound submissions.

mod contact;
mod feedback;

pub use contact::*;
pub use feedback::*;

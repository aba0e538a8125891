//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for profiles and envelopes.

pub mod envelope;
pub mod profile;

pub use envelope::format_envelope_summary;
pub use profile::{format_issues, format_profile_list};

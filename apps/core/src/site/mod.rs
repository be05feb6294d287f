//! # Site Module
//!
//! Page interactions of the campaign site that carry real logic: form
//! acknowledgements, the election countdown and social share links.

pub mod countdown;
pub mod forms;
pub mod share;

pub use countdown::{Countdown, ElectionCountdown};
pub use forms::{FormKind, FormSubmission};
pub use share::{share_url, ShareTarget};

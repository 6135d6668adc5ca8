//! Job domain types, completion events and errors.
//!
//! # Structure
//!
//! - `types` - `JobId`, `JobState`, `ItemOutcome`
//! - `events` - `CompletionEvent` delivered to the interactive consumer
//! - `errors` - resolver, submission, item and pool fault errors

pub mod errors;
pub mod events;
pub mod types;

pub use errors::{JobError, PoolTaskFault, ResolveError, SubmitError};
pub use events::CompletionEvent;
pub use types::{ItemOutcome, JobId, JobState};

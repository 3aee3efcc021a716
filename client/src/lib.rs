//! # Task-list client logic
//!
//! The submission logic behind the task-list pages, kept independent of any
//! page plumbing so it can be tested without a browser or a live server.
//!
//! ## Pieces
//!
//! - [`debounce`]: delay-and-collapse wrapper so rapid triggers (keystrokes)
//!   fire a target action once per quiet period.
//! - [`autosave`]: applies the debouncer to task-title edits; an empty title
//!   turns the save into a delete.
//! - [`submit`]: one shared submission flow for the login and register forms,
//!   reconciling the server's JSON reply into exactly one of navigation,
//!   field-level error text, or an alert.
//! - [`transport`]: the HTTP boundary, with a reqwest implementation.
//!
//! The page itself (error slots, alerts, navigation, native form submission)
//! sits behind the [`submit::FormPage`] and [`autosave::FormSubmitter`]
//! traits, so every flow here is drivable from plain tests.

pub mod autosave;
pub mod debounce;
pub mod submit;
pub mod transport;

pub use autosave::{AutosaveController, FormSubmitter, TitleEdit};
pub use debounce::Debouncer;
pub use submit::{Field, FormPage, Outcome, submit_login, submit_register};
pub use transport::{HttpTransport, Transport, TransportError, TransportReply};

//! # sparkdeck-console
//!
//! Client-side reconciliation core for the cluster console.
//!
//! Two kinds of state are kept strictly apart:
//!
//! - **Draft**: the operator's unsaved worker pool ([`WorkerDraft`]). It flows
//!   to the backend only on an explicit apply, as a copied snapshot.
//! - **Authoritative**: status, logs and notebooks as last fetched. Each
//!   successful fetch replaces them in full; failed background fetches leave
//!   them as they were.
//!
//! [`Console`] holds both and is driven by [`Action`]s and [`Completion`]s.
//! [`Runtime`] executes the [`Effect`]s it returns on the tokio runtime and
//! runs the background pollers.

pub mod action;
pub mod console;
pub mod draft;
pub mod logs;
pub mod modal;
pub mod notebooks;
pub mod notify;
pub mod runtime;
pub mod status;

pub use action::{Action, Completion, DialogEdit, Effect, Fetch, Message, Mutation, MutationKind, Ticket};
pub use console::{Console, Pending};
pub use draft::{DraftError, WorkerDraft, WorkerField, WorkerRow};
pub use modal::{Confirmation, DialogField, NotebookDialog};
pub use notify::{Notification, NotificationCenter, Phase};
pub use runtime::{Pollers, Runtime, SystemBrowser, UrlOpener, channel};
pub use status::{Availability, StatusPanel};

//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod errors;
pub mod handle;
pub mod transport;
pub mod views;

pub use errors::{Result, RuntimeError, TransportError};
pub use handle::StoreHandle;
pub use transport::{ChatClient, ChatMessage, ChatNotifier, Notifier};
pub use views::{DriverView, Handled, ReportContext};

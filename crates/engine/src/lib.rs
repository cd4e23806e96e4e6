//! # Interaction state machine
//!
//! Turns inbound chat events into replies. [`Planner`] decides what the user
//! sees next; [`Engine`] executes that decision through a [`Transport`] and
//! logs usage. Failures never escape a turn: lookups that miss become visible
//! text, delivery errors are logged.
//!
//! ```text
//! Idle ──/all──▶ ShowingRoot ──cat_<key>──▶ ShowingCategory(key)
//!                     ▲                            │
//!                     └────────────back────────────┘
//! ```

mod engine;
mod error;
mod machine;
mod render;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod texts;
mod transport;

pub use engine::{report_malformed, Engine};
pub use error::{EngineError, Result, TransportError};
pub use machine::{Planned, Planner, MAX_HINTS, MIN_QUERY_CHARS, QUICK_KEY};
pub use render::{button_label, category_picker, document_buttons, root_picker, LABEL_GRAPHEMES};
pub use transport::Transport;

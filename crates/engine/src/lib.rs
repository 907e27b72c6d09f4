//! Mute engine for spotify-mute.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Event    ┌──────────────────────────────────────┐
//! │ player / bus │──────────▶ │ Engine (single consumer)             │
//! └──────────────┘            │   Session                            │
//!        ▲                    │     TrackState ── classify ──┐       │
//!        │ UnmuteTimerElapsed │     MuteStateMachine ◀───────┘       │
//!        └────────────────────│   executes Commands                  │
//!                             └───────┬──────────────┬───────────────┘
//!                                     ▼              ▼
//!                              MuteController     Notifier
//! ```
//!
//! `state.rs` is pure; `engine.rs` owns the side effects.

mod engine;
mod session;
mod state;

pub use engine::{Engine, EngineExit};
pub use session::Session;
pub use state::{Command, MuteState, MuteStateMachine};

//! Overlay state tracking
//!
//! This module provides:
//! - **Position states**: per-position `Hidden`/`Showing` records
//! - **Display commands**: the minimal mutations handed to the native layer
//! - **Engine**: drives the scheduler each tick and owns all session state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Distribution (loaded once)                      │
//! │  "Show activation 7 at 'top' between 1 000 ms and 5 000 ms"     │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                    on_tick(handle, playback_ms)
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              PositionState (per tracked position)                │
//! │  "'top' is Showing activation 7 under window 1 000–5 000"       │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                 DisplayCommand stream → native layer
//! ```

mod engine;
mod state;


pub use engine::{ActivationSource, EngineError, OverlayEngine};
pub use state::{DisplayCommand, PositionState, TrackerHandle};

//! Community Sync - Clerk webhook receiver for the community store.
//!
//! Organization events from Clerk are verified, parsed into typed events and
//! turned into community commands for the store that owns the database.
//!
//! ## Architecture
//!
//! ```text
//! Clerk (Svix) → Web Server → verify → ClerkEvent → dispatch → community_actions queue
//! ```

pub mod actions;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod web;

// Re-export commonly used types
pub use actions::{CommunityActions, CommunityCommand, NewCommunity, Publisher};
pub use config::Config;
pub use dispatch::{dispatch_event, Outcome};
pub use events::{ClerkEvent, EventKind};
pub use web::{router, AppState};

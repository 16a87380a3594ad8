//! Virtual piano keyboard: twelve sampled keys played from the mouse or the computer keyboard.
//!
//! [`instance::Piano`] ties the pieces together. Hosts hand it capabilities and an
//! [`engine::events::EventSource`]; it loads samples, subscribes once everything is ready, and
//! redraws after every change.

pub mod config;
pub mod input;
pub mod instance;
pub mod key;
pub mod layout;
pub mod loader;
pub mod notes;
pub mod render;
pub mod serde_color;
pub mod serde_duration;

pub use config::{ConfigStore, PianoConfig, Theme};
pub use instance::{CapabilityError, HostCapabilities, Piano, check_capabilities};
pub use notes::{Note, NoteRegistry};

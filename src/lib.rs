//! Hull Triage - ship hull inspection triage workflow
//!
//! Select a ship zone, upload a batch of inspection photos, and drill down
//! from damage categories to individual findings. Runs natively and in the
//! browser (WASM).

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod handlers;
pub mod logging;
pub mod message;
pub mod model;
pub mod state;

pub use config::TriageConfig;
pub use error::{CatalogError, TriageError};
pub use handlers::update;
pub use message::{Message, Navigation, Outcome};
pub use state::{TriageSession, TriageStage};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod wasm_file;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

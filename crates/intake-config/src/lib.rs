//! Intake Config
//!
//! This crate contains the serializable flow configuration types for intake.
//! A flow is an ordered list of wizard steps; each step carries a section
//! label, display text, an optional inclusion condition, and parameters
//! specific to its step type.
//!
//! Configuration is authored as JSON and loaded once per session:
//!
//! ```json
//! {
//!   "flow_id": "incubator",
//!   "name": "Incubator application",
//!   "steps": [
//!     {
//!       "id": "founder_profile",
//!       "section": "about_you",
//!       "type": "form",
//!       "title": "Tell us about yourself",
//!       "fields": [{ "path": "founder.email", "label": "Email", "input": "email", "required": true }]
//!     }
//!   ]
//! }
//! ```
//!
//! The engine takes these types, validates them, and derives the active step
//! sequence from them at runtime. Nothing in this crate evaluates conditions.

mod error;
mod flow;
mod params;
mod step;

pub use error::ConfigError;
pub use flow::FlowDef;
pub use params::{
  ConsentItem, EssayQuestion, FormField, InputKind, OptionChoice, ReviewSection, UploadSlot,
};
pub use step::{StepDef, StepKind};

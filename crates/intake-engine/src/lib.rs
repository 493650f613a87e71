//! Intake Engine
//!
//! This crate provides the application wizard engine for intake. A wizard is
//! driven entirely by a [`Flow`] (a validated flow configuration); no step
//! content is known to the engine ahead of time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Wizard                             │
//! │  - owns DomainState, cursor and submission status           │
//! │  - set_field / push_item / remove_item → re-resolve         │
//! │  - forward / back / jump_to                                 │
//! └─────────────────────────────────────────────────────────────┘
//!          │                     │                     │
//!          ▼                     ▼                     ▼
//! ┌─────────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │ resolver        │  │ gate / progress  │  │ navigation /     │
//! │ active steps    │  │ can_advance,     │  │ submission       │
//! │ from conditions │  │ section progress │  │ state machines   │
//! └─────────────────┘  └──────────────────┘  └──────────────────┘
//!                                                     │
//!                                                     ▼
//!                                       ┌──────────────────────────┐
//!                                       │ ApplicationStore         │
//!                                       │ (intake-store)           │
//!                                       └──────────────────────────┘
//! ```
//!
//! Every edit flows one way: the domain state is mutated, the active step
//! sequence is recomputed, the cursor is clamped against the new sequence, and
//! progress and validation are re-evaluated for the current step.
//!
//! # Usage
//!
//! ```ignore
//! use intake_engine::{Advance, Flow, Wizard};
//! use intake_store::InMemoryStore;
//!
//! let flow = Flow::from_json_str(&std::fs::read_to_string("flows/incubator.json")?)?;
//! let mut wizard = Wizard::new(flow, DomainState::new(), "user-1", InMemoryStore::new());
//!
//! wizard.set_field("founder.email", "ada@example.com")?;
//! match wizard.forward().await? {
//!   Advance::Moved { step_id, .. } => println!("now at {step_id}"),
//!   Advance::Blocked => println!("answer the required questions first"),
//!   Advance::Submitted(record) => println!("submitted {}", record.application_id),
//! }
//! ```

pub mod condition;
mod error;
mod events;
mod flow;
pub mod gate;
mod navigation;
pub mod progress;
pub mod resolver;
mod submission;
mod wizard;

pub use error::{FlowError, TransitionError, WizardError};
pub use events::{ChannelNotifier, NoopNotifier, WizardEvent, WizardNotifier};
pub use flow::Flow;
pub use gate::{Unmet, can_advance};
pub use navigation::{Forward, Navigator};
pub use progress::{GlobalProgress, global_progress, local_progress};
pub use resolver::resolve;
pub use submission::{SubmissionMachine, SubmissionStatus};
pub use wizard::{Advance, Wizard, WizardView, hydrate};

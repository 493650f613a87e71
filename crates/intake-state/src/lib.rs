//! Intake State
//!
//! Holds everything an applicant has entered as one nested JSON record and
//! addresses it by dot-separated paths (`"founder.email"`). Every other
//! intake crate reads and writes answers through this crate, so none of them
//! needs to know the shape of the record.
//!
//! Reads go arbitrarily deep (`co_founders.0.name` indexes into arrays).
//! Writes are limited to `domain.field` paths, which shallow-merge a field into
//! a top-level domain object and leave sibling domains untouched. Whole
//! collections are edited with [`DomainState::push_item`] and
//! [`DomainState::remove_item`].

mod error;
mod path;
mod state;
mod value;

pub use error::PathError;
pub use path::{lookup, split_field_path};
pub use state::DomainState;
pub use value::{is_blank, is_checked, text_len};

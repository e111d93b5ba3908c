//! Session engine for reviewing and labeling commits.
//!
//! The crate holds a batch of labelable samples ([`session`]), projects a
//! filtered view over it ([`view`]), tracks a cursor into that view ([`nav`]),
//! reads and writes JSONL datasets ([`codec`]) and snapshots the session into
//! a local key-value store ([`db`], [`persist`]). [`studio::Studio`] wires the
//! pieces together behind the callbacks a front end calls.

pub mod codec;
pub mod db;
pub mod error;
pub mod nav;
pub mod persist;
pub mod schema;
pub mod session;
pub mod studio;
pub mod types;
pub mod view;

pub use error::StudioError;
pub use session::Session;
pub use studio::{Export, Presentation, Studio};
pub use types::{Commit, LabelOption, Metadata, Modification, Sample};
pub use view::{Filter, VisibleSample};

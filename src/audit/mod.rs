//! History of committed group changes
//!
//! Every add, edit and removal appends a [`GroupChange`] to a JSONL
//! journal next to the group file. Entries record slot-level serial
//! changes and the ids other groups moved to when the file was renumbered.
//!
//! # Example
//!
//! ```rust,ignore
//! use storage_groups::audit::{ChangeJournal, GroupChange};
//!
//! let journal = ChangeJournal::new(paths.audit_log());
//! journal.append(&[GroupChange::added(id, &group)])?;
//! for change in journal.recent(20)? {
//!     println!("{}", change.describe());
//! }
//! ```

mod change;
mod journal;

pub use change::{ChangeKind, GroupChange, Renumbered, SlotChange};
pub use journal::ChangeJournal;

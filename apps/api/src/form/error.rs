use thiserror::Error;

use crate::form::entry::EntryId;
use crate::form::section::SectionKind;

/// Failures of a single form operation. A failed call leaves the form untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("No {kind} entry with id {id}")]
    NotFound { kind: SectionKind, id: EntryId },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The most recent entry of `kind` is still blank; `id` names it so the
    /// caller can point the user at it.
    #[error("{kind} entry {id} is still empty; fill it in before adding another")]
    RejectedEmptyAdd { kind: SectionKind, id: EntryId },
}

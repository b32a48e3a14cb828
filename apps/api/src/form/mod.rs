// Form core: entry registry, derived duration, collection assembler.
// Everything under here is synchronous and owns no I/O; the HTTP layer lives in
// `handlers` and talks to it through `FormState`.

pub mod assembler;
pub mod duration;
pub mod entry;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod personal;
pub mod preview;
pub mod registry;
pub mod section;

pub use assembler::ResumeDocument;
pub use entry::{Entry, EntryId};
pub use error::FormError;
pub use registry::{FormEvent, FormState};
pub use section::SectionKind;

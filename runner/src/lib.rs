pub mod compile;
pub mod document;
pub mod error;
pub mod host;
pub mod stage;
pub mod transcript;

pub use compile::{Options, compile_document};
pub use error::{DiagnosticError, DocumentError, RunError};
pub use host::{Host, Output, SystemHost};
pub use stage::BuildFailurePolicy;
pub use transcript::ListingStyle;

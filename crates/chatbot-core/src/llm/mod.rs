mod traits;
mod openai;
pub mod backend;
pub mod probe;

pub use traits::*;
pub use openai::OpenAIClient;
pub use backend::{BackendDescriptor, BackendKind};
pub use probe::{BackendProbe, ProbePolicy};

//! The interview engine: live sessions, the registry that owns them, the
//! grade codec, and the batch feedback processor.

pub mod feedback;
pub mod grades;
pub mod handlers;
pub mod personas;
pub mod prompts;
pub mod registry;
pub mod session;

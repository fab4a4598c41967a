// Curio - Command Layer
// Transport-agnostic operations organized by domain. The CLI calls these
// directly; an HTTP gateway would call the same functions and translate
// CurioError::status_code() into response codes. The owner id is always an
// explicit argument resolved upstream, never ambient state.

pub mod dashboard;
pub mod export;
pub mod items;
pub mod templates;

pub use dashboard::*;
pub use export::*;
pub use items::*;
pub use templates::*;

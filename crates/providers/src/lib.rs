pub mod google;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use google::GeminiEndpoint;
pub use traits::{GenerateRequest, GenerateResponse, RemoteEndpoint, Usage, WireRole, WireTurn};
pub use util::resolve_api_key;

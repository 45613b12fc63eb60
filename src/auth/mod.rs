pub mod clock;
pub mod error;
pub mod gate;
pub mod layer;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AuthError, DenyReason, ErrorBody, ErrorResponse};
pub use gate::{extract_token, Grant, TokenGate, BEARER_PREFIX};
pub use layer::require_infra_token;
pub use store::{InMemoryTokenStore, StoredToken, TokenStore};

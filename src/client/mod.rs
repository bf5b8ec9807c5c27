//! Client-side session handling: token store, expiry check, navigation guard,
//! identity provider login and the API client that carries the token.

pub mod api;
pub mod identity;
pub mod session;
pub mod store;
pub mod token;

pub use api::{ApiClient, ApiError};
pub use identity::{Credentials, HttpIdentityProvider, IdentityProvider, LoginError, LoginSuccess};
pub use session::{AuthState, GuardOutcome, Session, SessionError, LANDING_ROUTE};
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, StoreKey, TokenStore};
pub use token::is_token_expired;

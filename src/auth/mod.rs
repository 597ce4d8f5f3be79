pub mod credentials;
pub mod identity;
pub mod session;

pub use credentials::SessionCredentials;
pub use identity::{
    AuthError, FirebaseIdentity, Identity, IdentityProvider, ProviderCredential, SharedIdentity, StaticIdentity,
};
pub use session::{RevokedSessions, SessionClaims};

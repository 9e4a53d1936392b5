//! Authentication types for the install handshake.
//!
//! - [`AuthScopes`]: the access scopes requested on the authorize URL
//! - [`oauth`]: the authorization code grant, from redirect to shop profile

pub mod oauth;
mod scopes;

pub use scopes::AuthScopes;

//! Broadcaster credentials: the in-memory token store, token introspection,
//! the authorization-code bootstrap and the refresh-once Helix fetch.

pub mod fetch;
pub mod oauth;
pub mod store;
pub mod validate;

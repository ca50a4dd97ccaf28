//! Session synchronization between the local cache, the identity provider,
//! and the profile table.

mod state;
mod synchronizer;

pub use state::{ProfileState, SessionState};
pub use synchronizer::{HOME_ROUTE, SessionPorts, SessionSynchronizer};

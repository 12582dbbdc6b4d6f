//! Request cache and dispatcher sitting between consumers and providers.

pub mod client;
pub mod key;
pub mod observer;
pub mod state;

pub use client::{DEFAULT_STALE_TIME, QueryClient, Subscription};
pub use key::QueryKey;
pub use observer::QueryObserver;
pub use state::{QueryState, QueryStatus};

use std::sync::Arc;

use showfinder_core::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Disabled, or nothing requested yet.
    Idle,
    Loading,
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a subscriber sees for one key.
///
/// `data` may be present while loading (stale value being revalidated) or
/// after an error (last good value).
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<ProviderError>,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn loading(stale: Option<Arc<T>>) -> Self {
        Self {
            status: QueryStatus::Loading,
            data: stale,
            error: None,
        }
    }

    pub fn success(data: Arc<T>) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: ProviderError, last_good: Option<Arc<T>>) -> Self {
        Self {
            status: QueryStatus::Error,
            data: last_good,
            error: Some(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }
}

use std::sync::Arc;

use clapper_db::store::ScheduleStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Schedule persistence. Postgres in production, in-memory in tests.
    pub store: Arc<dyn ScheduleStore>,
}

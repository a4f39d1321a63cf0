/// Resolve-or-render batch orchestration.
pub mod batch;

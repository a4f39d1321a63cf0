/// Product records and render targets.
pub mod model;
/// Product repositories and catalogue-item cleanup.
pub mod repository;

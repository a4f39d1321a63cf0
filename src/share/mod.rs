//! Share actions: handle resolution with fallbacks, failure reports, share-sheet flow.

/// Render-then-share flow.
pub mod flow;
/// Aggregated "nothing to share" report.
pub mod report;
/// Ordered resolution strategies.
pub mod resolver;

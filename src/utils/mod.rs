// Shared helpers
pub mod format;

pub use format::format_mb;

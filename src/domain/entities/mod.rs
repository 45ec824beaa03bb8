//! Domain entities.

pub mod access_log;
pub mod short_link;

pub use access_log::AccessLog;
pub use short_link::ShortLink;

//! Application services.

pub mod analytics_service;
pub mod shortener_service;

pub use analytics_service::AnalyticsService;
pub use shortener_service::{
    CreateShortLinkResponse, GetOriginalUrlResponse, ShortLinkService, ShortLinkSettings,
};

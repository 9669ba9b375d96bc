//! HTTP protocol layer module
//!
//! Response builders and cache/content-type helpers shared by the page,
//! asset and contact handlers.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_asset_response, build_health_response, build_html_response, build_options_response,
    json_response, with_cors,
};

pub mod http;
pub mod url;
pub mod yaml;

// Re-export common utilities
pub use http::{web_get, web_get_async, HttpResponse};
pub use url::desensitize_url;
pub use yaml::{deep_merge, get_key};

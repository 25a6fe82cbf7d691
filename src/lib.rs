pub mod cache;
pub mod cli;
pub mod error;
pub mod helper;
pub mod http;
pub mod logging;
pub mod resource;
pub mod retry;
pub mod savant;
pub mod scripts;
pub mod settings;
pub mod tracker;
pub mod urls;

// Re-export commonly used items for easier access
pub use cache::ResponseCache;
pub use error::{AppError, LoadError};
pub use http::JsonClient;
pub use resource::{AsyncResource, KeyedResource, ResourceOptions, ResourceState};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use settings::Settings;
pub use urls::AssetUrls;

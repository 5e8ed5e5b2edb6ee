//! HTTP request handlers for API endpoints.

pub mod ping;
pub mod redirect;
pub mod shorten;
pub mod user_urls;

pub use ping::ping_handler;
pub use redirect::redirect_handler;
pub use shorten::{shorten_batch_handler, shorten_json_handler, shorten_text_handler};
pub use user_urls::user_urls_handler;

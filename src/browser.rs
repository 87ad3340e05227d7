//! The reusable list-browsing machinery shared by every screen.

mod debounce;
mod engine;
mod fetcher;
mod intent;
mod line_input;
mod nav;
mod query;
mod window;

pub use debounce::Debounce;
pub use engine::{
    BrowsableResource, FilterMode, Handled, LoadFuture, LoadRequest, Loader, ResourceBrowser,
};
pub use fetcher::{FetchMode, Fetched, Page, collect_pages, fetch_all};
pub use intent::Intent;
pub use line_input::LineInput;
pub use nav::{NavAction, Navigator};
pub use query::{QueryKey, QueryRunner, QueryStatus};
pub use window::ListWindow;

pub mod config;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::PagewinError;
pub use logging::{LoadLog, LoadLogEntry, Loggable};
pub use pagination::{IndexPolicy, PageControl, PageWindow, PageWindowController};
pub use result::PagewinResult;
pub use traits::{ItemSource, LoadRequest, Loader, LoaderFn};

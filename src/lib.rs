pub mod cli;
pub mod config;
pub mod datetime;
pub mod error;
pub mod highlight;
pub mod paths;
pub mod records;
pub mod store;
pub mod timing;
pub mod value;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use datetime::{format_time, format_time_in};
pub use error::{MalformedInputError, ParseError, SchedulerError};
pub use highlight::{keywords, HighlightMarker, Highlighter};
pub use paths::PathNormalizer;
pub use store::ViewStore;
pub use timing::{Debouncer, ImageRetryLoader, ImageTarget, RetryOutcome, RetryPolicy};
pub use value::{deep_clone, deep_clone_with, set_id, with_ids, Identified, PlainValue};

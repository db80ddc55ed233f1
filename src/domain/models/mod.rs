pub mod format;
pub mod options;
pub mod report;
pub mod source;

pub use format::ConfigFormat;
pub use options::{
    BootstrapOptions, MergePolicy, OptionOverrides, RemoteDescriptor, RemoteSettings,
    RetryStrategy, DEFAULT_ENV_FILE, DEFAULT_FILENAME, DEFAULT_SEARCH_DIRS, DEFAULT_TYPE,
};
pub use report::{SourceReport, SourceStatus};
pub use source::Source;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No URL source provided. Use --url or --urls-file.")]
    MissingUrlSource,
    #[error("A request limit or a duration must be provided.")]
    MissingStopCondition,
    #[error("Only one of [requests|duration] may be provided.")]
    ConflictingStopConditions,
    #[error("Failed to read URL file '{path}': {source}")]
    ReadUrlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("URL file '{path}' was empty.")]
    UrlFileEmpty { path: PathBuf },
    #[error("Failed to read body file '{path}': {source}")]
    ReadBodyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported scheme '{scheme}' in '{url}'. Only http is supported.")]
    UnsupportedScheme { scheme: String, url: String },
    #[error("URL '{url}' has no host.")]
    MissingHost { url: String },
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed options near '{pair}' -- expected a comma-separated list of key=value pairs")]
    MalformedOption { pair: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot open report output {}: {source}", path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("exit without matching enter for {key} -- enter/exit hook injection is unbalanced")]
    UnmatchedExit { key: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

mod get_confluence;
mod ingest_signal;

pub use get_confluence::{ConfluenceError, GetConfluenceQuery, GetConfluenceUseCase};
pub use ingest_signal::{
    IngestError, IngestSignalCommand, IngestSignalResult, IngestSignalUseCase, build_record,
};

pub mod ports;
pub mod use_cases;

pub use ports::{Clock, SignalRepository, StoreError, StoreResult};
pub use use_cases::{
    ConfluenceError, GetConfluenceQuery, GetConfluenceUseCase, IngestError, IngestSignalCommand,
    IngestSignalResult, IngestSignalUseCase, build_record,
};

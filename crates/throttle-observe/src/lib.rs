mod logger;
pub use logger::*;

#[cfg(feature = "reporter")]
mod reporter;

#[cfg(feature = "reporter")]
pub use reporter::LogReporter;

mod error;
pub use error::ExecError;

#[cfg(feature = "subprocess")]
pub mod subprocess;

#[cfg(feature = "subprocess")]
pub use subprocess::{LogConfig, ProcessExit, SubprocessTask};

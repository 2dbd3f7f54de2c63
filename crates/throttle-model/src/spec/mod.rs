mod runner;
pub use runner::RunnerSpec;

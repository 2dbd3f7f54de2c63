mod failure;
pub use failure::FailurePolicy;

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex digits, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid seed: {_0:?} is not a hex digit")]
    InvalidDigit(#[error(not(source))] char),
}

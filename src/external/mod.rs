pub mod operator;
pub mod pts;

pub use operator::*;
pub use pts::*;

#[cfg(test)]
pub(crate) use operator::testing;

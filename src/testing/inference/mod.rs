//! Statistical inference used to score network candidates.

pub mod discrete;

pub use discrete::{connectivity_p_value, hypergeometric_tail, hypergeometric_test};

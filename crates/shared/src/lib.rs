//! Wire contract shared between the prediction client and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;

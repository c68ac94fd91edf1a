//! Tool implementations for dealscout.

pub mod price_compare;

//! Plain data types, re-exported from `placertypes` so the rest of the crate has one import.

pub use placertypes::*;

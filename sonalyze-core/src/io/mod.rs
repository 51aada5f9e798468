//! Sample-container decode/encode.

pub mod wav;

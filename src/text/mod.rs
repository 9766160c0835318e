//! String algorithms over task and category names.

pub mod huffman;
pub mod similarity;

pub use huffman::*;
pub use similarity::*;

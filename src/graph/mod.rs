//! Graph algorithms over task data: network construction, Prim's MST,
//! max flow and category traversal.

pub mod builder;
pub mod flow;
pub mod mst;
pub mod traversal;

pub use builder::*;
pub use flow::*;
pub use mst::*;
pub use traversal::*;

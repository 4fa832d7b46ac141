//! Greedy rectangle merging.
//!
//! Combines adjacent exposed faces with identical descriptors into larger
//! quads, significantly reducing triangle count.
//!
//! All six directions share one implementation: each slice mask is scanned
//! row-major over `(v, u)`, width extends along `u` first, then height
//! along `v`. See [`crate::core::Axis::plane`] for the per-axis `(u, v)`
//! mapping.

mod pass;
mod rect;

pub use pass::greedy_merge_face;
pub use rect::greedy_merge_slice;

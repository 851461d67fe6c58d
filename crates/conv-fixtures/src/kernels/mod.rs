//! Scalar reference kernels the fixtures are computed with.
//!
//! Each kernel is the ground truth the lowered convolutions are compared
//! against, so they favor plain loops over speed.

// Kernel code naturally uses single-character index names (n, h, w, k).
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]

pub mod activation;
pub mod conv2d;

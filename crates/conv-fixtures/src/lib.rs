//! # conv-fixtures
//!
//! Test fixtures for convolution lowering.
//!
//! Runs a two-layer convolution (`conv2d → relu → conv2d → relu`) for
//! every combination of a parameter sweep and writes the random inputs,
//! both kernels, the expected outputs and the matching IR module dumps
//! into one C++ header.
//!
//! ## Modules
//!
//! - [`schema`] - Parse and validate YAML sweep plans
//! - [`sweep`] - Enumerate the combinations of a plan
//! - [`kernels`] - Scalar reference `conv2d` and `ReLU`
//! - [`capture`] - Run one combination and keep its arrays
//! - [`dumps`] - Locate, read and clean up IR module dumps
//! - [`emit`] - Render captured cases as C++ declarations
//! - [`generate`] - End-to-end generation to disk

pub mod capture;
pub mod dumps;
pub mod emit;
pub mod error;
pub mod generate;
pub mod kernels;
pub mod schema;
pub mod sweep;

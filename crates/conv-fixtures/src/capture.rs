//! Computation and capture: runs the two-layer convolution for one
//! combination and keeps every array the header needs.
//!
//! `C1 = relu(conv2d(I, K1))`, `C2 = relu(conv2d(C1, K2))`, with `K2`
//! shaped like `K1` with its last two axes swapped and both layers using
//! the combination's stride, padding and dilation.

use log::debug;
use ndarray::Array4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::FixtureError;
use crate::kernels::activation::relu_inplace;
use crate::kernels::conv2d::{Conv2dParams, conv2d};
use crate::sweep::Combination;

/// Everything captured for one combination.
#[derive(Debug, Clone)]
pub struct CaseCapture {
    pub combination: Combination,
    /// Seed the three random arrays were drawn with.
    pub seed: u64,
    pub input: Array4<f32>,
    pub kernel1: Array4<f32>,
    pub kernel2: Array4<f32>,
    pub output: Array4<f32>,
    pub module_text: String,
}

/// Seed for combination `index` under `base`.
pub fn case_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add(index as u64)
}

/// Array of `shape` filled with independent uniform values in `[0, 1)`.
///
/// # Errors
///
/// Returns [`FixtureError::Shape`] if `shape` is not rank 4.
pub fn random_tensor(shape: &[usize], rng: &mut StdRng) -> Result<Array4<f32>, FixtureError> {
    let dims = <[usize; 4]>::try_from(shape)
        .map_err(|_| FixtureError::Shape(format!("expected rank 4, got {shape:?}")))?;
    Ok(Array4::from_shape_simple_fn(dims, || rng.random::<f32>()))
}

/// Two chained convolutions, each followed by `ReLU`.
///
/// # Errors
///
/// Propagates shape errors from either layer.
pub fn two_layer_forward(
    input: &Array4<f32>,
    kernel1: &Array4<f32>,
    kernel2: &Array4<f32>,
    params: &Conv2dParams,
) -> Result<Array4<f32>, FixtureError> {
    let mut hidden = conv2d(input, kernel1, params)?;
    relu_inplace(&mut hidden);
    let mut output = conv2d(&hidden, kernel2, params)?;
    relu_inplace(&mut output);
    Ok(output)
}

/// Draw the random arrays for `combination`, run both layers and pair the
/// result with the combination's module text.
///
/// The input, first kernel and second kernel are drawn in that order
/// from one generator seeded with `seed`.
///
/// # Errors
///
/// Returns [`FixtureError::Shape`] if the combination is ill-formed.
pub fn capture_case(
    combination: &Combination,
    seed: u64,
    module_text: String,
) -> Result<CaseCapture, FixtureError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let input = random_tensor(&combination.input_shape, &mut rng)?;
    let kernel1 = random_tensor(&combination.kernel_shape, &mut rng)?;
    let kernel2 = random_tensor(&combination.kernel2_shape(), &mut rng)?;

    let output = two_layer_forward(&input, &kernel1, &kernel2, &combination.params())?;
    debug!(
        "captured {combination} (seed {seed}) -> output {:?}",
        output.shape()
    );

    Ok(CaseCapture {
        combination: combination.clone(),
        seed,
        input,
        kernel1,
        kernel2,
        output,
        module_text,
    })
}

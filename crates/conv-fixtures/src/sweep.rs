//! Parameter enumeration: the cartesian product of a [`SweepPlan`].
//!
//! Combinations come out in odometer order (the dilation list varies
//! fastest, the input-shape list slowest). The position in that order is
//! the combination index, which is also the index embedded in the name of
//! the combination's IR dump file.

use serde::Serialize;

use crate::error::FixtureError;
use crate::kernels::conv2d::{Conv2dParams, conv2d_output_shape, swap_last_two};
use crate::schema::{Padding, SweepPlan};

/// One point of the sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combination {
    pub index: usize,
    pub input_shape: Vec<usize>,
    pub kernel_shape: Vec<usize>,
    pub stride: [usize; 2],
    pub padding: Padding,
    pub dilation: [usize; 2],
}

impl Combination {
    /// Stride, padding and dilation shared by both layers.
    pub fn params(&self) -> Conv2dParams {
        Conv2dParams {
            stride: self.stride,
            padding: self.padding,
            dilation: self.dilation,
        }
    }

    /// Shape of the second-layer kernel.
    pub fn kernel2_shape(&self) -> Vec<usize> {
        swap_last_two(&self.kernel_shape)
    }

    /// Shapes of every array the two-layer computation touches.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Shape`] if either layer is ill-formed.
    pub fn shapes(&self) -> Result<CaseShapes, FixtureError> {
        let params = self.params();
        let kernel2 = self.kernel2_shape();
        let hidden = conv2d_output_shape(&self.input_shape, &self.kernel_shape, &params)?;
        let output = conv2d_output_shape(&hidden, &kernel2, &params)?;
        Ok(CaseShapes {
            input: self.input_shape.clone(),
            kernel1: self.kernel_shape.clone(),
            hidden: hidden.to_vec(),
            kernel2,
            output: output.to_vec(),
        })
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:04} input={:?} kernel={:?} stride={:?} padding={} dilation={:?}",
            self.index, self.input_shape, self.kernel_shape, self.stride, self.padding, self.dilation
        )
    }
}

/// Shapes of one combination's arrays, first layer output included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseShapes {
    pub input: Vec<usize>,
    pub kernel1: Vec<usize>,
    pub hidden: Vec<usize>,
    pub kernel2: Vec<usize>,
    pub output: Vec<usize>,
}

impl CaseShapes {
    /// Number of values serialized into the header for this combination,
    /// saturating at `usize::MAX`.
    pub fn serialized_elements(&self) -> usize {
        [&self.input, &self.kernel1, &self.kernel2, &self.output]
            .iter()
            .map(|s| s.iter().fold(1usize, |acc, &d| acc.saturating_mul(d)))
            .fold(0usize, usize::saturating_add)
    }
}

/// Lazy, single-pass iterator over a plan's combinations.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    plan: &'a SweepPlan,
    cursor: [usize; 5],
    index: usize,
    total: usize,
}

/// Enumerate the cartesian product of `plan`'s option lists.
pub fn enumerate_combinations(plan: &SweepPlan) -> Combinations<'_> {
    Combinations {
        plan,
        cursor: [0; 5],
        index: 0,
        total: plan.combination_count(),
    }
}

impl Combinations<'_> {
    fn lens(&self) -> [usize; 5] {
        [
            self.plan.input_shapes.len(),
            self.plan.kernel_shapes.len(),
            self.plan.strides.len(),
            self.plan.paddings.len(),
            self.plan.dilations.len(),
        ]
    }

    fn advance(&mut self) {
        let lens = self.lens();
        for axis in (0..5).rev() {
            self.cursor[axis] += 1;
            if self.cursor[axis] < lens[axis] {
                return;
            }
            self.cursor[axis] = 0;
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.index >= self.total {
            return None;
        }
        let [i, k, s, p, d] = self.cursor;
        let combination = Combination {
            index: self.index,
            input_shape: self.plan.input_shapes[i].clone(),
            kernel_shape: self.plan.kernel_shapes[k].clone(),
            stride: self.plan.strides[s],
            padding: self.plan.paddings[p],
            dilation: self.plan.dilations[d],
        };
        self.index += 1;
        self.advance();
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Combinations<'_> {}

//! 2D convolution kernel.
//!
//! Input layout: NHWC. Kernel layout: HWIO (`[kh, kw, c_in, c_out]`).
//! Output layout: NHWC with `c_out` channels.
//!
//! Padding follows the framework the fixtures are checked against:
//! `VALID`, `SAME` (smaller half before) or explicit per-axis padding.

use ndarray::{Array1, Array4, s};

use crate::error::FixtureError;
use crate::schema::Padding;

/// Stride, padding and dilation of one convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conv2dParams {
    pub stride: [usize; 2],
    pub padding: Padding,
    pub dilation: [usize; 2],
}

/// Output extent and leading padding along one spatial axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisGeometry {
    pub out: usize,
    pub pad_before: usize,
}

/// Resolve one spatial axis: `input` extent, `kernel` extent, stride,
/// dilation and the explicit `[before, after]` padding when there is one.
///
/// # Errors
///
/// Returns [`FixtureError::Shape`] for a zero stride or dilation, when
/// the dilated window does not fit the (padded) input, or when an extent
/// does not fit in `usize`.
pub fn resolve_axis(
    input: usize,
    kernel: usize,
    stride: usize,
    dilation: usize,
    padding: &Padding,
    explicit: Option<[usize; 2]>,
) -> Result<AxisGeometry, FixtureError> {
    if stride == 0 || dilation == 0 {
        return Err(FixtureError::Shape(format!(
            "stride ({stride}) and dilation ({dilation}) must be > 0"
        )));
    }
    if kernel == 0 {
        return Err(FixtureError::Shape("kernel extent must be > 0".to_string()));
    }
    let overflow = || {
        FixtureError::Shape(format!(
            "axis extent overflows: input {input}, kernel {kernel}, \
             stride {stride}, dilation {dilation}"
        ))
    };
    let eff_k = (kernel - 1)
        .checked_mul(dilation)
        .and_then(|k| k.checked_add(1))
        .ok_or_else(overflow)?;

    let (padded, pad_before) = match padding {
        Padding::Valid => (input, 0),
        Padding::Same => {
            let out = input.div_ceil(stride);
            let total = ((out.saturating_sub(1)) * stride)
                .checked_add(eff_k)
                .ok_or_else(overflow)?
                .saturating_sub(input);
            return Ok(AxisGeometry {
                out,
                pad_before: total / 2,
            });
        }
        Padding::Explicit(_) => {
            let [before, after] = explicit.unwrap_or([0, 0]);
            let padded = input
                .checked_add(before)
                .and_then(|p| p.checked_add(after))
                .ok_or_else(overflow)?;
            (padded, before)
        }
    };

    if eff_k > padded {
        return Err(FixtureError::Shape(format!(
            "dilated kernel extent {eff_k} exceeds padded input extent {padded}"
        )));
    }
    Ok(AxisGeometry {
        out: (padded - eff_k) / stride + 1,
        pad_before,
    })
}

/// Output shape of `conv2d(input, kernel)`.
///
/// # Errors
///
/// Returns [`FixtureError::Shape`] if either shape is not rank 4, the
/// channel counts disagree, or a spatial axis resolves to nothing.
pub fn conv2d_output_shape(
    input: &[usize],
    kernel: &[usize],
    params: &Conv2dParams,
) -> Result<[usize; 4], FixtureError> {
    let [n, h, w, c_in] = rank4(input, "input")?;
    let [kh, kw, k_in, c_out] = rank4(kernel, "kernel")?;
    if c_in != k_in {
        return Err(FixtureError::Shape(format!(
            "input has {c_in} channels but kernel expects {k_in}"
        )));
    }
    let (rows, cols) = spatial_geometry([h, w], [kh, kw], params)?;
    Ok([n, rows.out, cols.out, c_out])
}

/// Kernel shape of the second layer: the first kernel's shape with its
/// last two axes swapped, so `[kh, kw, c_in, c_out]` becomes
/// `[kh, kw, c_out, c_in]`.
pub fn swap_last_two(shape: &[usize]) -> Vec<usize> {
    let mut out = shape.to_vec();
    let n = out.len();
    if n >= 2 {
        out.swap(n - 2, n - 1);
    }
    out
}

/// Scalar reference 2D convolution (no bias).
///
/// # Errors
///
/// Returns [`FixtureError::Shape`] under the same conditions as
/// [`conv2d_output_shape`].
pub fn conv2d(
    input: &Array4<f32>,
    kernel: &Array4<f32>,
    params: &Conv2dParams,
) -> Result<Array4<f32>, FixtureError> {
    let out_shape = conv2d_output_shape(input.shape(), kernel.shape(), params)?;
    let (_, h, w, c_in) = input.dim();
    let (kh, kw, _, c_out) = kernel.dim();
    let (rows, cols) = spatial_geometry([h, w], [kh, kw], params)?;
    let [sh, sw] = params.stride;
    let [dh, dw] = params.dilation;

    let mut output = Array4::<f32>::zeros(out_shape);
    let mut acc = Array1::<f32>::zeros(c_out);

    for n in 0..out_shape[0] {
        for oh in 0..rows.out {
            for ow in 0..cols.out {
                acc.fill(0.0);
                for ki in 0..kh {
                    let Some(ih) = tap(oh, sh, ki, dh, rows.pad_before, h) else {
                        continue;
                    };
                    for kj in 0..kw {
                        let Some(iw) = tap(ow, sw, kj, dw, cols.pad_before, w) else {
                            continue;
                        };
                        for ic in 0..c_in {
                            let x = input[[n, ih, iw, ic]];
                            acc.scaled_add(x, &kernel.slice(s![ki, kj, ic, ..]));
                        }
                    }
                }
                output.slice_mut(s![n, oh, ow, ..]).assign(&acc);
            }
        }
    }
    Ok(output)
}

/// Input coordinate read by output position `o` through kernel tap `k`,
/// or `None` when it lands in the padding.
fn tap(o: usize, stride: usize, k: usize, dilation: usize, pad: usize, extent: usize) -> Option<usize> {
    (o * stride + k * dilation)
        .checked_sub(pad)
        .filter(|&i| i < extent)
}

fn spatial_geometry(
    input: [usize; 2],
    kernel: [usize; 2],
    params: &Conv2dParams,
) -> Result<(AxisGeometry, AxisGeometry), FixtureError> {
    let explicit = params.padding.explicit_spatial();
    let rows = resolve_axis(
        input[0],
        kernel[0],
        params.stride[0],
        params.dilation[0],
        &params.padding,
        explicit.map(|(hp, _)| hp),
    )?;
    let cols = resolve_axis(
        input[1],
        kernel[1],
        params.stride[1],
        params.dilation[1],
        &params.padding,
        explicit.map(|(_, wp)| wp),
    )?;
    Ok((rows, cols))
}

fn rank4(shape: &[usize], what: &str) -> Result<[usize; 4], FixtureError> {
    <[usize; 4]>::try_from(shape).map_err(|_| {
        FixtureError::Shape(format!("{what} must be rank 4, got {shape:?}"))
    })
}

use serde::{Deserialize, Serialize};

/// A sweep plan: independent option lists whose cartesian product is the
/// set of combinations a fixture header covers.
///
/// Shapes are NHWC for inputs and HWIO for kernels. Strides and
/// dilations are `[height, width]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub input_shapes: Vec<Vec<usize>>,
    pub kernel_shapes: Vec<Vec<usize>>,
    #[serde(default = "unit_pairs")]
    pub strides: Vec<[usize; 2]>,
    #[serde(default = "valid_only")]
    pub paddings: Vec<Padding>,
    #[serde(default = "unit_pairs")]
    pub dilations: Vec<[usize; 2]>,
    /// Base seed for the random inputs. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn unit_pairs() -> Vec<[usize; 2]> {
    vec![[1, 1]]
}

fn valid_only() -> Vec<Padding> {
    vec![Padding::Valid]
}

impl SweepPlan {
    /// The plan the PlaidML conv lowering tests were generated from: a
    /// 224x224 RGB image through a 7x7x3x64 kernel with two pixels of
    /// explicit spatial padding.
    pub fn builtin() -> Self {
        Self {
            input_shapes: vec![vec![1, 224, 224, 3]],
            kernel_shapes: vec![vec![7, 7, 3, 64]],
            strides: vec![[1, 1]],
            paddings: vec![Padding::Explicit([[0, 0], [2, 2], [2, 2], [0, 0]])],
            dilations: vec![[1, 1]],
            seed: None,
        }
    }

    /// Number of combinations the plan enumerates, saturating at
    /// `usize::MAX`.
    pub fn combination_count(&self) -> usize {
        [
            self.input_shapes.len(),
            self.kernel_shapes.len(),
            self.strides.len(),
            self.paddings.len(),
            self.dilations.len(),
        ]
        .into_iter()
        .fold(1, usize::saturating_mul)
    }
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Convolution padding, in the framework's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PaddingRepr", into = "PaddingRepr")]
pub enum Padding {
    /// No padding; windows that do not fit are dropped.
    Valid,
    /// Pad so that `out = ceil(in / stride)`, smaller half first.
    Same,
    /// Per-axis `[before, after]` for N, H, W, C. N and C must be zero.
    Explicit([[usize; 2]; 4]),
}

impl Padding {
    /// The `[before, after]` padding for the height and width axes, if explicit.
    pub fn explicit_spatial(&self) -> Option<([usize; 2], [usize; 2])> {
        match self {
            Self::Explicit(p) => Some((p[1], p[2])),
            Self::Valid | Self::Same => None,
        }
    }
}

impl std::fmt::Display for Padding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::Same => write!(f, "SAME"),
            Self::Explicit(p) => write!(
                f,
                "[[{}, {}], [{}, {}], [{}, {}], [{}, {}]]",
                p[0][0], p[0][1], p[1][0], p[1][1], p[2][0], p[2][1], p[3][0], p[3][1]
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PaddingMode {
    Valid,
    Same,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum PaddingRepr {
    Mode(PaddingMode),
    Explicit { explicit: [[usize; 2]; 4] },
}

impl From<PaddingRepr> for Padding {
    fn from(repr: PaddingRepr) -> Self {
        match repr {
            PaddingRepr::Mode(PaddingMode::Valid) => Self::Valid,
            PaddingRepr::Mode(PaddingMode::Same) => Self::Same,
            PaddingRepr::Explicit { explicit } => Self::Explicit(explicit),
        }
    }
}

impl From<Padding> for PaddingRepr {
    fn from(p: Padding) -> Self {
        match p {
            Padding::Valid => Self::Mode(PaddingMode::Valid),
            Padding::Same => Self::Mode(PaddingMode::Same),
            Padding::Explicit(explicit) => Self::Explicit { explicit },
        }
    }
}

//! Rectified-linear activation.

use ndarray::{ArrayBase, DataMut, Dimension};

/// `max(x, 0)`. Negative zero maps to positive zero.
pub fn relu(x: f32) -> f32 {
    if x > 0.0 { x } else { 0.0 }
}

/// [`relu`] applied in place to every element of an array of any rank.
pub fn relu_inplace<S, D>(array: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f32>,
    D: Dimension,
{
    array.mapv_inplace(relu);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array4, s};
    use proptest::prelude::*;

    #[test]
    fn test_relu_negative_to_zero() {
        let mut a = Array1::from(vec![-3.0f32, -1.0, -0.5, -1e-6]);
        relu_inplace(&mut a);
        assert!(a.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_relu_positive_identity() {
        let data = vec![0.5f32, 1.0, 3.0, 100.0];
        let mut a = Array1::from(data.clone());
        relu_inplace(&mut a);
        assert_eq!(a.to_vec(), data);
    }

    #[test]
    fn test_relu_negative_zero_is_positive() {
        assert!(relu(-0.0).is_sign_positive());
    }

    #[test]
    fn test_relu_inplace_any_rank() {
        let mut a = Array2::from_shape_vec((2, 3), vec![-2.0f32, -0.0, 0.0, 0.25, 7.0, -9.5]).unwrap();
        relu_inplace(&mut a);
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 0.25, 7.0, 0.0]);
    }

    #[test]
    fn test_relu_inplace_on_view_leaves_rest() {
        let mut a = Array4::<f32>::from_elem((1, 2, 2, 1), -1.0);
        relu_inplace(&mut a.slice_mut(s![.., 0, .., ..]));
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, -1.0, -1.0]);
    }

    proptest! {
        #[test]
        fn prop_relu_nonnegative(xs in proptest::collection::vec(proptest::num::f32::NORMAL, 1..32)) {
            let mut a = Array1::from(xs);
            relu_inplace(&mut a);
            prop_assert!(a.iter().all(|&y| y >= 0.0));
        }

        #[test]
        fn prop_relu_idempotent(xs in proptest::collection::vec(-1e3f32..1e3, 1..32)) {
            let mut once = Array1::from(xs);
            relu_inplace(&mut once);
            let mut twice = once.clone();
            relu_inplace(&mut twice);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_relu_keeps_positive_values(xs in proptest::collection::vec(-1e3f32..1e3, 1..32)) {
            let mut a = Array1::from(xs.clone());
            relu_inplace(&mut a);
            for (x, y) in xs.iter().zip(a.iter()) {
                if *x > 0.0 {
                    prop_assert_eq!(x, y);
                }
            }
        }
    }
}

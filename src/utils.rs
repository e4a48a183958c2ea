//! Interop with interleaved [`Complex`] buffers.

use bytemuck::cast_slice;
use num_complex::Complex;
use num_traits::Float;

/// Separates data like `[1, 2, 3, 4]` into `([1, 3], [2, 4])` for any length.
fn deinterleave<T: Copy>(input: &[T]) -> (Vec<T>, Vec<T>) {
    input.chunks_exact(2).map(|c| (c[0], c[1])).unzip()
}

/// Splits a slice of [`Complex<f64>`] into planar real/imaginary vectors.
pub(crate) fn deinterleave_complex64(signal: &[Complex<f64>]) -> (Vec<f64>, Vec<f64>) {
    let complex_t: &[f64] = cast_slice(signal);
    deinterleave(complex_t)
}

/// Splits a slice of [`Complex<f32>`] into planar real/imaginary vectors.
pub(crate) fn deinterleave_complex32(signal: &[Complex<f32>]) -> (Vec<f32>, Vec<f32>) {
    let complex_t: &[f32] = cast_slice(signal);
    deinterleave(complex_t)
}

/// Combines separate real and imaginary vectors back into complex structs.
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`.
pub(crate) fn combine_re_im<T: Float>(reals: &[T], imags: &[T]) -> Vec<Complex<T>> {
    assert_eq!(reals.len(), imags.len());

    reals
        .iter()
        .zip(imags.iter())
        .map(|(z_re, z_im)| Complex::new(*z_re, *z_im))
        .collect()
}

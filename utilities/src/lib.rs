//! Shared helpers for tests and benches: closeness assertions, random signal
//! generation, and a direct O(N²) DFT to check the fast transforms against.

pub extern crate rustfft;

use std::f64::consts::PI;

use rand::{distributions::Uniform, prelude::*};
use rustfft::num_traits::Float;

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Generate a random, complex, signal in the provided buffers
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`
pub fn gen_random_signal<T>(reals: &mut [T], imags: &mut [T])
where
    T: Float + rand::distributions::uniform::SampleUniform,
{
    assert_eq!(
        reals.len(),
        imags.len(),
        "Real and imaginary slices must be of equal length"
    );

    let mut rng = thread_rng();

    let uniform_dist = Uniform::new(T::from(-1.0).unwrap(), T::from(1.0).unwrap());
    for (real, imag) in reals.iter_mut().zip(imags.iter_mut()) {
        *real = uniform_dist.sample(&mut rng);
        *imag = uniform_dist.sample(&mut rng);
    }
}

/// Direct evaluation of the DFT definition, `O(N²)`.
///
/// Slow but independent of any radix-2 machinery, which makes it the
/// reference every fast path is compared against.
///
/// # Panics
///
/// Panics if `reals.len() != imags.len()`
pub fn reference_dft<T: Float>(reals: &[T], imags: &[T]) -> (Vec<T>, Vec<T>) {
    assert_eq!(reals.len(), imags.len());
    let n = reals.len();

    let mut out_re = Vec::with_capacity(n);
    let mut out_im = Vec::with_capacity(n);

    for k in 0..n {
        let mut acc_re = T::zero();
        let mut acc_im = T::zero();
        for t in 0..n {
            let theta =
                T::from(-2.0 * PI).unwrap() * T::from((k * t) % n).unwrap() / T::from(n).unwrap();
            let (st, ct) = theta.sin_cos();
            acc_re = acc_re + reals[t] * ct - imags[t] * st;
            acc_im = acc_im + reals[t] * st + imags[t] * ct;
        }
        out_re.push(acc_re);
        out_im.push(acc_im);
    }

    (out_re, out_im)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_signal_stays_in_range() {
        let big_n = 1 << 12;
        let mut reals = vec![0.0; big_n];
        let mut imags = vec![0.0; big_n];

        gen_random_signal::<f64>(&mut reals, &mut imags);

        assert!(reals.iter().chain(imags.iter()).all(|x| x.abs() < 1.0));
    }

    #[test]
    fn reference_dft_of_impulse_is_flat() {
        let reals = vec![1.0, 0.0, 0.0, 0.0];
        let imags = vec![0.0; 4];

        let (out_re, out_im) = reference_dft(&reals, &imags);
        for (re, im) in out_re.iter().zip(out_im.iter()) {
            assert_float_closeness(*re, 1.0, 1e-12);
            assert_float_closeness(*im, 0.0, 1e-12);
        }
    }
}

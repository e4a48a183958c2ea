//! A parallel, message-passing implementation of the radix-2
//! decimation-in-time Fast Fourier Transform.
//!
//! The transform runs over planar buffers (separate real and imaginary
//! slices) on one of two backends:
//!
//! - [`fft_64`] / [`fft_32`]: a pool of shared-memory threads, one fork-join
//!   region per butterfly stage.
//! - [`mesh_fft_64`] / [`mesh_fft_32`]: share-nothing workers that each own a
//!   slice of the sequence and talk only over point-to-point channels, the
//!   way a cluster of processes would.
//!
//! Both take natural-order input, transform in place, and produce the
//! frequency-domain result in natural order.
//!
//! ```
//! use meshfft::{fft_64, Direction};
//!
//! let mut reals = vec![1.0, 0.0, -1.0, 0.0];
//! let mut imags = vec![0.0; 4];
//! fft_64(&mut reals, &mut imags, Direction::Forward);
//!
//! assert!((reals[1] - 2.0).abs() < 1e-12);
//! ```

#[cfg(feature = "complex-nums")]
use num_complex::Complex;

use crate::options::Options;

mod bit_rev;
mod kernels;
mod mesh;
pub mod options;
mod shared;
#[cfg(feature = "complex-nums")]
mod utils;

pub use crate::bit_rev::bit_rev;

/// Reverse is for running the Inverse Fast Fourier Transform (IFFT)
/// Forward is for running the regular FFT
///
/// `Reverse` only flips the sign of the twiddle exponent; the result is left
/// unscaled, so a round trip gains a factor of `N`.
#[derive(Debug, Copy, Clone)]
pub enum Direction {
    /// Leave the exponent term in the twiddle factor alone
    Forward = 1,
    /// Multiply the exponent term in the twiddle factor by -1
    Reverse = -1,
}

macro_rules! impl_fft_for {
    ($func_name:ident, $func_with_opts:ident, $precision:ty) => {
        /// FFT on a pool of shared-memory threads, with automatically
        /// selected options.
        ///
        /// # Panics
        ///
        /// Panics if `reals.len() != imags.len()`, or if the length is not a
        /// power of two.
        pub fn $func_name(reals: &mut [$precision], imags: &mut [$precision], direction: Direction) {
            let opts = Options::guess_options(reals.len());
            $func_with_opts(reals, imags, direction, &opts);
        }

        /// FFT on a pool of shared-memory threads.
        ///
        /// # Panics
        ///
        /// Panics if `reals.len() != imags.len()`, or if the length is not a
        /// power of two.
        pub fn $func_with_opts(
            reals: &mut [$precision],
            imags: &mut [$precision],
            direction: Direction,
            opts: &Options,
        ) {
            assert_eq!(reals.len(), imags.len());
            assert!(reals.len().is_power_of_two());

            let workers = opts.workers.resolve(reals.len());
            bit_rev::bit_reverse_permute(reals, imags);
            shared::fft_shared(reals, imags, direction, workers);
        }
    };
}

impl_fft_for!(fft_64, fft_64_with_opts, f64);
impl_fft_for!(fft_32, fft_32_with_opts, f32);

macro_rules! impl_mesh_fft_for {
    ($func_name:ident, $func_with_opts:ident, $precision:ty) => {
        /// FFT on a mesh of share-nothing workers connected by channels, with
        /// automatically selected options.
        ///
        /// # Panics
        ///
        /// Panics if `reals.len() != imags.len()`, if the length is not a
        /// power of two, or if a fixed worker count is not a power of two
        /// dividing the length.
        pub fn $func_name(reals: &mut [$precision], imags: &mut [$precision], direction: Direction) {
            let opts = Options::guess_options(reals.len());
            $func_with_opts(reals, imags, direction, &opts);
        }

        /// FFT on a mesh of share-nothing workers connected by channels.
        ///
        /// # Panics
        ///
        /// Panics if `reals.len() != imags.len()`, if the length is not a
        /// power of two, or if a fixed worker count is not a power of two
        /// dividing the length.
        pub fn $func_with_opts(
            reals: &mut [$precision],
            imags: &mut [$precision],
            direction: Direction,
            opts: &Options,
        ) {
            assert_eq!(reals.len(), imags.len());
            assert!(reals.len().is_power_of_two());

            let workers = opts.workers.resolve_pow2(reals.len());
            assert!(
                workers.is_power_of_two() && workers <= reals.len(),
                "worker count must be a power of two dividing the input length"
            );

            bit_rev::bit_reverse_permute(reals, imags);
            mesh::fft_mesh(reals, imags, direction, workers);
        }
    };
}

impl_mesh_fft_for!(mesh_fft_64, mesh_fft_64_with_opts, f64);
impl_mesh_fft_for!(mesh_fft_32, mesh_fft_32_with_opts, f32);

#[cfg(feature = "complex-nums")]
macro_rules! impl_fft_complex_for {
    ($func_name:ident, $precision:ty, $fft_func:ident, $deinterleave_func:ident) => {
        /// FFT over a buffer of interleaved complex samples, transformed in
        /// place on the backend of the matching planar entry point.
        ///
        /// # Panics
        ///
        /// Panics if `signal.len()` is not a power of two.
        pub fn $func_name(signal: &mut [Complex<$precision>], direction: Direction) {
            let (mut reals, mut imags) = utils::$deinterleave_func(signal);
            $fft_func(&mut reals, &mut imags, direction);
            signal.copy_from_slice(&utils::combine_re_im(&reals, &imags));
        }
    };
}

#[cfg(feature = "complex-nums")]
impl_fft_complex_for!(fft_complex_64, f64, fft_64, deinterleave_complex64);
#[cfg(feature = "complex-nums")]
impl_fft_complex_for!(fft_complex_32, f32, fft_32, deinterleave_complex32);
#[cfg(feature = "complex-nums")]
impl_fft_complex_for!(mesh_fft_complex_64, f64, mesh_fft_64, deinterleave_complex64);
#[cfg(feature = "complex-nums")]
impl_fft_complex_for!(mesh_fft_complex_32, f32, mesh_fft_32, deinterleave_complex32);

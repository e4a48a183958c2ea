use std::f64::consts::PI;

use num_traits::Float;

use crate::Direction;

/// Combines one butterfly pair.
///
/// Returns `(a + W*b, a - W*b)` where `W = exp(direction * -2πi k/span)`.
/// The twiddle is computed from `(k, span)` on demand; nothing is cached.
#[inline]
pub(crate) fn butterfly<T: Float>(
    a: (T, T),
    b: (T, T),
    k: usize,
    span: usize,
    direction: Direction,
) -> ((T, T), (T, T)) {
    let theta = T::from(-2.0 * PI).unwrap() * T::from(direction as i8).unwrap()
        * T::from(k).unwrap()
        / T::from(span).unwrap();
    let (w_im, w_re) = theta.sin_cos();

    let (a_re, a_im) = a;
    let (b_re, b_im) = b;
    let wb_re = w_re * b_re - w_im * b_im;
    let wb_im = w_re * b_im + w_im * b_re;

    ((a_re + wb_re, a_im + wb_im), (a_re - wb_re, a_im - wb_im))
}

/// Butterflies a pre-split pair of half-ranges in lockstep.
///
/// `re_s0[t]`/`im_s0[t]` is paired with `re_s1[t]`/`im_s1[t]` using
/// `k = k_offset + t`. Both schedulers funnel into this loop: the
/// shared-memory one with sub-ranges of a wide chunk, the chunked kernel
/// below with whole halves.
#[inline]
pub(crate) fn fft_pairs<T: Float>(
    re_s0: &mut [T],
    re_s1: &mut [T],
    im_s0: &mut [T],
    im_s1: &mut [T],
    k_offset: usize,
    span: usize,
    direction: Direction,
) {
    re_s0
        .iter_mut()
        .zip(re_s1.iter_mut())
        .zip(im_s0.iter_mut())
        .zip(im_s1.iter_mut())
        .enumerate()
        .for_each(|(t, (((re_s0, re_s1), im_s0), im_s1))| {
            let (upper, lower) = butterfly(
                (*re_s0, *im_s0),
                (*re_s1, *im_s1),
                k_offset + t,
                span,
                direction,
            );
            *re_s0 = upper.0;
            *im_s0 = upper.1;
            *re_s1 = lower.0;
            *im_s1 = lower.1;
        });
}

#[multiversion::multiversion(targets("x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl", // x86_64-v4
                                     "x86_64+avx2+fma", // x86_64-v3
                                     "x86_64+sse4.2", // x86_64-v2
                                     "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
                                     "x86+avx2+fma",
                                     "x86+sse4.2",
                                     "x86+sse2",
                                     "aarch64+neon", // ARM64 with NEON (Apple Silicon M1/M2)
))]
#[inline]
pub(crate) fn fft_chunk_n<T: Float>(
    reals: &mut [T],
    imags: &mut [T],
    dist: usize,
    direction: Direction,
) {
    let chunk_size = dist << 1;

    reals
        .chunks_exact_mut(chunk_size)
        .zip(imags.chunks_exact_mut(chunk_size))
        .for_each(|(reals_chunk, imags_chunk)| {
            let (re_s0, re_s1) = reals_chunk.split_at_mut(dist);
            let (im_s0, im_s1) = imags_chunk.split_at_mut(dist);
            fft_pairs(re_s0, re_s1, im_s0, im_s1, 0, chunk_size, direction);
        });
}

/// `chunk_size == 4`, so the twiddles are `1` and `∓i`; hard code both
#[multiversion::multiversion(targets("x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl", // x86_64-v4
                                     "x86_64+avx2+fma", // x86_64-v3
                                     "x86_64+sse4.2", // x86_64-v2
                                     "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
                                     "x86+avx2+fma",
                                     "x86+sse4.2",
                                     "x86+sse2",
                                     "aarch64+neon", // ARM64 with NEON (Apple Silicon M1/M2)
))]
#[inline]
pub(crate) fn fft_chunk_4<T: Float>(reals: &mut [T], imags: &mut [T], direction: Direction) {
    const DIST: usize = 2;
    const CHUNK_SIZE: usize = DIST << 1;

    reals
        .chunks_exact_mut(CHUNK_SIZE)
        .zip(imags.chunks_exact_mut(CHUNK_SIZE))
        .for_each(|(reals_chunk, imags_chunk)| {
            let (reals_s0, reals_s1) = reals_chunk.split_at_mut(DIST);
            let (imags_s0, imags_s1) = imags_chunk.split_at_mut(DIST);

            let in0_re = reals_s0[0];
            let in1_re = reals_s1[0];
            let in0_im = imags_s0[0];
            let in1_im = imags_s1[0];

            reals_s0[0] = in0_re + in1_re;
            imags_s0[0] = in0_im + in1_im;
            reals_s1[0] = in0_re - in1_re;
            imags_s1[0] = in0_im - in1_im;

            let in0_re = reals_s0[1];
            let in1_re = reals_s1[1];
            let in0_im = imags_s0[1];
            let in1_im = imags_s1[1];

            match direction {
                // W = -i: W*b = (b_im, -b_re)
                Direction::Forward => {
                    reals_s0[1] = in0_re + in1_im;
                    imags_s0[1] = in0_im - in1_re;
                    reals_s1[1] = in0_re - in1_im;
                    imags_s1[1] = in0_im + in1_re;
                }
                // W = i: W*b = (-b_im, b_re)
                Direction::Reverse => {
                    reals_s0[1] = in0_re - in1_im;
                    imags_s0[1] = in0_im + in1_re;
                    reals_s1[1] = in0_re + in1_im;
                    imags_s1[1] = in0_im - in1_re;
                }
            }
        });
}

/// `chunk_size == 2`, so the only twiddle is `1`
#[multiversion::multiversion(targets("x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl", // x86_64-v4
                                     "x86_64+avx2+fma", // x86_64-v3
                                     "x86_64+sse4.2", // x86_64-v2
                                     "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
                                     "x86+avx2+fma",
                                     "x86+sse4.2",
                                     "x86+sse2",
                                     "aarch64+neon", // ARM64 with NEON (Apple Silicon M1/M2)
))]
#[inline]
pub(crate) fn fft_chunk_2<T: Float>(reals: &mut [T], imags: &mut [T]) {
    reals
        .chunks_exact_mut(2)
        .zip(imags.chunks_exact_mut(2))
        .for_each(|(reals_chunk, imags_chunk)| {
            let z0_re = reals_chunk[0];
            let z0_im = imags_chunk[0];
            let z1_re = reals_chunk[1];
            let z1_im = imags_chunk[1];

            reals_chunk[0] = z0_re + z1_re;
            imags_chunk[0] = z0_im + z1_im;
            reals_chunk[1] = z0_re - z1_re;
            imags_chunk[1] = z0_im - z1_im;
        });
}

/// Runs one whole stage over a buffer region whose length is a multiple of
/// the stage's chunk size, dispatching on the chunk size.
pub(crate) fn fft_stage<T: Float>(
    reals: &mut [T],
    imags: &mut [T],
    dist: usize,
    direction: Direction,
) {
    let chunk_size = dist << 1;
    if chunk_size == 2 {
        fft_chunk_2(reals, imags);
    } else if chunk_size == 4 {
        fft_chunk_4(reals, imags, direction);
    } else {
        fft_chunk_n(reals, imags, dist, direction);
    }
}

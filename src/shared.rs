//! Shared-memory stage scheduler.
//!
//! One fork-join region per stage: workers receive disjoint regions carved
//! out of the planar buffer pair with `chunks_mut`/`split_at_mut`, and the
//! scope join at the end of the region is the barrier stage `i + 1` depends
//! on. The stage formula makes concurrent index ranges disjoint, and slice
//! splitting proves that to the compiler, so no locks are involved.

use num_traits::Float;

use crate::kernels::{fft_pairs, fft_stage};
use crate::Direction;

/// Advances `reals`/`imags` (already in bit-reversed order) through all
/// `log2(n)` stages on `workers` threads.
pub(crate) fn fft_shared<T: Float + Send>(
    reals: &mut [T],
    imags: &mut [T],
    direction: Direction,
    workers: usize,
) {
    let log_n = reals.len().ilog2() as usize;
    for stage in 0..log_n {
        run_stage(reals, imags, 1 << stage, direction, workers);
    }
}

fn run_stage<T: Float + Send>(
    reals: &mut [T],
    imags: &mut [T],
    dist: usize,
    direction: Direction,
    workers: usize,
) {
    let chunk_size = dist << 1;
    let num_chunks = reals.len() / chunk_size;

    if workers <= 1 {
        fft_stage(reals, imags, dist, direction);
    } else if num_chunks >= workers {
        // early stages: plenty of independent chunks, so hand each worker a
        // contiguous run of whole chunks
        let block = num_chunks.div_ceil(workers) * chunk_size;
        std::thread::scope(|s| {
            reals
                .chunks_mut(block)
                .zip(imags.chunks_mut(block))
                .for_each(|(reals_block, imags_block)| {
                    s.spawn(move || fft_stage(reals_block, imags_block, dist, direction));
                });
        });
    } else {
        // late, wide stages: split every chunk's half-ranges across the
        // workers instead, carrying the matching twiddle offset
        let per_chunk = workers / num_chunks;
        let sub = dist.div_ceil(per_chunk);
        std::thread::scope(|s| {
            reals
                .chunks_exact_mut(chunk_size)
                .zip(imags.chunks_exact_mut(chunk_size))
                .for_each(|(reals_chunk, imags_chunk)| {
                    let (re_s0, re_s1) = reals_chunk.split_at_mut(dist);
                    let (im_s0, im_s1) = imags_chunk.split_at_mut(dist);

                    re_s0
                        .chunks_mut(sub)
                        .zip(re_s1.chunks_mut(sub))
                        .zip(im_s0.chunks_mut(sub))
                        .zip(im_s1.chunks_mut(sub))
                        .enumerate()
                        .for_each(|(w, (((re_s0, re_s1), im_s0), im_s1))| {
                            s.spawn(move || {
                                fft_pairs(
                                    re_s0,
                                    re_s1,
                                    im_s0,
                                    im_s1,
                                    w * sub,
                                    chunk_size,
                                    direction,
                                )
                            });
                        });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use utilities::{assert_float_closeness, gen_random_signal, reference_dft};

    use crate::bit_rev::bit_reverse_permute;

    use super::*;

    fn fft_with_workers(reals: &mut [f64], imags: &mut [f64], workers: usize) {
        bit_reverse_permute(reals, imags);
        fft_shared(reals, imags, Direction::Forward, workers);
    }

    #[test]
    fn worker_counts_agree_with_reference() {
        for log_n in 1..9 {
            let n = 1 << log_n;
            let mut reals = vec![0.0; n];
            let mut imags = vec![0.0; n];
            gen_random_signal(&mut reals, &mut imags);

            let (expected_re, expected_im) = reference_dft(&reals, &imags);

            for workers in [1, 2, 3, 4, 7, 8] {
                let (mut re, mut im) = (reals.clone(), imags.clone());
                fft_with_workers(&mut re, &mut im, workers);

                for (actual, expected) in re.iter().zip(expected_re.iter()) {
                    assert_float_closeness(*actual, *expected, 1e-9);
                }
                for (actual, expected) in im.iter().zip(expected_im.iter()) {
                    assert_float_closeness(*actual, *expected, 1e-9);
                }
            }
        }
    }

    #[test]
    fn rectangular_pulse() {
        // 8-point DFT of [1, 1, 1, 1, 0, 0, 0, 0]: bin 0 is the pulse mass,
        // even bins vanish, bin 1 is 1 - i(1 + sqrt(2))
        let mut reals = vec![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let mut imags = vec![0.0; 8];
        fft_with_workers(&mut reals, &mut imags, 2);

        assert_float_closeness(reals[0], 4.0, 1e-10);
        assert_float_closeness(imags[0], 0.0, 1e-10);
        for k in [2, 4, 6] {
            assert_float_closeness(reals[k], 0.0, 1e-10);
            assert_float_closeness(imags[k], 0.0, 1e-10);
        }
        assert_float_closeness(reals[1], 1.0, 1e-10);
        assert_float_closeness(imags[1], -(1.0 + 2.0_f64.sqrt()), 1e-10);
    }

    #[test]
    fn transform_is_linear() {
        let n = 64;
        let (a, b) = (2.5, -1.25);

        let mut x_re = vec![0.0; n];
        let mut x_im = vec![0.0; n];
        let mut y_re = vec![0.0; n];
        let mut y_im = vec![0.0; n];
        gen_random_signal(&mut x_re, &mut x_im);
        gen_random_signal(&mut y_re, &mut y_im);

        let mut sum_re: Vec<f64> = x_re
            .iter()
            .zip(y_re.iter())
            .map(|(x, y)| a * x + b * y)
            .collect();
        let mut sum_im: Vec<f64> = x_im
            .iter()
            .zip(y_im.iter())
            .map(|(x, y)| a * x + b * y)
            .collect();

        fft_with_workers(&mut sum_re, &mut sum_im, 4);
        fft_with_workers(&mut x_re, &mut x_im, 4);
        fft_with_workers(&mut y_re, &mut y_im, 4);

        for i in 0..n {
            assert_float_closeness(sum_re[i], a * x_re[i] + b * y_re[i], 1e-9);
            assert_float_closeness(sum_im[i], a * x_im[i] + b * y_im[i], 1e-9);
        }
    }

    #[test]
    fn reverse_undoes_forward() {
        let n = 256;
        let mut reals = vec![0.0; n];
        let mut imags = vec![0.0; n];
        gen_random_signal(&mut reals, &mut imags);
        let (orig_re, orig_im) = (reals.clone(), imags.clone());

        bit_reverse_permute(&mut reals, &mut imags);
        fft_shared(&mut reals, &mut imags, Direction::Forward, 4);
        bit_reverse_permute(&mut reals, &mut imags);
        fft_shared(&mut reals, &mut imags, Direction::Reverse, 4);

        let scale = n as f64;
        for i in 0..n {
            assert_float_closeness(reals[i] / scale, orig_re[i], 1e-10);
            assert_float_closeness(imags[i] / scale, orig_im[i], 1e-10);
        }
    }
}

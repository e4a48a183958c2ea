//! Bit-reversal reordering of planar complex buffers.
//!
//! The iterative radix-2 algorithm can only run in place if the input is
//! first scattered into bit-reversed order. [`bit_rev`] maps a single index;
//! [`bit_reverse_permute`] applies the whole permutation to a buffer pair
//! using a Gray-code swap walk that visits every swapped pair exactly once.
//!
//! Source: https://www.katjaas.nl/bitreversal/bitreversal.html

/// Reverses the low `log_n` bits of `x`.
///
/// The storage position of the sample at natural position `x` in a transform
/// of size `1 << log_n`. Applying it twice returns `x`.
pub fn bit_rev(x: usize, log_n: usize) -> usize {
    if log_n == 0 {
        return x;
    }
    let shift = usize::BITS as usize - log_n;
    x.reverse_bits() >> shift
}

/// Permutes `reals`/`imags` into bit-reversed order in place.
///
/// Lengths 1 and 2 are fixed points of the permutation, so the walk below
/// only needs to handle `n >= 4`.
pub(crate) fn bit_reverse_permute<T>(reals: &mut [T], imags: &mut [T]) {
    debug_assert_eq!(reals.len(), imags.len());
    let n = reals.len();
    if n < 4 {
        return;
    }

    let half_n = n >> 1;
    let quart_n = n >> 2;
    let n_min_1 = n - 1;

    let mut forward = half_n;
    let mut rev = 1;

    let mut i = quart_n;
    while i > 0 {
        // Gray code generator for even values:
        let mut nodd = !i; // counting ones is easier
        let mut zeros = 0;
        while (nodd & 1) == 1 {
            nodd >>= 1;
            zeros += 1;
        }

        forward ^= 2 << zeros; // toggle one bit of forward
        rev ^= quart_n >> zeros; // toggle one bit of rev

        // swap even and ~even conditionally
        if forward < rev {
            reals.swap(forward, rev);
            imags.swap(forward, rev);

            // swap bitwise-negated pairs
            let nodd = n_min_1 ^ forward;
            let noddrev = n_min_1 ^ rev;
            reals.swap(nodd, noddrev);
            imags.swap(nodd, noddrev);
        }

        // compute the odd values from the even; swap odd unconditionally
        let nodd = forward ^ 1;
        let noddrev = rev ^ half_n;
        reals.swap(nodd, noddrev);
        imags.swap(nodd, noddrev);
        i -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Obviously correct permutation, used as the oracle below.
    fn bit_reverse_permute_naive<T>(reals: &mut [T], imags: &mut [T]) {
        let n = reals.len();
        let log_n = n.ilog2() as usize;
        for i in 0..n {
            let j = bit_rev(i, log_n);
            if i < j {
                reals.swap(i, j);
                imags.swap(i, j);
            }
        }
    }

    #[test]
    fn index_reversal() {
        assert_eq!(bit_rev(0b001, 3), 0b100);
        assert_eq!(bit_rev(0b011, 3), 0b110);
        assert_eq!(bit_rev(0b0110, 4), 0b0110);
        assert_eq!(bit_rev(0, 0), 0);
    }

    #[test]
    fn index_reversal_is_an_involution() {
        for log_n in 0..12 {
            for i in 0..(1usize << log_n) {
                assert_eq!(bit_rev(bit_rev(i, log_n), log_n), i);
            }
        }
    }

    #[test]
    fn known_orders() {
        let mut reals: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let mut imags = reals.clone();
        bit_reverse_permute(&mut reals, &mut imags);
        assert_eq!(reals, vec![0.0, 4.0, 2.0, 6.0, 1.0, 5.0, 3.0, 7.0]);
        assert_eq!(imags, reals);

        let mut reals: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let mut imags = reals.clone();
        bit_reverse_permute(&mut reals, &mut imags);
        assert_eq!(
            reals,
            vec![
                0.0, 8.0, 4.0, 12.0, 2.0, 10.0, 6.0, 14.0, 1.0, 9.0, 5.0, 13.0, 3.0, 11.0, 7.0,
                15.0,
            ]
        );
    }

    #[test]
    fn matches_naive_permutation() {
        for log_n in 0..11 {
            let n = 1usize << log_n;
            let mut reals: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let mut imags: Vec<f64> = (0..n).map(|i| (i as f64) - 0.5).collect();

            let mut expected_re = reals.clone();
            let mut expected_im = imags.clone();
            bit_reverse_permute_naive(&mut expected_re, &mut expected_im);

            bit_reverse_permute(&mut reals, &mut imags);
            assert_eq!(reals, expected_re);
            assert_eq!(imags, expected_im);
        }
    }
}

//! Message-passing backend.
//!
//! `P` workers each own a contiguous planar slice of `N/P` samples and share
//! nothing; their only coupling is a fabric of point-to-point channels plus
//! one gather channel at the end. Stages whose butterfly span fits inside a
//! slice run locally; for the rest, every sample's partner lives in exactly
//! one other worker's slice, so the pair swaps whole slices and each side
//! keeps its half of every combine. Sends are buffered and never block;
//! the blocking receive is what keeps a worker from entering stage `i + 1`
//! before its stage-`i` operands exist.

use std::sync::mpsc::{channel, Receiver, Sender};

use num_traits::Float;

use crate::kernels::{butterfly, fft_stage};
use crate::Direction;

/// One worker's slice of the sequence, as it travels over a link.
struct Packet<T> {
    reals: Vec<T>,
    imags: Vec<T>,
}

/// Channel endpoints held by a single worker: a sender toward every rank and
/// a receiver from every rank, indexed by rank.
struct Links<T> {
    to: Vec<Sender<Packet<T>>>,
    from: Vec<Receiver<Packet<T>>>,
}

/// The rank a worker must swap slices with at `stage`, or `None` while the
/// stage's butterfly span still fits inside one slice.
///
/// The rank distance doubles every exchange stage and the pairing is
/// `rank ^ distance`, which makes it symmetric by construction: if A's
/// partner is B then B's partner is A, for every stage.
pub(crate) fn partner_for_stage(
    rank: usize,
    stage: usize,
    workers: usize,
    n: usize,
) -> Option<usize> {
    let slice_len = n / workers;
    let local_stages = slice_len.ilog2() as usize;
    if stage < local_stages {
        None
    } else {
        Some(rank ^ (1 << (stage - local_stages)))
    }
}

/// Builds the full point-to-point fabric: one channel per ordered rank pair,
/// so a receive is matched to one specific sender and slices can never be
/// observed out of stage order.
fn mesh_links<T>(workers: usize) -> Vec<Links<T>> {
    let mut to: Vec<Vec<Sender<Packet<T>>>> =
        (0..workers).map(|_| Vec::with_capacity(workers)).collect();
    let mut from: Vec<Vec<Receiver<Packet<T>>>> =
        (0..workers).map(|_| Vec::with_capacity(workers)).collect();

    for src in 0..workers {
        for dst in 0..workers {
            let (tx, rx) = channel();
            to[src].push(tx);
            from[dst].push(rx);
        }
    }

    to.into_iter()
        .zip(from)
        .map(|(to, from)| Links { to, from })
        .collect()
}

/// Combines the locally held slice with the partner's. The lower rank holds
/// the upper operand of every pair and keeps `a + W*b`; the higher rank holds
/// the lower operand and keeps `a - W*b`. `k` comes from the global index,
/// the same arithmetic the local phase applies per chunk.
fn exchange_combine<T: Float>(
    rank: usize,
    partner: usize,
    stage: usize,
    slice_len: usize,
    reals: &mut [T],
    imags: &mut [T],
    theirs: &Packet<T>,
    direction: Direction,
) {
    let dist = 1usize << stage;
    let span = dist << 1;
    let base = rank * slice_len;

    reals
        .iter_mut()
        .zip(imags.iter_mut())
        .zip(theirs.reals.iter())
        .zip(theirs.imags.iter())
        .enumerate()
        .for_each(|(t, (((re, im), other_re), other_im))| {
            let k = (base + t) & (dist - 1);
            if rank < partner {
                let (upper, _) = butterfly((*re, *im), (*other_re, *other_im), k, span, direction);
                *re = upper.0;
                *im = upper.1;
            } else {
                let (_, lower) = butterfly((*other_re, *other_im), (*re, *im), k, span, direction);
                *re = lower.0;
                *im = lower.1;
            }
        });
}

fn worker<T: Float>(
    rank: usize,
    workers: usize,
    n: usize,
    direction: Direction,
    mut reals: Vec<T>,
    mut imags: Vec<T>,
    links: Links<T>,
    gather: Sender<(usize, Packet<T>)>,
) {
    let slice_len = n / workers;
    let log_n = n.ilog2() as usize;

    for stage in 0..log_n {
        match partner_for_stage(rank, stage, workers, n) {
            None => fft_stage(&mut reals, &mut imags, 1 << stage, direction),
            Some(partner) => {
                let ours = Packet {
                    reals: reals.clone(),
                    imags: imags.clone(),
                };
                links.to[partner].send(ours).expect("partner hung up");
                let theirs = links.from[partner].recv().expect("partner hung up");
                exchange_combine(
                    rank, partner, stage, slice_len, &mut reals, &mut imags, &theirs, direction,
                );
            }
        }
    }

    gather
        .send((rank, Packet { reals, imags }))
        .expect("collector hung up");
}

/// Runs the transform on `workers` share-nothing workers and collects the
/// slices back into `reals`/`imags` (already in bit-reversed order) in rank
/// order.
pub(crate) fn fft_mesh<T: Float + Send>(
    reals: &mut [T],
    imags: &mut [T],
    direction: Direction,
    workers: usize,
) {
    let n = reals.len();
    if workers <= 1 {
        let log_n = n.ilog2() as usize;
        for stage in 0..log_n {
            fft_stage(reals, imags, 1 << stage, direction);
        }
        return;
    }

    let slice_len = n / workers;
    let (gather_tx, gather_rx) = channel();

    std::thread::scope(|s| {
        for (rank, links) in mesh_links(workers).into_iter().enumerate() {
            let slice_re = reals[rank * slice_len..][..slice_len].to_vec();
            let slice_im = imags[rank * slice_len..][..slice_len].to_vec();
            let gather = gather_tx.clone();
            s.spawn(move || worker(rank, workers, n, direction, slice_re, slice_im, links, gather));
        }
    });
    drop(gather_tx);

    // the collector: place every worker's slice back at its rank's offset
    for _ in 0..workers {
        let (rank, packet) = gather_rx.recv().expect("worker died before gather");
        reals[rank * slice_len..][..slice_len].copy_from_slice(&packet.reals);
        imags[rank * slice_len..][..slice_len].copy_from_slice(&packet.imags);
    }
}

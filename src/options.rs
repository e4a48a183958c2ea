/// Options to tune to improve performance depending on the hardware and input size.
///
/// Calling FFT routines without specifying options will automatically select reasonable defaults
/// depending on the input size and other factors.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub workers: WorkerCount,
}

impl Options {
    /// Reasonable defaults for a transform of `input_size` points.
    pub fn guess_options(input_size: usize) -> Options {
        let mut options = Options::default();
        // below this size the fork-join overhead dominates the arithmetic
        if input_size < (1 << 14) {
            options.workers = WorkerCount::Fixed(1);
        }
        options
    }
}

/// How many workers a transform fans out to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WorkerCount {
    /// Derive the worker count from the machine's available parallelism.
    #[default]
    Auto,
    /// Use exactly this many workers.
    ///
    /// The mesh backend additionally requires a power of two that divides the
    /// input length; the shared-memory backend accepts any nonzero count.
    Fixed(usize),
}

impl WorkerCount {
    /// Worker count for the shared-memory scheduler.
    pub(crate) fn resolve(self, n: usize) -> usize {
        match self {
            WorkerCount::Fixed(workers) => workers.max(1),
            WorkerCount::Auto => available().min(n / 2).max(1),
        }
    }

    /// Worker count for the mesh backend: a power of two no larger than `n`,
    /// so every worker's slice length is itself a power of two.
    pub(crate) fn resolve_pow2(self, n: usize) -> usize {
        match self {
            WorkerCount::Fixed(workers) => workers.max(1),
            WorkerCount::Auto => prev_power_of_two(available().min(n).max(1)),
        }
    }
}

fn available() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

fn prev_power_of_two(x: usize) -> usize {
    if x.is_power_of_two() {
        x
    } else {
        x.next_power_of_two() >> 1
    }
}

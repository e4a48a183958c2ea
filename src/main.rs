use std::time::Instant;

use meshfft::{fft_64, mesh_fft_64, Direction};

fn time_backend(name: &str, log_n: usize, fft: fn(&mut [f64], &mut [f64], Direction)) {
    let n = 1usize << log_n;

    let now = Instant::now();
    let mut reals: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    let mut imags: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    let setup = now.elapsed();

    let now = Instant::now();
    fft(&mut reals, &mut imags, Direction::Forward);
    let transform = now.elapsed();

    println!("{name} with {log_n} qubits");
    println!("setup time: {} us", setup.as_micros());
    println!("transform time: {} us", transform.as_micros());
}

fn main() {
    for log_n in 4..21 {
        time_backend("threads", log_n, fft_64);
        time_backend("mesh", log_n, mesh_fft_64);
        println!("----------------------------");
    }
}

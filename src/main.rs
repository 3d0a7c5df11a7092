use clap::Parser;
use isoem::em::{self, EmParams};
use isoem::mocks::{mock_rgb, mock_rgb_names};

#[derive(Parser, Debug)]
struct Opts {
    /// convergence tolerance on the max absolute abundance change
    #[clap(short = 't', long, default_value_t = 1e-6)]
    tol: f64,
    /// maximum number of EM iterations
    #[clap(short = 'm', long, default_value_t = 1000)]
    max_iter: usize,
    /// parallelize the E-step over reads
    #[clap(long)]
    parallel: bool,
    /// print the estimate as JSON
    #[clap(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let y = mock_rgb();
    let params = EmParams::new(opts.tol, opts.max_iter);
    let result = if opts.parallel {
        em::run_parallel(&y, &params)
    } else {
        em::run(&y, &params)
    };
    let estimate = match result {
        Ok(estimate) => estimate,
        Err(err) => {
            eprintln!("isoem: {}", err);
            std::process::exit(1);
        }
    };

    if opts.json {
        println!("{}", serde_json::to_string(&estimate).unwrap());
        return;
    }

    println!("# tol={} max_iter={}", params.tol, params.max_iter);
    if estimate.is_converged(params.max_iter) {
        println!("# converged after {} iterations", estimate.n_iterations);
    } else {
        println!("# not converged within {} iterations", params.max_iter);
    }
    for (name, abundance) in mock_rgb_names().iter().zip(estimate.abundances.iter()) {
        println!("{}\t{:.6}\t{:.2}%", name, abundance, abundance * 100.0);
    }
}

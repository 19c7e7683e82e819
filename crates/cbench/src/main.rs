//! cbench - benchmark in-memory caches with a timed get/set workload

mod units;

use std::time::Duration;

use anyhow::{Context, Result};
use cachebench::{preload, run, BenchConfig, CountingAlloc, Mode, Report};
use cachebench_backends::{new_cache, BackendKind};
use clap::Parser;
use tracing::info;

use crate::units::{parse_duration, parse_size};

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc::system();

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache to benchmark (lru, moka, quick)
    #[arg(long)]
    cache: String,

    /// Size of each key in bytes
    #[arg(long, default_value_t = 32)]
    ksize: usize,

    /// Size of each value in bytes
    #[arg(long, default_value_t = 100)]
    vsize: usize,

    /// Cache capacity in bytes (K/M/G suffixes allowed)
    #[arg(long, default_value = "1G", value_parser = parse_size)]
    size: usize,

    /// Benchmark duration (e.g. 200ms, 30s, 5m)
    #[arg(long, default_value = "5m", value_parser = parse_duration)]
    duration: Duration,

    /// Workload: get, set or getset
    #[arg(long, default_value = "getset")]
    mode: String,

    /// Percentage of get operations in getset mode
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    getp: u8,

    /// Seed for the key sampler and the getset mix
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let report = bench(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn bench(args: &Args) -> Result<Report> {
    let kind: BackendKind = args.cache.parse()?;
    let mode = Mode::parse(&args.mode, args.getp)?;

    let mut config = BenchConfig::new(
        args.ksize,
        args.vsize,
        args.size,
        args.duration,
        mode.workload(args.seed),
    )?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let cache = new_cache(kind, args.size, args.vsize).context("Failed to create cache")?;
    info!(cache = %kind, %mode, "benchmarking");

    // Pure reads need populated keys to sample from
    let last_key = if config.needs_preload() {
        Some(preload(cache.as_ref(), &config))
    } else {
        None
    };

    Ok(run(cache.as_ref(), config, last_key.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachebench::Error;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["cbench"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = args(&["--cache", "lru"]);

        assert_eq!(args.ksize, 32);
        assert_eq!(args.vsize, 100);
        assert_eq!(args.size, 1024 * 1024 * 1024);
        assert_eq!(args.duration, Duration::from_secs(300));
        assert_eq!(args.mode, "getset");
        assert_eq!(args.getp, 50);
        assert!(!args.json);
    }

    #[test]
    fn test_getp_out_of_range() {
        let result = Args::try_parse_from(["cbench", "--cache", "lru", "--getp", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_backend_fails_before_run() {
        let args = args(&["--cache", "bigcache", "--duration", "1h"]);

        let err = bench(&args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::UnknownBackend("bigcache".to_string()))
        );
    }

    #[test]
    fn test_short_run_every_backend() {
        for kind in BackendKind::ALL {
            let args = args(&[
                "--cache",
                kind.name(),
                "--size",
                "1M",
                "--duration",
                "100ms",
                "--mode",
                "get",
                "--seed",
                "1",
            ]);

            let report = bench(&args).unwrap();
            assert!(report.ops > 0, "{}", kind);
            assert!(report.cache_stat.contains_key("hits"), "{}", kind);
        }
    }
}

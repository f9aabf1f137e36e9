use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "threaded-map workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the map benchmarks against std's BTreeMap
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCH_TARGET: &str = "threaded_map_benchmark";

/// Implementations measured in every workload; the first one is the reference.
const IMPLEMENTATIONS: &[&str] = &["std", "threaded", "threaded_positions"];

/// workload -> implementation -> elements per second
type Results = HashMap<String, HashMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Compiling {BENCH_TARGET}...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH_TARGET, "--release"])
        .status()
        .context("failed to spawn cargo build")?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", BENCH_TARGET]);

    // Args for the test runner (Criterion) go after --
    cmd.arg("--");
    if quick {
        cmd.args(["--measurement-time", "0.1", "--sample-size", "10", "--noplot"]);
    }

    let status = cmd.status().context(format!("Failed to run {BENCH_TARGET}"))?;
    if !status.success() {
        anyhow::bail!("Benchmark run failed");
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results)?;

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(report_path, render_report(&results))
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn render_report(results: &Results) -> String {
    use std::fmt::Write;

    let reference = IMPLEMENTATIONS[0];
    let mut out = String::new();
    let _ = writeln!(out, "# ThreadedMap Benchmark Report\n");

    let _ = write!(out, "| Workload |");
    for name in IMPLEMENTATIONS {
        let _ = write!(out, " {name} (Ops/s) | vs {reference} |");
    }
    let _ = writeln!(out);
    let _ = write!(out, "|---|");
    for _ in IMPLEMENTATIONS {
        let _ = write!(out, "---|---|");
    }
    let _ = writeln!(out);

    let mut workloads: Vec<_> = results.keys().collect();
    workloads.sort();
    for workload in workloads {
        let row = &results[workload];
        let reference_ops = row.get(reference).copied().unwrap_or(0.0);
        let _ = write!(out, "| {workload} |");
        for name in IMPLEMENTATIONS {
            match row.get(*name) {
                Some(&ops) => {
                    let rel = if reference_ops > 0.0 { ops / reference_ops } else { 0.0 };
                    let _ = write!(out, " {} | **{rel:.2}x** |", format_ops(ops));
                }
                None => {
                    let _ = write!(out, " N/A | - |");
                }
            }
        }
        let _ = writeln!(out);
    }
    out
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|s| s.to_str())
}

/// Walks criterion's output, which is laid out as
/// `<workload>/<implementation>/new/estimates.json`.
fn collect_results(dir: &Path, results: &mut Results) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results)?;
            continue;
        }
        if file_name(&path) != Some("estimates.json") {
            continue;
        }

        let Some(run_dir) = path.parent() else { continue };
        if file_name(run_dir) != Some("new") {
            continue;
        }
        let Some(impl_dir) = run_dir.parent() else { continue };
        let Some(workload_dir) = impl_dir.parent() else { continue };
        let (Some(implementation), Some(workload)) = (file_name(impl_dir), file_name(workload_dir)) else {
            continue;
        };
        if implementation == "report" || workload == "report" {
            continue;
        }

        // Throughput lives next to the estimates.
        let elements = read_json(&run_dir.join("benchmark.json"))
            .and_then(|json| json.get("throughput")?.get("Elements")?.as_f64())
            .unwrap_or(1.0);
        let Some(time_ns) = read_json(&path).and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64()) else {
            continue;
        };
        if time_ns > 0.0 {
            results
                .entry(workload.to_string())
                .or_default()
                .insert(implementation.to_string(), elements * 1e9 / time_ns);
        }
    }
    Ok(())
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

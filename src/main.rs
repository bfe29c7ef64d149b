//! CLI for octotune: chunk, policy, occupancy, info, report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use octotune::{
    fastest_of, runtime, BlockShape, CellExecutor, ExecPolicy, OctreeMesh, ScopedRegion,
    DEFAULT_CHUNK_SIZE,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "octotune")]
#[command(about = "Auto-tuned cell-wise dispatch over octree meshes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct MeshArgs {
    #[arg(long, default_value = "32")]
    bx: u32,
    #[arg(long, default_value = "32")]
    by: u32,
    #[arg(long, default_value = "32")]
    bz: u32,
    #[arg(long, default_value = "20")]
    octants: u32,
    #[arg(long, default_value = "100")]
    iters: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chunk-size tuning workload
    Chunk(MeshArgs),

    /// Run the execution-policy tuning workload
    Policy(MeshArgs),

    /// Trivial parallel sweep; checks that init plus dispatch works
    Occupancy,

    /// Show runtime configuration
    Info {
        #[arg(long)]
        verbose: bool,
    },

    /// Run a short tuned workload and dump profiler + tuner state as JSON
    Report(MeshArgs),
}

#[derive(Serialize)]
struct ReportOutput {
    profiler: octotune::ProfilerReport,
    tuning: Vec<octotune::tuning::VarSnapshot>,
}

fn main() -> Result<()> {
    runtime::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chunk(args) => run_chunk(&args),
        Commands::Policy(args) => run_policy(&args),
        Commands::Occupancy => run_occupancy(),
        Commands::Info { verbose } => {
            runtime::print_configuration(verbose);
            Ok(())
        }
        Commands::Report(args) => run_report(&args),
    }
}

fn setup(args: &MeshArgs) -> Result<(CellExecutor, BlockShape, Vec<i32>)> {
    let shape = BlockShape::new(args.bx, args.by, args.bz);
    let exec = CellExecutor::new(OctreeMesh::with_octants(args.octants));
    let total = exec.mesh().total_cells(shape)? as usize;
    Ok((exec, shape, vec![0i32; total]))
}

fn run_chunk(args: &MeshArgs) -> Result<()> {
    let (exec, shape, mut result) = setup(args)?;
    let mut chunk = 0;
    for _ in 0..args.iters {
        chunk = exec.fill_cells_tuned_chunk("cli.chunk", shape, &mut result, |cell| {
            (cell.i + cell.j + cell.k) as i32
        })?;
    }
    info!(chunk, "final chunk size");
    println!("chunk_size = {chunk}");
    Ok(())
}

fn run_policy(args: &MeshArgs) -> Result<()> {
    let (exec, shape, mut result) = setup(args)?;
    let mut policy = ExecPolicy::Flat;
    for _ in 0..args.iters {
        policy = exec.fill_cells_tuned_policy("cli.policy", shape, &mut result, |cell| {
            (cell.i + cell.j + cell.k) as i32
        })?;
    }
    info!(policy = policy.name(), "final policy");
    println!("policy = {}", policy.name());
    Ok(())
}

fn run_occupancy() -> Result<()> {
    runtime::print_configuration(false);
    let exec = CellExecutor::new(OctreeMesh::with_octants(1));
    exec.foreach_cell("init_loop", BlockShape::new(10, 1, 1), |cell| {
        println!("Hello from iteration {}", cell.flat_index());
    })?;
    println!("Test completed successfully.");
    Ok(())
}

/// Short policy shoot-out via `fastest_of`, then a JSON dump of the
/// profiler report and tuner state.
fn run_report(args: &MeshArgs) -> Result<()> {
    let shape = BlockShape::new(args.bx, args.by, args.bz);
    let exec = CellExecutor::new(OctreeMesh::with_octants(args.octants));
    let total = exec.mesh().total_cells(shape)? as usize;
    let kernel = |cell: octotune::CellIndex| (cell.i + cell.j + cell.k) as i32;

    // Validate once up front; the per-variant buffers below reuse the same
    // shape, so the dispatches inside the closures cannot fail.
    let mut out_flat = vec![0i32; total];
    exec.fill_cells(
        "report.warmup",
        shape,
        ExecPolicy::Flat,
        DEFAULT_CHUNK_SIZE,
        &mut out_flat,
        kernel,
    )?;
    let mut out_planes = vec![0i32; total];
    let mut out_hier = vec![0i32; total];

    {
        let _region = ScopedRegion::new("report_search_loop");
        for _ in 0..args.iters {
            let mut flat = || {
                let _ = exec.fill_cells(
                    "report.flat",
                    shape,
                    ExecPolicy::Flat,
                    DEFAULT_CHUNK_SIZE,
                    &mut out_flat,
                    kernel,
                );
            };
            let mut planes = || {
                let _ = exec.fill_cells(
                    "report.planes",
                    shape,
                    ExecPolicy::BlockPlanes,
                    DEFAULT_CHUNK_SIZE,
                    &mut out_planes,
                    kernel,
                );
            };
            let mut hier = || {
                let _ = exec.fill_cells(
                    "report.hier",
                    shape,
                    ExecPolicy::Hierarchical,
                    DEFAULT_CHUNK_SIZE,
                    &mut out_hier,
                    kernel,
                );
            };
            let mut variants: [&mut dyn FnMut(); 3] = [&mut flat, &mut planes, &mut hier];
            fastest_of("report.policy", &mut variants)?;
        }
    }

    let output = ReportOutput {
        profiler: octotune::profiling::global().report(),
        tuning: octotune::tuning::global().snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

//! Standalone demo: execution-policy auto-tuning. The same logical loop is
//! dispatched under three rayon strategies (flat range, block-planes,
//! hierarchical) and the tuner converges on the fastest one.

use anyhow::Result;
use clap::Parser;
use octotune::{runtime, BlockShape, CellExecutor, OctreeMesh, ScopedRegion};

#[derive(Parser)]
#[command(name = "foreach_cell_policy")]
#[command(about = "Execution-policy auto-tuning demo over an octree mesh")]
struct Args {
    #[arg(long, default_value = "128")]
    bx: u32,
    #[arg(long, default_value = "128")]
    by: u32,
    #[arg(long, default_value = "128")]
    bz: u32,
    #[arg(long, default_value = "20")]
    octants: u32,
    #[arg(long, default_value = "100")]
    iters: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    runtime::init();
    runtime::print_configuration(false);

    let shape = BlockShape::new(args.bx, args.by, args.bz);
    let exec = CellExecutor::new(OctreeMesh::with_octants(args.octants));
    let total = exec.mesh().total_cells(shape)? as usize;
    let mut result = vec![0i32; total];

    let mut winner = None;
    {
        let _region = ScopedRegion::new("foreach_cell_search_loop");
        for _ in 0..args.iters {
            let policy =
                exec.fill_cells_tuned_policy("foreach_cell", shape, &mut result, |cell| {
                    (cell.i + cell.j + cell.k) as i32
                })?;
            winner = Some(policy);
        }
    }

    if let Some(policy) = winner {
        println!("Selected policy after search: {}", policy.name());
    }
    println!("First i+j+k sums:");
    for (idx, sum) in result.iter().take(10).enumerate() {
        println!("Cell {idx} -> sum = {sum}");
    }
    let report = octotune::profiling::global().report();
    for region in &report.regions {
        println!(
            "Region {}: {:.3} ms over {} entries",
            region.name, region.total_ms, region.count
        );
    }
    Ok(())
}

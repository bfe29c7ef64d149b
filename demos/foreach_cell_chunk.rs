//! Standalone demo: chunk-size auto-tuning for the flat for-each-cell
//! dispatch. Runs the `i + j + k` kernel repeatedly so the tuner can sweep
//! its candidate chunk sizes and converge, then prints the first cell sums.

use anyhow::Result;
use clap::Parser;
use octotune::{runtime, BlockShape, CellExecutor, OctreeMesh};

#[derive(Parser)]
#[command(name = "foreach_cell_chunk")]
#[command(about = "Chunk-size auto-tuning demo over an octree mesh")]
struct Args {
    #[arg(long, default_value = "128")]
    bx: u32,
    #[arg(long, default_value = "128")]
    by: u32,
    #[arg(long, default_value = "128")]
    bz: u32,
    #[arg(long, default_value = "20")]
    octants: u32,
    /// Dispatch repetitions; enough for the tuner to converge.
    #[arg(long, default_value = "1000")]
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

    let mut last_chunk = 0usize;
    for _ in 0..args.iters {
        let chunk = exec.fill_cells_tuned_chunk("foreach_demo", shape, &mut result, |cell| {
            (cell.i + cell.j + cell.k) as i32
        })?;
        if chunk != last_chunk {
            println!("[TUNING] Using chunk_size = {chunk}");
            last_chunk = chunk;
        }
    }

    println!("First i+j+k sums:");
    for (idx, sum) in result.iter().take(10).enumerate() {
        println!("Cell {idx} -> sum = {sum}");
    }
    Ok(())
}

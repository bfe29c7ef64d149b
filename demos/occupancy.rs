//! Smoke test: runtime init plus a trivial parallel sweep.

use anyhow::Result;
use octotune::{runtime, BlockShape, CellExecutor, OctreeMesh};

fn main() -> Result<()> {
    runtime::init();
    runtime::print_configuration(false);

    let exec = CellExecutor::new(OctreeMesh::with_octants(1));
    let shape = BlockShape::new(10, 1, 1);
    exec.foreach_cell("init_loop", shape, |cell| {
        println!("Hello from iteration {}", cell.flat_index());
    })?;

    println!("Test completed successfully.");
    Ok(())
}

//! Build a small Ising model, convert it to QUBO form and load it from a matrix

use bqm::{DenseBqm, DenseMatrix, LoadConfig, Result, Sample, SparseBqm, Vartype};

fn main() -> Result<()> {
    println!("Building a 3-spin chain...");

    let mut ising = SparseBqm::new(Vartype::Spin);
    ising.add_interaction("a", "b", 2.0)?;
    ising.add_interaction("b", "c", -1.0)?;
    ising.add_variable("a", 0.5)?;
    ising.add_offset(3.0);

    println!(
        "Ising model: {} variables, {} interactions, offset {}",
        ising.num_variables(),
        ising.num_interactions(),
        ising.offset()
    );

    let qubo = ising.to_vartype(Vartype::Binary)?;
    for label in qubo.sorted_variables() {
        println!("  h[{label}] = {}", qubo.get_linear(&label)?);
    }
    for ((u, v), coupling) in qubo.quadratic() {
        println!("  Q[{u}, {v}] = {coupling}");
    }
    println!("  offset = {}", qubo.offset());

    // Same assignment, both encodings
    let spins: Sample<&str> = [("a", 1), ("b", -1), ("c", -1)].into_iter().collect();
    let bits: Sample<&str> = [("a", 1), ("b", 0), ("c", 0)].into_iter().collect();
    println!(
        "Energy: spin {} / binary {}",
        ising.energy(&spins)?,
        qubo.energy(&bits)?
    );

    println!("\nLoading an upper-triangular QUBO matrix...");
    let matrix = DenseMatrix::from_rows(vec![
        vec![-1.0, 2.0, 0.0],
        vec![0.0, -1.0, 2.0],
        vec![0.0, 0.0, -1.0],
    ])?;
    let dense = DenseBqm::from_matrix(&matrix, vec![0, 1, 2], 0.0, Vartype::Binary, &LoadConfig::default())?;
    let (labels, stored) = dense.interaction_matrix()?;
    println!("Row labels: {labels:?}");
    for row in 0..stored.nrows() {
        let values: Vec<f64> = (0..stored.ncols())
            .map(|col| stored.get(row, col).unwrap_or(0.0))
            .collect();
        println!("  {values:?}");
    }
    println!("Minimum coupling: {}", dense.min_quadratic()?);
    Ok(())
}

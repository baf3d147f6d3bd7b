//! Higher-order terms: build a HUBO, expand it into spins and export it

use bqm::{BinaryPolynomialModel, Result, Vartype};

fn main() -> Result<()> {
    println!("Building a cubic binary polynomial...");

    let hubo = BinaryPolynomialModel::from_hubo([
        (vec!["x", "y", "z"], 4.0),
        (vec!["y", "x"], -2.0),
        (vec!["z"], 1.0),
    ])?;
    println!(
        "HUBO: {} variables, {} terms, degree {}",
        hubo.num_variables(),
        hubo.num_interactions(),
        hubo.degree()
    );

    let spin = hubo.to_vartype(Vartype::Spin)?;
    println!("Expanded into {} spin terms:", spin.num_interactions());
    for (key, value) in spin.key_list().iter().zip(spin.value_list()) {
        println!("  {key:?} => {value}");
    }
    println!("  offset => {}", spin.offset());

    let serializable = spin.to_serializable();
    println!(
        "Serializable form: {} labels, {} keys, vartype {}",
        serializable.variable_labels.len(),
        serializable.poly_key_distance_list.len(),
        serializable.variable_type
    );

    #[cfg(feature = "serde")]
    match spin.to_json() {
        Ok(json) => println!("JSON: {json}"),
        Err(e) => println!("JSON export failed: {e}"),
    }
    Ok(())
}

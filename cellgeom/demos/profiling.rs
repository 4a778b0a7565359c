use cellgeom::{Lattice, Vector3D, PeriodicNeighbors};
use cellgeom::coords::{lattice_points_in_supercell, pbc_all_distances};

#[derive(serde::Deserialize)]
struct Structure {
    lattice: Lattice,
    fractional: Vec<Vector3D>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "tests/data/rocksalt.json".into());

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    let structure: Structure = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let n_neighbors = time_graph::spanned!("Full calculation", {
        neighbors_in_supercell(&structure)?
    });
    println!("found {} pairs of neighbors", n_neighbors);

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Build a 4x4x4 supercell of the structure, and compute the neighbor lists
/// and full distance matrix in this supercell
fn neighbors_in_supercell(structure: &Structure) -> Result<usize, Box<dyn std::error::Error>> {
    let size = 4;
    let transform = [[size, 0, 0], [0, size, 0], [0, 0, size]];
    let points = lattice_points_in_supercell(&transform)?;

    let lattice = Lattice::new(structure.lattice.matrix() * size as f64)?;
    let mut sites = Vec::new();
    for &point in &points {
        for &site in &structure.fractional {
            sites.push(site / size as f64 + point);
        }
    }

    let parameters = PeriodicNeighbors::from_json(r#"{"cutoff": 5.0}"#)?;
    let neighbors = parameters.compute(&lattice, &sites)?;

    let distances = pbc_all_distances(&lattice, &sites, &sites);
    assert_eq!(distances.shape(), [sites.len(), sites.len()]);

    Ok(neighbors.iter().map(|list| list.len()).sum())
}

//! Sweeps a kappa six-circle from (0, 0, 1) to (0, 1, 1) and prints the
//! motor positions in degrees.
//!
//! Run with `RUST_LOG=gonio_engines=debug` to see each inverse solve.

use std::error::Error;

use gonio_engines::{EngineCollection, trajectory};
use gonio_geometry::{Detector, DiffractometerType, Geometry, Lattice, Sample};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let kind = DiffractometerType::K6C;
    let mut geometry = Geometry::new(kind);
    let initial: Vec<f64> = [0.0_f64, 120.0, 0.0, -90.0, 0.0, 60.0]
        .iter()
        .map(|v| v.to_radians())
        .collect();
    geometry.set_axis_values(&initial)?;

    let mut collection = EngineCollection::new(kind);
    collection.initialize(
        geometry,
        Detector::zero_d(),
        Sample::new("cubic", Lattice::cubic(1.54)),
    )?;

    let hkl = collection.engine_by_name("hkl")?;
    let targets = trajectory::linspace(&[0.0, 0.0, 1.0], &[0.0, 1.0, 1.0], 11)?;
    let path = trajectory::sweep_unobserved(&mut collection, hkl, &targets)?;

    println!("{:>18}  {}", "h k l", path.axis_names.join("  "));
    for point in &path.points {
        let hkl = format!(
            "{:.1} {:.1} {:.1}",
            point.target[0], point.target[1], point.target[2]
        );
        let angles: Vec<String> = point
            .axis_values
            .iter()
            .map(|v| format!("{:>9.4}", v.to_degrees()))
            .collect();
        println!("{hkl:>18}  {}", angles.join(" "));
    }
    if !path.skipped.is_empty() {
        println!("unreachable targets: {:?}", path.skipped);
    }

    Ok(())
}

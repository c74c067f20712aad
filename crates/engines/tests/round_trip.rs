//! `inverse(forward(state))` recovers `state` for every model and mode.

use nalgebra::{UnitQuaternion, Vector3};

use gonio_engines::{
    Context, EngineCollection, HklEngine, PseudoAxisEngine, PsiEngine,
    kappa::{self, Branch},
};
use gonio_geometry::{Detector, DiffractometerType, Geometry, Lattice, Sample, angle};

/// Eulerian start angles `[omega, chi, phi, tth]`.
const START: [f64; 4] = [0.3, 0.5, -1.2, 0.9];

fn triclinic() -> Sample {
    let mut sample = Sample::new("triclinic", Lattice::new(3.1, 4.2, 5.3, 1.4, 1.7, 1.5));
    sample.set_orientation(0.2, -0.4, 0.9);
    sample
}

/// Writes eulerian angles onto the axes of `kind`.
fn axes_of(kind: DiffractometerType, [omega, chi, phi, tth]: [f64; 4]) -> Vec<f64> {
    let sample_axes = if kind.is_kappa() {
        kappa::from_eulerian([omega, chi, phi], Branch::Positive).expect("chi within reach")
    } else {
        [omega, chi, phi]
    };

    match kind {
        DiffractometerType::E4CV | DiffractometerType::K4CV => {
            vec![sample_axes[0], sample_axes[1], sample_axes[2], tth]
        }
        DiffractometerType::E6C | DiffractometerType::K6C => {
            vec![0.0, sample_axes[0], sample_axes[1], sample_axes[2], 0.0, tth]
        }
    }
}

fn collection_at(kind: DiffractometerType, values: &[f64]) -> EngineCollection {
    let mut geometry = Geometry::new(kind);
    geometry.set_axis_values(values).expect("model length");

    let mut collection = EngineCollection::new(kind);
    collection
        .initialize(geometry, Detector::zero_d(), triclinic())
        .expect("fresh collection");
    collection
}

fn assert_recovers(collection: &mut EngineCollection, engine: &str, mode: &str) {
    let id = collection.engine_by_name(engine).expect("known engine");
    collection.select_mode(id, mode).expect("known mode");

    let start = collection.geometry().expect("initialized").axis_values();
    let target = collection.forward(id).expect("valid geometry");
    let solutions = collection.inverse(id, &target).expect("valid target");

    let kind = collection.kind();
    assert!(
        solutions.iter().any(|solution| {
            solution
                .axis_values()
                .iter()
                .zip(&start)
                .all(|(a, b)| angle::distance(*a, *b) < 1e-6)
        }),
        "{kind} {engine}/{mode}: {start:?} not among {} solutions",
        solutions.len()
    );

    let mut moved = collection.geometry().expect("initialized").clone();
    let detector = *collection.detector().expect("initialized");
    let sample = collection.sample().expect("initialized").clone();
    let engine = collection.engine(id).expect("own handle");
    for solution in &solutions {
        moved
            .set_axis_values(solution.axis_values())
            .expect("model length");
        let reached = engine
            .forward(Context::new(&moved, &detector, &sample))
            .expect("valid geometry");
        for (got, want) in reached.iter().zip(&target) {
            assert!(angle::distance(*got, *want) < 1e-6, "{kind} {mode}: {reached:?}");
        }
    }
}

/// Sets `psi` to the azimuth the start already has for `(h2, k2, l2)`.
fn hold_current_azimuth(collection: &mut EngineCollection) {
    let hkl = collection.engine_by_name("hkl").expect("hkl engine");
    let psi = collection.engine_by_name("psi").expect("psi engine");

    for (reference, name) in [("h1", "h2"), ("k1", "k2"), ("l1", "l2")] {
        let value = collection
            .engine(hkl)
            .and_then(|engine| engine.parameter(name))
            .expect("psi_constant parameter");
        collection
            .set_parameter(psi, reference, value)
            .expect("psi parameter");
    }
    let azimuth = collection.forward(psi).expect("defined azimuth")[0];
    collection
        .set_parameter(hkl, "psi", azimuth)
        .expect("psi_constant parameter");
}

/// Picks `(h2, k2, l2)` on the Ewald sphere of the start, out of the
/// vertical scattering plane.
fn diffract_a_second_reflection(collection: &mut EngineCollection) {
    let geometry = collection.geometry().expect("initialized");
    let ub = collection
        .sample()
        .expect("initialized")
        .ub()
        .expect("valid lattice");
    let rub = geometry.sample_rotation().to_rotation_matrix().matrix() * ub;

    let ki = geometry.ki();
    let kf = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.6) * ki;
    let second = rub.try_inverse().expect("invertible orientation") * (kf - ki);

    let hkl = collection.engine_by_name("hkl").expect("hkl engine");
    for (name, value) in ["h2", "k2", "l2"].into_iter().zip(second.iter()) {
        collection
            .set_parameter(hkl, name, *value)
            .expect("double_diffraction parameter");
    }
}

#[test]
fn hkl_modes_recover_the_start() {
    for kind in DiffractometerType::ALL {
        for &mode in HklEngine::new(kind).modes() {
            let start = if mode.starts_with("bissector") {
                [START[3] / 2.0, START[1], START[2], START[3]]
            } else {
                START
            };
            let mut collection = collection_at(kind, &axes_of(kind, start));

            let hkl = collection.engine_by_name("hkl").expect("hkl engine");
            collection.select_mode(hkl, mode).expect("known mode");
            if mode.starts_with("psi_constant") {
                hold_current_azimuth(&mut collection);
            } else if mode.starts_with("double_diffraction") {
                diffract_a_second_reflection(&mut collection);
            }

            assert_recovers(&mut collection, "hkl", mode);
        }
    }
}

#[test]
fn psi_recovers_the_start() {
    for kind in DiffractometerType::ALL {
        let mut collection = collection_at(kind, &axes_of(kind, START));
        let mode = PsiEngine::new(kind).mode();
        assert_recovers(&mut collection, "psi", mode);
    }
}

#[test]
fn psi_constant_keeps_the_azimuth() {
    let kind = DiffractometerType::E4CV;
    let mut collection = collection_at(kind, &axes_of(kind, START));
    let hkl = collection.engine_by_name("hkl").expect("hkl engine");
    let psi = collection.engine_by_name("psi").expect("psi engine");
    collection.select_mode(hkl, "psi_constant").expect("four-circle mode");
    hold_current_azimuth(&mut collection);

    let azimuth = collection.forward(psi).expect("defined azimuth")[0];
    let solutions = collection.inverse(hkl, &[0.5, -0.5, 1.0]).expect("valid target");
    assert!(!solutions.is_empty());

    let mut moved = collection.geometry().expect("initialized").clone();
    let detector = *collection.detector().expect("initialized");
    let sample = collection.sample().expect("initialized").clone();
    let engine = collection.engine(psi).expect("own handle");
    for solution in &solutions {
        moved
            .set_axis_values(solution.axis_values())
            .expect("model length");
        let reached = engine
            .forward(Context::new(&moved, &detector, &sample))
            .expect("defined azimuth")[0];
        assert!(angle::distance(reached, azimuth) < 1e-8, "{reached} != {azimuth}");
    }
}

#[test]
fn q_recovers_the_start() {
    for kind in DiffractometerType::ALL {
        let mut collection = collection_at(kind, &axes_of(kind, START));
        assert_recovers(&mut collection, "q", "q");
    }
}

#[test]
fn eulerians_recover_the_start_on_kappa_models() {
    for kind in [DiffractometerType::K4CV, DiffractometerType::K6C] {
        let mut collection = collection_at(kind, &axes_of(kind, START));
        assert_recovers(&mut collection, "eulerians", "eulerians");
    }
}

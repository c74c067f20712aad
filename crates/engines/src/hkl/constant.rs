use std::convert::Infallible;

use nalgebra::Vector3;
use tracing::trace;

use gonio_core::EquationProblem;
use gonio_solvers::equation::newton;

use crate::{
    Context,
    four_circle::{self, DUPLICATE_TOL, FourCircle, NULL_Q, SEEDS, Scattering},
    vertical::Eulerian,
};

use super::Fixed;

/// Drives `R · qs - Q` to zero with one eulerian angle held fixed.
///
/// The solver variables are the two free sample angles, outermost first,
/// followed by `tth`.
struct FixedAngle {
    fixed: Fixed,
    value: f64,
    qs: Vector3<f64>,
}

impl EquationProblem<3> for FixedAngle {
    type Input = Eulerian;
    type Output = Scattering;
    type Error = Infallible;

    fn input(&self, &[a, b, tth]: &[f64; 3]) -> Result<Eulerian, Self::Error> {
        let value = self.value;
        Ok(match self.fixed {
            Fixed::Omega => Eulerian {
                omega: value,
                chi: a,
                phi: b,
                tth,
            },
            Fixed::Chi => Eulerian {
                omega: a,
                chi: value,
                phi: b,
                tth,
            },
            Fixed::Phi => Eulerian {
                omega: a,
                chi: b,
                phi: value,
                tth,
            },
        })
    }

    fn residuals(&self, _input: &Eulerian, output: &Scattering) -> Result<[f64; 3], Self::Error> {
        let miss = output.sample_rotation * self.qs - output.q();
        Ok([miss.x, miss.y, miss.z])
    }
}

/// Solves for the distinct eulerian configurations reaching `qs` with the
/// `fixed` angle held at its value in `current`.
pub(super) fn solve(
    context: Context<'_>,
    current: Eulerian,
    qs: &Vector3<f64>,
    fixed: Fixed,
    config: &newton::Config,
) -> Vec<Eulerian> {
    let q = qs.norm();
    let Some(two_theta) = four_circle::two_theta(q, context.geometry.source().wave_number())
    else {
        return Vec::new();
    };
    if q < NULL_Q {
        return vec![Eulerian { tth: 0.0, ..current }.wrapped()];
    }

    let problem = FixedAngle {
        fixed,
        value: match fixed {
            Fixed::Omega => current.omega,
            Fixed::Chi => current.chi,
            Fixed::Phi => current.phi,
        },
        qs: *qs,
    };
    let model = FourCircle::new(context);

    let mut solutions: Vec<Eulerian> = Vec::new();
    for tth in [two_theta, -two_theta] {
        for a in SEEDS {
            for b in SEEDS {
                match newton::solve_unobserved(&model, &problem, [a, b, tth], config) {
                    Ok(solution) if solution.is_converged() => {
                        let found = solution.snapshot.input.wrapped();
                        if !solutions.iter().any(|s| s.is_close(&found, DUPLICATE_TOL)) {
                            solutions.push(found);
                        }
                    }
                    Ok(solution) => trace!(status = ?solution.status, "seed did not converge"),
                    Err(error) => trace!(%error, "seed failed"),
                }
            }
        }
    }

    solutions
}

#[cfg(test)]
mod tests {
    use super::*;

    use gonio_geometry::{Detector, DiffractometerType, Geometry, Lattice, Sample, angle};

    use crate::{PseudoAxisEngine, hkl::HklEngine, vertical};

    fn triclinic() -> Sample {
        let mut sample = Sample::new(
            "triclinic",
            Lattice::new(3.1, 4.2, 5.3, 1.4, 1.7, 1.5),
        );
        sample.set_orientation(0.2, -0.4, 0.9);
        sample
    }

    fn check_mode(mode: &str, fixed_index: usize) {
        let start = [0.3, 0.5, -1.2, 0.9];
        let mut geometry = Geometry::new(DiffractometerType::E4CV);
        geometry.set_axis_values(&start).expect("four angles");
        let detector = Detector::zero_d();
        let sample = triclinic();
        let context = Context::new(&geometry, &detector, &sample);

        let mut engine = HklEngine::new(DiffractometerType::E4CV);
        engine.select_mode(mode).expect("four-circle mode");
        let target = engine.forward(context).expect("valid context");

        let solutions = engine.inverse(context, &target).expect("valid target");
        assert!(!solutions.is_empty(), "{mode}: no solutions");

        let mut found_start = false;
        for values in &solutions {
            assert!(angle::distance(values[fixed_index], start[fixed_index]) < 1e-9);

            let mut moved = geometry.clone();
            moved.set_axis_values(values).expect("four angles");
            let reached = engine
                .forward(context.with_geometry(&moved))
                .expect("valid context");
            for (r, t) in reached.iter().zip(&target) {
                assert!((r - t).abs() < 1e-8, "{mode}: {reached:?} != {target:?}");
            }

            found_start |= values
                .iter()
                .zip(start)
                .all(|(v, s)| angle::distance(*v, s) < 1e-6);
        }
        assert!(found_start, "{mode}: starting position not recovered");
    }

    #[test]
    fn constant_omega_keeps_omega() {
        check_mode("constant_omega", 0);
    }

    #[test]
    fn constant_chi_keeps_chi() {
        check_mode("constant_chi", 1);
    }

    #[test]
    fn constant_phi_keeps_phi() {
        check_mode("constant_phi", 2);
    }

    #[test]
    fn unreachable_targets_yield_nothing() {
        let geometry = Geometry::new(DiffractometerType::E4CV);
        let detector = Detector::zero_d();
        let sample = Sample::default();
        let context = Context::new(&geometry, &detector, &sample);

        let far = Vector3::new(0.0, 0.0, 100.0);
        let current = vertical::project(&geometry).expect("vertical axes");
        let solutions = solve(context, current, &far, Fixed::Chi, &newton::Config::default());
        assert!(solutions.is_empty());
    }
}

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use gonio_geometry::{Detector, DiffractometerType, Geometry, Range, Sample, Source, angle};
use gonio_solvers::equation::newton;

use crate::{
    Context, EngineId, Error, EuleriansEngine, HklEngine, PseudoAxisEngine, PsiEngine, QEngine,
    Solution, engine::check_model,
};

/// Largest pseudo-axis error a candidate may show when read back.
const VERIFY_TOL: f64 = 1e-6;

/// Candidates closer than this (per axis) are reported once.
const DUPLICATE_TOL: f64 = 1e-7;

/// Source of collection identities; solutions carry the one they came from.
static NEXT_COLLECTION: AtomicU64 = AtomicU64::new(0);

/// The engines of one diffractometer and the context they share.
///
/// Every engine solves against the same geometry, detector, and sample, and
/// [`EngineCollection::select_solution`] is the only way an inverse solve
/// writes to the geometry.
#[derive(Debug)]
pub struct EngineCollection {
    id: u64,
    kind: DiffractometerType,
    engines: Vec<Box<dyn PseudoAxisEngine>>,
    bound: Option<Bound>,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Bound {
    geometry: Geometry,
    detector: Detector,
    sample: Sample,
}

impl Bound {
    fn context(&self) -> Context<'_> {
        Context::new(&self.geometry, &self.detector, &self.sample)
    }
}

impl EngineCollection {
    /// Creates the engines of a kinematic model.
    ///
    /// Every model has `hkl`, `q`, and `psi`; kappa models also have
    /// `eulerians`.
    #[must_use]
    pub fn new(kind: DiffractometerType) -> Self {
        Self::with_solver_config(kind, newton::Config::default())
    }

    /// Creates the engines of a kinematic model, with the Newton settings
    /// used by every numerical mode.
    #[must_use]
    pub fn with_solver_config(kind: DiffractometerType, config: newton::Config) -> Self {
        let mut engines: Vec<Box<dyn PseudoAxisEngine>> =
            vec![Box::new(HklEngine::new(kind).with_solver_config(config))];
        if kind.is_kappa() {
            engines.push(Box::new(EuleriansEngine::new()));
        }
        engines.push(Box::new(QEngine::new(kind)));
        engines.push(Box::new(PsiEngine::new(kind).with_solver_config(config)));

        Self {
            id: NEXT_COLLECTION.fetch_add(1, Ordering::Relaxed),
            kind,
            engines,
            bound: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> DiffractometerType {
        self.kind
    }

    /// Binds the shared context. Must be called exactly once before solving.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyInitialized`] on a second call,
    /// [`Error::DimensionMismatch`] if the geometry has the wrong number of
    /// axes, and [`Error::GeometryUnreachable`] if it is another model.
    pub fn initialize(
        &mut self,
        geometry: Geometry,
        detector: Detector,
        sample: Sample,
    ) -> Result<(), Error> {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }

        let expected = self.kind.axis_names().len();
        if geometry.axis_count() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: geometry.axis_count(),
            });
        }
        check_model(self.kind, &geometry)?;

        debug!(
            kind = %self.kind,
            sample = sample.name(),
            engines = ?self.engine_names(),
            "engine collection initialized"
        );
        self.bound = Some(Bound {
            geometry,
            detector,
            sample,
        });
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.bound.is_some()
    }

    /// Returns the engine names, in handle order.
    #[must_use]
    pub fn engine_names(&self) -> Vec<&'static str> {
        self.engines.iter().map(|engine| engine.name()).collect()
    }

    /// Resolves an engine name to a handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngine`] if the collection has no such engine.
    pub fn engine_by_name(&self, name: &str) -> Result<EngineId, Error> {
        self.engines
            .iter()
            .position(|engine| engine.name() == name)
            .map(EngineId)
            .ok_or_else(|| Error::UnknownEngine {
                name: name.to_owned(),
            })
    }

    /// Returns the engine behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngine`] for a handle from another collection.
    pub fn engine(&self, id: EngineId) -> Result<&dyn PseudoAxisEngine, Error> {
        match self.engines.get(id.0) {
            Some(engine) => Ok(engine.as_ref()),
            None => Err(unknown_handle(id)),
        }
    }

    /// Returns the engine behind a handle, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngine`] for a handle from another collection.
    pub fn engine_mut(&mut self, id: EngineId) -> Result<&mut dyn PseudoAxisEngine, Error> {
        match self.engines.get_mut(id.0) {
            Some(engine) => Ok(engine.as_mut()),
            None => Err(unknown_handle(id)),
        }
    }

    /// Switches an engine to another mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngine`] or [`Error::UnknownMode`].
    pub fn select_mode(&mut self, id: EngineId, mode: &str) -> Result<(), Error> {
        self.engine_mut(id)?.select_mode(mode)
    }

    /// Sets a parameter of an engine's current mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEngine`] or [`Error::UnknownParameter`].
    pub fn set_parameter(&mut self, id: EngineId, name: &str, value: f64) -> Result<(), Error> {
        self.engine_mut(id)?.set_parameter(name, value)
    }

    /// Returns the shared geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`EngineCollection::initialize`].
    pub fn geometry(&self) -> Result<&Geometry, Error> {
        Ok(&self.bound()?.geometry)
    }

    /// Moves one axis of the shared geometry.
    ///
    /// Outstanding solutions become stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] or [`Error::UnknownAxis`].
    pub fn set_axis_value(&mut self, name: &str, value: f64) -> Result<(), Error> {
        self.bound_mut()?.geometry.set_axis_value(name, value)?;
        self.generation += 1;
        Ok(())
    }

    /// Restricts the values an axis may take in inverse solutions.
    ///
    /// Outstanding solutions become stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] or [`Error::UnknownAxis`].
    pub fn set_axis_range(&mut self, name: &str, range: Range) -> Result<(), Error> {
        self.bound_mut()?.geometry.set_axis_range(name, range)?;
        self.generation += 1;
        Ok(())
    }

    /// Replaces the incident beam.
    ///
    /// Outstanding solutions become stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`EngineCollection::initialize`].
    pub fn set_source(&mut self, source: Source) -> Result<(), Error> {
        self.bound_mut()?.geometry.set_source(source);
        self.generation += 1;
        Ok(())
    }

    /// Returns the shared detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`EngineCollection::initialize`].
    pub fn detector(&self) -> Result<&Detector, Error> {
        Ok(&self.bound()?.detector)
    }

    /// Returns the shared sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`EngineCollection::initialize`].
    pub fn sample(&self) -> Result<&Sample, Error> {
        Ok(&self.bound()?.sample)
    }

    /// Returns the shared sample, mutably.
    ///
    /// Outstanding solutions become stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`EngineCollection::initialize`].
    pub fn sample_mut(&mut self) -> Result<&mut Sample, Error> {
        let bound = self.bound.as_mut().ok_or(Error::NotInitialized)?;
        self.generation += 1;
        Ok(&mut bound.sample)
    }

    /// Computes an engine's pseudo-axis values for the current geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`], [`Error::UnknownEngine`], or the
    /// engine's own error.
    pub fn forward(&self, id: EngineId) -> Result<Vec<f64>, Error> {
        let bound = self.bound()?;
        self.engine(id)?.forward(bound.context())
    }

    /// Enumerates the solutions reaching `target` with an engine.
    ///
    /// Candidates are fitted into the axis ranges, read back through the
    /// engine's forward mapping, and de-duplicated; the ones that fail are
    /// dropped. An empty list means the target is unreachable. Each call
    /// starts a new generation, so older solutions become stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`], [`Error::UnknownEngine`],
    /// [`Error::DimensionMismatch`] for a wrong-length target, or
    /// [`Error::GeometryUnreachable`] for a non-finite target or an unusable
    /// sample.
    pub fn inverse(&mut self, id: EngineId, target: &[f64]) -> Result<Vec<Solution>, Error> {
        let bound = self.bound.as_ref().ok_or(Error::NotInitialized)?;
        let engine = self
            .engines
            .get(id.0)
            .ok_or_else(|| unknown_handle(id))?;
        let context = bound.context();

        let candidates = engine.inverse(context, target)?;
        let raw = candidates.len();

        let mut kept: Vec<Vec<f64>> = Vec::with_capacity(raw);
        let mut moved = bound.geometry.clone();
        for candidate in candidates {
            let Some(fitted) = bound.geometry.fit_to_ranges(&candidate)? else {
                trace!(?candidate, "candidate outside axis ranges");
                continue;
            };

            moved.set_axis_values(&fitted)?;
            let reached = match engine.forward(context.with_geometry(&moved)) {
                Ok(reached) => reached,
                Err(error) => {
                    trace!(?fitted, %error, "candidate cannot be read back");
                    continue;
                }
            };
            if !reproduces(&reached, target, engine.is_angular()) {
                trace!(?fitted, ?reached, "candidate misses the target");
                continue;
            }

            if kept.iter().any(|existing| is_same(existing, &fitted)) {
                continue;
            }
            kept.push(fitted);
        }

        debug!(
            engine = engine.name(),
            mode = engine.mode(),
            ?target,
            raw,
            kept = kept.len(),
            "inverse solve"
        );

        self.generation += 1;
        let generation = self.generation;
        Ok(kept
            .into_iter()
            .map(|axis_values| Solution {
                collection: self.id,
                engine: id,
                generation,
                axis_values,
            })
            .collect())
    }

    /// Commits a solution of the latest inverse solve to the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`], [`Error::StaleSolution`] for a
    /// solution from an earlier solve or from another collection, or
    /// [`Error::DimensionMismatch`].
    pub fn select_solution(&mut self, solution: &Solution) -> Result<(), Error> {
        let (id, generation) = (self.id, self.generation);
        let bound = self.bound_mut()?;
        if solution.collection != id || solution.generation != generation {
            return Err(Error::StaleSolution);
        }
        bound.geometry.set_axis_values(&solution.axis_values)?;
        Ok(())
    }

    fn bound(&self) -> Result<&Bound, Error> {
        self.bound.as_ref().ok_or(Error::NotInitialized)
    }

    fn bound_mut(&mut self) -> Result<&mut Bound, Error> {
        self.bound.as_mut().ok_or(Error::NotInitialized)
    }
}

fn unknown_handle(id: EngineId) -> Error {
    Error::UnknownEngine {
        name: format!("#{}", id.index()),
    }
}

fn reproduces(reached: &[f64], target: &[f64], angular: bool) -> bool {
    reached.len() == target.len()
        && reached.iter().zip(target).all(|(&r, &t)| {
            let miss = if angular {
                angle::distance(r, t)
            } else {
                (r - t).abs()
            };
            miss <= VERIFY_TOL * t.abs().max(1.0)
        })
}

fn is_same(a: &[f64], b: &[f64]) -> bool {
    a.iter()
        .zip(b)
        .all(|(&x, &y)| angle::distance(x, y) < DUPLICATE_TOL)
}

#[cfg(test)]
mod tests {
    use super::*;

    use gonio_geometry::Lattice;

    use crate::Unreachable;

    fn initialized(kind: DiffractometerType) -> EngineCollection {
        let mut collection = EngineCollection::new(kind);
        collection
            .initialize(Geometry::new(kind), Detector::zero_d(), Sample::default())
            .expect("fresh collection");
        collection
    }

    #[test]
    fn engines_follow_the_model() {
        assert_eq!(
            EngineCollection::new(DiffractometerType::E4CV).engine_names(),
            ["hkl", "q", "psi"]
        );
        assert_eq!(
            EngineCollection::new(DiffractometerType::K6C).engine_names(),
            ["hkl", "eulerians", "q", "psi"]
        );
    }

    #[test]
    fn solving_requires_initialization() {
        let mut collection = EngineCollection::new(DiffractometerType::E4CV);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");

        assert_eq!(collection.inverse(hkl, &[0.0, 0.0, 1.0]), Err(Error::NotInitialized));
        assert_eq!(collection.forward(hkl), Err(Error::NotInitialized));
        assert!(collection.geometry().is_err());
    }

    #[test]
    fn initializes_exactly_once_with_a_matching_geometry() {
        let mut collection = EngineCollection::new(DiffractometerType::K4CV);

        assert_eq!(
            collection.initialize(
                Geometry::new(DiffractometerType::K6C),
                Detector::zero_d(),
                Sample::default()
            ),
            Err(Error::DimensionMismatch {
                expected: 4,
                found: 6
            })
        );
        assert!(matches!(
            collection.initialize(
                Geometry::new(DiffractometerType::E4CV),
                Detector::zero_d(),
                Sample::default()
            ),
            Err(Error::GeometryUnreachable {
                reason: Unreachable::ModelMismatch { .. }
            })
        ));

        collection
            .initialize(
                Geometry::new(DiffractometerType::K4CV),
                Detector::zero_d(),
                Sample::default(),
            )
            .expect("matching geometry");
        assert_eq!(
            collection.initialize(
                Geometry::new(DiffractometerType::K4CV),
                Detector::zero_d(),
                Sample::default()
            ),
            Err(Error::AlreadyInitialized)
        );
    }

    #[test]
    fn unknown_engine_names_fail() {
        let collection = initialized(DiffractometerType::E4CV);
        assert_eq!(
            collection.engine_by_name("q2"),
            Err(Error::UnknownEngine { name: "q2".into() })
        );
        assert_eq!(
            collection.engine(EngineId(7)).map(|engine| engine.name()),
            Err(Error::UnknownEngine { name: "#7".into() })
        );
    }

    #[test]
    fn inverse_rejects_wrong_length_targets() {
        let mut collection = initialized(DiffractometerType::E6C);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");

        for target in [&[1.0][..], &[0.0, 0.0, 1.0, 0.0][..]] {
            assert_eq!(
                collection.inverse(hkl, target),
                Err(Error::DimensionMismatch {
                    expected: 3,
                    found: target.len()
                })
            );
        }
    }

    #[test]
    fn inverse_does_not_move_the_geometry() {
        let mut collection = initialized(DiffractometerType::E4CV);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");

        let solutions = collection.inverse(hkl, &[0.0, 0.0, 1.0]).expect("valid target");
        assert_eq!(solutions.len(), 4);
        assert_eq!(
            collection.geometry().expect("initialized").axis_values(),
            vec![0.0; 4]
        );

        collection.select_solution(&solutions[0]).expect("fresh solution");
        assert_eq!(
            collection.geometry().expect("initialized").axis_values(),
            solutions[0].axis_values()
        );
        let hkl_now = collection.forward(hkl).expect("initialized");
        assert!((hkl_now[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stale_solutions_are_rejected() {
        let mut collection = initialized(DiffractometerType::E4CV);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");
        let q = collection.engine_by_name("q").expect("q engine");

        let old = collection.inverse(hkl, &[0.0, 0.0, 1.0]).expect("valid target");
        let _ = collection.inverse(q, &[2.0]).expect("valid target");

        assert_eq!(collection.select_solution(&old[0]), Err(Error::StaleSolution));
        assert_eq!(
            collection.geometry().expect("initialized").axis_values(),
            vec![0.0; 4]
        );
    }

    #[test]
    fn solutions_from_another_collection_are_rejected() {
        let mut e4cv = initialized(DiffractometerType::E4CV);
        let mut k4cv = initialized(DiffractometerType::K4CV);
        let e4cv_hkl = e4cv.engine_by_name("hkl").expect("hkl engine");
        let k4cv_hkl = k4cv.engine_by_name("hkl").expect("hkl engine");

        let foreign = e4cv.inverse(e4cv_hkl, &[0.0, 0.0, 1.0]).expect("valid target");
        let _ = k4cv.inverse(k4cv_hkl, &[0.0, 0.0, 1.0]).expect("valid target");

        assert_eq!(k4cv.select_solution(&foreign[0]), Err(Error::StaleSolution));
        assert_eq!(
            k4cv.geometry().expect("initialized").axis_values(),
            vec![0.0; 4]
        );
        e4cv.select_solution(&foreign[0]).expect("own solution");
    }

    #[test]
    fn geometry_changes_make_solutions_stale() {
        let mut collection = initialized(DiffractometerType::E4CV);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");

        let solutions = collection.inverse(hkl, &[0.0, 0.0, 1.0]).expect("valid target");
        collection.set_axis_value("chi", 0.2).expect("known axis");
        assert_eq!(collection.select_solution(&solutions[0]), Err(Error::StaleSolution));

        assert_eq!(
            collection.set_axis_value("delta", 0.2),
            Err(Error::UnknownAxis {
                name: "delta".into()
            })
        );
        let source = Source::new(1.0).expect("positive wavelength");
        collection.set_source(source).expect("initialized");
        assert_eq!(
            collection.geometry().expect("initialized").source().wavelength(),
            1.0
        );
    }

    #[test]
    fn mutators_require_initialization() {
        let mut collection = EngineCollection::new(DiffractometerType::K6C);
        assert_eq!(
            collection.set_axis_value("delta", 0.2),
            Err(Error::NotInitialized)
        );
        assert_eq!(
            collection.set_axis_range("delta", Range::default()),
            Err(Error::NotInitialized)
        );
        assert!(collection.sample_mut().is_err());
    }

    #[test]
    fn constant_modes_follow_the_solver_config() {
        let config = newton::Config::new(0, 1e-10, 1e-14, 1e-7, 30).expect("valid config");
        let mut collection = EngineCollection::with_solver_config(DiffractometerType::E4CV, config);
        let mut geometry = Geometry::new(DiffractometerType::E4CV);
        geometry
            .set_axis_values(&[0.3, 0.5, -1.2, 0.9])
            .expect("four angles");
        collection
            .initialize(geometry, Detector::zero_d(), Sample::default())
            .expect("fresh collection");

        let hkl = collection.engine_by_name("hkl").expect("hkl engine");
        let target = collection.forward(hkl).expect("initialized");

        collection.select_mode(hkl, "constant_chi").expect("four-circle mode");
        assert!(collection.inverse(hkl, &target).expect("valid target").is_empty());

        collection.select_mode(hkl, "bissector").expect("four-circle mode");
        assert!(!collection.inverse(hkl, &[0.0, 0.0, 1.0]).expect("valid target").is_empty());
    }

    #[test]
    fn axis_ranges_filter_candidates() {
        let mut collection = initialized(DiffractometerType::E4CV);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");

        // Only the positive-tth branches survive.
        collection
            .set_axis_range("tth", Range::new(0.0, std::f64::consts::PI).expect("valid range"))
            .expect("known axis");

        let solutions = collection.inverse(hkl, &[0.0, 0.0, 1.0]).expect("valid target");
        assert_eq!(solutions.len(), 2);
        assert!(solutions.iter().all(|s| s.axis_values()[3] > 0.0));
    }

    #[test]
    fn degenerate_lattices_are_structural_failures() {
        let mut collection = initialized(DiffractometerType::E4CV);
        let hkl = collection.engine_by_name("hkl").expect("hkl engine");

        let angle = 5.0 * std::f64::consts::PI / 6.0;
        collection
            .sample_mut()
            .expect("initialized")
            .set_lattice(Lattice::new(1.0, 1.0, 1.0, angle, angle, angle));

        assert!(matches!(
            collection.inverse(hkl, &[0.0, 0.0, 1.0]),
            Err(Error::GeometryUnreachable {
                reason: Unreachable::Lattice(_)
            })
        ));
    }
}

use gonio_geometry::{Detector, Geometry, Sample};

/// The geometry, detector, and sample an engine solves against.
///
/// Engines only ever borrow the context; the collection owns it.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub geometry: &'a Geometry,
    pub detector: &'a Detector,
    pub sample: &'a Sample,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(geometry: &'a Geometry, detector: &'a Detector, sample: &'a Sample) -> Self {
        Self {
            geometry,
            detector,
            sample,
        }
    }

    /// Returns the same detector and sample paired with another geometry.
    #[must_use]
    pub fn with_geometry<'b>(&self, geometry: &'b Geometry) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            geometry,
            detector: self.detector,
            sample: self.sample,
        }
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Indicates how a sweep terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// Every target was attempted.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// One committed step of a sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Position of the target in the sweep.
    pub index: usize,

    /// The pseudo-axis target this point reaches.
    pub target: Vec<f64>,

    /// Axis values read back from the geometry after the commit.
    pub axis_values: Vec<f64>,

    /// Number of solutions the policy chose from.
    pub candidates: usize,
}

/// The result of a trajectory sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Trajectory {
    /// How the sweep terminated.
    pub status: Status,

    /// Axis names, in the order of every point's `axis_values`.
    pub axis_names: Vec<&'static str>,

    /// Recorded points, in target order.
    pub points: Vec<Point>,

    /// Indices of the targets that produced no point.
    pub skipped: Vec<usize>,
}

impl Trajectory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the values of one axis across all points.
    #[must_use]
    pub fn axis_column(&self, name: &str) -> Option<Vec<f64>> {
        let column = self.axis_names.iter().position(|&axis| axis == name)?;
        Some(
            self.points
                .iter()
                .map(|point| point.axis_values[column])
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectory() -> Trajectory {
        Trajectory {
            status: Status::Complete,
            axis_names: vec!["omega", "chi", "phi", "tth"],
            points: vec![
                Point {
                    index: 0,
                    target: vec![0.0, 0.0, 1.0],
                    axis_values: vec![0.5, 0.0, 0.0, 1.0],
                    candidates: 4,
                },
                Point {
                    index: 2,
                    target: vec![0.0, 1.0, 1.0],
                    axis_values: vec![0.8, 0.7, 0.0, 1.6],
                    candidates: 4,
                },
            ],
            skipped: vec![1],
        }
    }

    #[test]
    fn axis_column_reads_one_axis_per_point() {
        let trajectory = trajectory();
        assert_eq!(trajectory.axis_column("tth"), Some(vec![1.0, 1.6]));
        assert_eq!(trajectory.axis_column("omega"), Some(vec![0.5, 0.8]));
        assert_eq!(trajectory.axis_column("mu"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_axis_names() {
        let json = serde_json::to_value(trajectory()).expect("serializes");
        assert_eq!(json["status"], "Complete");
        assert_eq!(json["axis_names"][3], "tth");
        assert_eq!(json["points"][1]["index"], 2);
        assert_eq!(json["skipped"][0], 1);
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::position::Coordinate;

/// Most points [`Axis::range`] will produce.
pub const MAX_AXIS_SAMPLES: usize = 1 << 16;

/// Most points [`Cuboid::inner_coordinates`] will produce.
pub const MAX_CUBOID_SAMPLES: usize = 1 << 22;

/// A closed interval on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    lower: f64,
    upper: f64,
}

impl Axis {
    /// Create an axis spanning both endpoints, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// The smaller endpoint.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// The larger endpoint.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Distance between the endpoints.
    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies inside the interval, endpoints included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Sample points from `lower` towards `upper` every `step`.
    ///
    /// The upper endpoint is always included, even when the span is not a
    /// multiple of `step`.
    pub fn range(&self, step: f64) -> CoreResult<Vec<f64>> {
        if !step.is_finite() || step <= 0.0 {
            return Err(CoreError::InvalidStep(step));
        }
        let steps = (self.length() / step).ceil();
        if steps.is_nan() || steps >= MAX_AXIS_SAMPLES as f64 {
            return Err(CoreError::TooManySamples {
                requested: steps + 1.0,
                limit: MAX_AXIS_SAMPLES,
            });
        }
        let mut points: Vec<f64> = (0..steps as usize)
            .map(|i| self.lower + i as f64 * step)
            .take_while(|value| *value < self.upper)
            .collect();
        points.push(self.upper);
        Ok(points)
    }
}

/// An axis-aligned box between two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    min: Coordinate,
    max: Coordinate,
}

impl Cuboid {
    /// Create a cuboid from any two opposite corners.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min: Coordinate::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Coordinate::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Corner with the smallest components.
    pub fn min(&self) -> Coordinate {
        self.min
    }

    /// Corner with the largest components.
    pub fn max(&self) -> Coordinate {
        self.max
    }

    /// The x extent.
    pub fn x_axis(&self) -> Axis {
        Axis::new(self.min.x, self.max.x)
    }

    /// The y extent.
    pub fn y_axis(&self) -> Axis {
        Axis::new(self.min.y, self.max.y)
    }

    /// The z extent.
    pub fn z_axis(&self) -> Axis {
        Axis::new(self.min.z, self.max.z)
    }

    /// Whether `at` lies inside the box, faces included.
    pub fn contains(&self, at: Coordinate) -> bool {
        self.x_axis().contains(at.x) && self.y_axis().contains(at.y) && self.z_axis().contains(at.z)
    }

    /// Every sampled point inside the box, x varying slowest.
    pub fn inner_coordinates(&self, step: f64) -> CoreResult<Vec<Coordinate>> {
        let xs = self.x_axis().range(step)?;
        let ys = self.y_axis().range(step)?;
        let zs = self.z_axis().range(step)?;
        let total = xs
            .len()
            .checked_mul(ys.len())
            .and_then(|n| n.checked_mul(zs.len()))
            .filter(|n| *n <= MAX_CUBOID_SAMPLES)
            .ok_or(CoreError::TooManySamples {
                requested: xs.len() as f64 * ys.len() as f64 * zs.len() as f64,
                limit: MAX_CUBOID_SAMPLES,
            })?;
        let mut out = Vec::with_capacity(total);
        for &x in &xs {
            for &y in &ys {
                for &z in &zs {
                    out.push(Coordinate::new(x, y, z));
                }
            }
        }
        Ok(out)
    }
}

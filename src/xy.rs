//! Two-component canvas vector.

use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

/// A point or size on the drawing canvas. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

impl Xy {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl ops::Add for Xy {
    type Output = Xy;

    fn add(self, rhs: Xy) -> Xy {
        Xy::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub for Xy {
    type Output = Xy;

    fn sub(self, rhs: Xy) -> Xy {
        Xy::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product.
impl ops::Mul for Xy {
    type Output = Xy;

    fn mul(self, rhs: Xy) -> Xy {
        Xy::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl ops::Mul<f64> for Xy {
    type Output = Xy;

    fn mul(self, rhs: f64) -> Xy {
        Xy::new(self.x * rhs, self.y * rhs)
    }
}

impl ops::Mul<Xy> for f64 {
    type Output = Xy;

    fn mul(self, rhs: Xy) -> Xy {
        rhs * self
    }
}

impl fmt::Display for Xy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

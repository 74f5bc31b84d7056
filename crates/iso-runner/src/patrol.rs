//! Scripted walker for the headless loop.

use iso_scene::MapObject;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Leg {
    XForward,
    YForward,
    XBack,
    YBack,
}

impl Leg {
    const fn direction(self) -> (f32, f32, f32) {
        match self {
            Self::XForward => (1.0, 0.0, 0.0),
            Self::YForward => (0.0, 1.0, 0.0),
            Self::XBack => (-1.0, 0.0, 0.0),
            Self::YBack => (0.0, -1.0, 0.0),
        }
    }
}

/// Walks an object clockwise around the square `[min, max]^2` on `z = 0`.
#[derive(Debug)]
pub struct Patrol {
    min: f32,
    max: f32,
    leg: Leg,
    laps: u32,
}

impl Patrol {
    pub const fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            leg: Leg::XForward,
            laps: 0,
        }
    }

    pub const fn laps(&self) -> u32 {
        self.laps
    }

    /// Turn at corners and point the object along the current leg.
    pub fn steer(&mut self, object: &mut MapObject) {
        let (x, y, _) = object.position();

        self.leg = match self.leg {
            Leg::XForward if x >= self.max => Leg::YForward,
            Leg::YForward if y >= self.max => Leg::XBack,
            Leg::XBack if x <= self.min => Leg::YBack,
            Leg::YBack if y <= self.min => {
                self.laps += 1;
                Leg::XForward
            }
            leg => leg,
        };

        object.set_direction(self.leg.direction());
    }
}

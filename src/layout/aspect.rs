use serde::Serialize;
use std::fmt;

/// Width-to-height regime of a target canvas. Every anchor box and text
/// shift is keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Portrait,
    Landscape,
    Square,
}

/// How much longer one side must be before a canvas stops counting as square.
pub const ASPECT_TOLERANCE: f64 = 1.2;

impl AspectClass {
    pub const ALL: [AspectClass; 3] = [
        AspectClass::Portrait,
        AspectClass::Landscape,
        AspectClass::Square,
    ];

    pub fn of(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        if h > w * ASPECT_TOLERANCE {
            AspectClass::Portrait
        } else if w > h * ASPECT_TOLERANCE {
            AspectClass::Landscape
        } else {
            AspectClass::Square
        }
    }

    pub fn is_portrait(self) -> bool {
        self == AspectClass::Portrait
    }
}

impl fmt::Display for AspectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AspectClass::Portrait => "portrait",
            AspectClass::Landscape => "landscape",
            AspectClass::Square => "square",
        })
    }
}

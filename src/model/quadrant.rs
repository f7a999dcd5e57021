use serde::Serialize;

/// Importance-Performance Analysis quadrant of a service attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quadrant {
    #[serde(rename = "Concentrate Here")]
    ConcentrateHere,
    #[serde(rename = "Good Work")]
    GoodWork,
    #[serde(rename = "Low Priority")]
    LowPriority,
    #[serde(rename = "Possible Overkill")]
    PossibleOverkill,
}

impl Quadrant {
    /// Strict comparisons only: any tie with a mean lands in
    /// `PossibleOverkill`.
    pub fn classify(
        importance: f64,
        performance: f64,
        importance_mean: f64,
        performance_mean: f64,
    ) -> Self {
        if importance > importance_mean && performance < performance_mean {
            Quadrant::ConcentrateHere
        } else if importance > importance_mean && performance > performance_mean {
            Quadrant::GoodWork
        } else if importance < importance_mean && performance < performance_mean {
            Quadrant::LowPriority
        } else {
            Quadrant::PossibleOverkill
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::ConcentrateHere => "Concentrate Here",
            Quadrant::GoodWork => "Good Work",
            Quadrant::LowPriority => "Low Priority",
            Quadrant::PossibleOverkill => "Possible Overkill",
        }
    }

    /// Chart colour as RGB.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Quadrant::ConcentrateHere => (0xd3, 0x2f, 0x2f),
            Quadrant::GoodWork => (0x4c, 0xaf, 0x50),
            Quadrant::LowPriority => (0xff, 0x98, 0x00),
            Quadrant::PossibleOverkill => (0x21, 0x96, 0xf3),
        }
    }
}

pub fn quadrant_order() -> &'static [Quadrant] {
    &[
        Quadrant::ConcentrateHere,
        Quadrant::GoodWork,
        Quadrant::LowPriority,
        Quadrant::PossibleOverkill,
    ]
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/quadrant.rs"]
mod tests;

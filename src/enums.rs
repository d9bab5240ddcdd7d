use std::fmt;

/// The five named anatomical landmarks required to define a coordinate frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandmarkName {
    Aoda,
    Ans,
    HtR,
    HtL,
    Sr,
}

impl LandmarkName {
    /// All five names in frame-construction order (AB pair, CD pair, origin).
    pub const ALL: [LandmarkName; 5] = [
        LandmarkName::Aoda,
        LandmarkName::Ans,
        LandmarkName::HtR,
        LandmarkName::HtL,
        LandmarkName::Sr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkName::Aoda => "AODA",
            LandmarkName::Ans => "ANS",
            LandmarkName::HtR => "HtR",
            LandmarkName::HtL => "HtL",
            LandmarkName::Sr => "SR",
        }
    }

    pub fn from_str(name: &str) -> Option<LandmarkName> {
        match name {
            "AODA" => Some(LandmarkName::Aoda),
            "ANS" => Some(LandmarkName::Ans),
            "HtR" => Some(LandmarkName::HtR),
            "HtL" => Some(LandmarkName::HtL),
            "SR" => Some(LandmarkName::Sr),
            _ => None,
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mirror axis for volume flips.
///
/// The variants map to the volume's x, z and y axes respectively, matching
/// the review tool's left/right, front/back and top/bottom mirroring
/// commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipAxis {
    LeftRight,
    FrontBack,
    TopBottom,
}

/// Which of the two parallel angle/origin representations a physical
/// conversion should use.
///
/// `True` keeps physical measurements consistent; `Display` is adjusted for
/// the on-screen orientation and feeds integral slice navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleVariant {
    #[default]
    True,
    Display,
}

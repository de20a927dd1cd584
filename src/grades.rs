use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Letter grades, listed best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    E,
    F,
    /// Withheld
    Wh,
    /// Not completed
    Nc,
    /// Completed module
    Cm,
}

impl Grade {
    pub const ALL: [Grade; 15] = [
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::E,
        Grade::F,
        Grade::Wh,
        Grade::Nc,
        Grade::Cm,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
            Grade::Wh => "WH",
            Grade::Nc => "NC",
            Grade::Cm => "CM",
        }
    }

    /// Failing or non-completing grades that have to be redone.
    pub fn is_mandatory_retake(self) -> bool {
        matches!(self, Grade::F | Grade::E | Grade::Wh | Grade::Nc)
    }

    /// D-range or worse. Always includes every mandatory retake grade.
    pub fn is_recommended_retake(self) -> bool {
        self.is_mandatory_retake() || matches!(self, Grade::D | Grade::DPlus)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGrade(pub String);

impl fmt::Display for UnknownGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grade symbol '{}'", self.0)
    }
}

impl std::error::Error for UnknownGrade {}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Grade::ALL
            .into_iter()
            .find(|grade| grade.symbol() == upper)
            .ok_or(UnknownGrade(upper))
    }
}

/// A grade as it appeared in the input. Unrecognized symbols are kept
/// (uppercased) so they can still be shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeSymbol {
    Known(Grade),
    Unrecognized(String),
}

impl GradeSymbol {
    pub fn parse(text: &str) -> Self {
        match text.parse::<Grade>() {
            Ok(grade) => GradeSymbol::Known(grade),
            Err(UnknownGrade(upper)) => GradeSymbol::Unrecognized(upper),
        }
    }

    pub fn grade(&self) -> Option<Grade> {
        match self {
            GradeSymbol::Known(grade) => Some(*grade),
            GradeSymbol::Unrecognized(_) => None,
        }
    }

    pub fn is_mandatory_retake(&self) -> bool {
        self.grade().is_some_and(Grade::is_mandatory_retake)
    }

    pub fn is_recommended_retake(&self) -> bool {
        self.grade().is_some_and(Grade::is_recommended_retake)
    }
}

impl From<Grade> for GradeSymbol {
    fn from(grade: Grade) -> Self {
        GradeSymbol::Known(grade)
    }
}

impl fmt::Display for GradeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeSymbol::Known(grade) => f.write_str(grade.symbol()),
            GradeSymbol::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl Serialize for GradeSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Grade points per letter grade, in [0.0, 4.0].
#[derive(Debug, Clone, PartialEq)]
pub struct GradePointTable {
    points: [f64; 15],
}

impl GradePointTable {
    pub fn standard() -> Self {
        Self {
            points: [
                4.0, // A
                3.7, // A-
                3.3, // B+
                3.0, // B
                2.7, // B-
                2.3, // C+
                2.0, // C
                1.7, // C-
                1.3, // D+
                1.0, // D
                0.0, // E
                0.0, // F
                0.0, // WH
                0.0, // NC
                0.0, // CM
            ],
        }
    }

    pub fn points(&self, grade: Grade) -> f64 {
        self.points[grade.index()]
    }

    pub fn points_for(&self, symbol: &GradeSymbol) -> f64 {
        symbol.grade().map_or(0.0, |grade| self.points(grade))
    }
}

impl Default for GradePointTable {
    fn default() -> Self {
        Self::standard()
    }
}

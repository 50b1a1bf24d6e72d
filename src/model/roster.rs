//! Students and student pairs.

use std::fmt;
use std::str::FromStr;

/// Roster identity of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Gender as recorded on the roster.
///
/// Only [`Gender::Male`] and [`Gender::Female`] enter the per-table
/// imbalance metric; the other two still take part in pairing terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unset,
}

impl Gender {
    /// Whether this gender is tracked by the imbalance metric.
    pub fn is_binary(self) -> bool {
        matches!(self, Gender::Male | Gender::Female)
    }
}

impl FromStr for Gender {
    type Err = std::convert::Infallible;

    /// Lenient parse of roster values (`"M"`, `"female"`, ...).
    /// Anything unrecognized other than an empty string maps to `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let g = match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Gender::Male,
            "f" | "female" => Gender::Female,
            "" | "unset" | "unknown" => Gender::Unset,
            _ => Gender::Other,
        };
        Ok(g)
    }
}

/// A student on the class roster. Immutable during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub gender: Gender,
    /// Mandatory accessibility need: this student may only occupy
    /// seats flagged `is_accessible`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub needs_accessible_seat: bool,
}

impl Student {
    pub fn new(id: u32, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: StudentId(id),
            name: name.into(),
            gender,
            needs_accessible_seat: false,
        }
    }

    /// Marks the student as requiring an accessible seat.
    pub fn with_accessibility_need(mut self) -> Self {
        self.needs_accessible_seat = true;
        self
    }
}

/// Unordered pair of distinct students, normalized so that `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudentPair {
    low: StudentId,
    high: StudentId,
}

impl StudentPair {
    /// Returns `None` when both ids are the same student.
    pub fn new(a: StudentId, b: StudentId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> StudentId {
        self.low
    }

    pub fn high(&self) -> StudentId {
        self.high
    }

    /// Whether `id` is one of the two members.
    pub fn contains(&self, id: StudentId) -> bool {
        self.low == id || self.high == id
    }
}

impl fmt::Display for StudentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_unordered() {
        let p = StudentPair::new(StudentId(7), StudentId(3)).unwrap();
        let q = StudentPair::new(StudentId(3), StudentId(7)).unwrap();
        assert_eq!(p, q);
        assert_eq!(p.low(), StudentId(3));
        assert_eq!(p.high(), StudentId(7));
        assert!(p.contains(StudentId(7)));
        assert!(!p.contains(StudentId(4)));
    }

    #[test]
    fn test_pair_rejects_self() {
        assert!(StudentPair::new(StudentId(1), StudentId(1)).is_none());
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("M".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("".parse::<Gender>().unwrap(), Gender::Unset);
        assert_eq!("nonbinary".parse::<Gender>().unwrap(), Gender::Other);
        assert!(Gender::Male.is_binary());
        assert!(!Gender::Unset.is_binary());
    }
}

//! Severity and level mask definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// One of the four independently gated log channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Trace,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Trace,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Label written at the start of every line of this severity
    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// The mask bit that opens this severity
    pub fn bit(&self) -> LevelMask {
        match self {
            Severity::Trace => LevelMask::TRACE,
            Severity::Info => LevelMask::INFO,
            Severity::Warning => LevelMask::WARN,
            Severity::Error => LevelMask::ERROR,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Trace => BrightBlack,
            Severity::Info => Green,
            Severity::Warning => Yellow,
            Severity::Error => Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

/// Bitmask selecting which severities produce output.
///
/// Bits are independent: `WARN` alone is a legal mask. The cascade from a
/// verbose bit to the less verbose channels is applied by
/// [`Routes::resolve`](crate::core::Routes::resolve), not stored here.
///
/// ```
/// use tracelog::LevelMask;
///
/// let mask = LevelMask::INFO | LevelMask::ERROR;
/// assert!(mask.contains(LevelMask::INFO));
/// assert!(!mask.contains(LevelMask::TRACE));
/// assert_eq!(mask.bits(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "MaskRepr", into = "u8")]
pub struct LevelMask(u8);

impl LevelMask {
    /// Log everything
    pub const TRACE: LevelMask = LevelMask(1);
    /// Log info, warnings and errors
    pub const INFO: LevelMask = LevelMask(2);
    /// Log warnings and errors
    pub const WARN: LevelMask = LevelMask(4);
    /// Log just errors
    pub const ERROR: LevelMask = LevelMask(8);
    pub const NONE: LevelMask = LevelMask(0);
    pub const ALL_BITS: u8 = 0b1111;

    /// Build a mask from raw bits, rejecting unknown bits
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL_BITS == 0 {
            Some(LevelMask(bits))
        } else {
            None
        }
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: LevelMask) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for LevelMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Severity> for LevelMask {
    fn from(severity: Severity) -> Self {
        severity.bit()
    }
}

impl From<LevelMask> for u8 {
    fn from(mask: LevelMask) -> Self {
        mask.0
    }
}

impl TryFrom<u8> for LevelMask {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        LevelMask::from_bits(bits).ok_or_else(|| format!("Invalid level mask bits: {}", bits))
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        let names: Vec<&str> = Severity::ALL
            .iter()
            .filter(|severity| self.contains(severity.bit()))
            .map(|severity| match severity {
                Severity::Warning => "WARN",
                other => other.to_str(),
            })
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

impl FromStr for LevelMask {
    type Err = String;

    /// Accepts the numeric mask (`"6"`) or names joined by `|` or `,`
    /// (`"info|error"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bits) = s.parse::<u8>() {
            return LevelMask::try_from(bits);
        }
        if s.eq_ignore_ascii_case("none") {
            return Ok(LevelMask::NONE);
        }

        let mut mask = LevelMask::NONE;
        for part in s.split(['|', ',']) {
            mask |= part.parse::<Severity>()?.bit();
        }
        Ok(mask)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Bits(u8),
    Names(String),
}

impl TryFrom<MaskRepr> for LevelMask {
    type Error = String;

    fn try_from(repr: MaskRepr) -> Result<Self, Self::Error> {
        match repr {
            MaskRepr::Bits(bits) => LevelMask::try_from(bits),
            MaskRepr::Names(names) => names.parse(),
        }
    }
}

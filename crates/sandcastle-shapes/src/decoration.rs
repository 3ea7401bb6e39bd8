use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::types::ShapeError;

/// Decorations pinned onto the castle. Discriminants below 100 go on walls, the rest on top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Starfish = 0,
    Shell = 1,
    Pebble = 2,
    Seaweed = 3,
    Flag = 100,
    Twig = 101,
    Boy = 102,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecorationPlacement {
    Side,
    Top,
}

impl DecorationKind {
    pub const ALL: [DecorationKind; 7] = [
        DecorationKind::Starfish,
        DecorationKind::Shell,
        DecorationKind::Pebble,
        DecorationKind::Seaweed,
        DecorationKind::Flag,
        DecorationKind::Twig,
        DecorationKind::Boy,
    ];

    #[inline]
    pub fn placement(self) -> DecorationPlacement {
        if (self as u32) < 100 {
            DecorationPlacement::Side
        } else {
            DecorationPlacement::Top
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DecorationKind::Starfish => "starfish",
            DecorationKind::Shell => "shell",
            DecorationKind::Pebble => "pebble",
            DecorationKind::Seaweed => "seaweed",
            DecorationKind::Flag => "flag",
            DecorationKind::Twig => "twig",
            DecorationKind::Boy => "boy",
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DecorationKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecorationKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ShapeError::UnknownShape(s.to_string()))
    }
}

/// Opaque handle issued by whoever owns decoration instances.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationHandle(pub u64);

impl fmt::Display for DecorationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decoration#{}", self.0)
    }
}

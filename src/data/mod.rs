//! Shared game identities: eras, player colors, and the static entry tables
//! tying them to archive entries.

pub mod entries;
pub mod team;

use clap::ValueEnum;
use serde::Serialize;

/// Visual theme. Selects the palette, tileset, and building sprite variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum Era {
    Forest,
    Winter,
    Wasteland,
    Swamp,
}

impl Era {
    pub const ALL: [Era; 4] = [Era::Forest, Era::Winter, Era::Wasteland, Era::Swamp];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Era::Forest => "forest",
            Era::Winter => "winter",
            Era::Wasteland => "wasteland",
            Era::Swamp => "swamp",
        }
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Owning player of a unit sprite; selects the team-color swatch row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Violet,
    Orange,
    Black,
    White,
    Yellow,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 8] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Violet,
        PlayerColor::Orange,
        PlayerColor::Black,
        PlayerColor::White,
        PlayerColor::Yellow,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Blue => "blue",
            PlayerColor::Green => "green",
            PlayerColor::Violet => "violet",
            PlayerColor::Orange => "orange",
            PlayerColor::Black => "black",
            PlayerColor::White => "white",
            PlayerColor::Yellow => "yellow",
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

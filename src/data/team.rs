//! Team-color swatch tables.
//!
//! Unit sheets are painted with four reference shades of red. Recoloring
//! replaces pixels whose RGB exactly equals one of those shades with the
//! matching shade of the target player. Near-miss colors stay untouched;
//! the upstream art pipeline relies on exact values.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

/// Four shades, brightest first, for one player color.
pub struct TeamShades {
    pub shades: [Rgb; 4],
}

/// Rows follow [`super::PlayerColor`] order; row 0 (red) doubles as the
/// reference swatch set matched against sprite pixels.
pub const TEAM_SHADES: [TeamShades; 8] = [
    TeamShades {
        shades: [rgb(252, 0, 0), rgb(180, 0, 0), rgb(116, 0, 0), rgb(60, 0, 0)],
    },
    TeamShades {
        shades: [rgb(0, 0, 252), rgb(0, 0, 180), rgb(0, 0, 116), rgb(0, 0, 60)],
    },
    TeamShades {
        shades: [rgb(0, 252, 0), rgb(0, 180, 0), rgb(0, 116, 0), rgb(0, 60, 0)],
    },
    TeamShades {
        shades: [
            rgb(156, 56, 168),
            rgb(116, 40, 128),
            rgb(80, 24, 88),
            rgb(44, 12, 48),
        ],
    },
    TeamShades {
        shades: [
            rgb(252, 140, 0),
            rgb(196, 104, 0),
            rgb(140, 72, 0),
            rgb(84, 40, 0),
        ],
    },
    TeamShades {
        shades: [
            rgb(80, 80, 80),
            rgb(56, 56, 56),
            rgb(36, 36, 36),
            rgb(16, 16, 16),
        ],
    },
    TeamShades {
        shades: [
            rgb(224, 224, 224),
            rgb(168, 168, 168),
            rgb(112, 112, 112),
            rgb(56, 56, 56),
        ],
    },
    TeamShades {
        shades: [
            rgb(252, 252, 0),
            rgb(180, 180, 0),
            rgb(116, 116, 0),
            rgb(60, 60, 0),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PlayerColor;

    #[test]
    fn one_row_per_player_color() {
        assert_eq!(TEAM_SHADES.len(), PlayerColor::ALL.len());
    }

    #[test]
    fn reference_shades_are_distinct() {
        let reference = &TEAM_SHADES[PlayerColor::Red.index()].shades;
        for (i, a) in reference.iter().enumerate() {
            for b in &reference[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

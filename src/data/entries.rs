//! Entry-index tables for the main data archive.
//!
//! The archive has no directory of names; graphics are found by fixed entry
//! index. These tables pin down where each era's tileset blobs, each
//! object's sprite sheet, and each font live.

use super::Era;

/// The four tileset entries of one era.
pub struct EraEntries {
    /// 768-byte palette entry
    pub palette: u16,
    /// Minitile reference blocks (16 u16 refs per tile)
    pub index: u16,
    /// Minitile pixel data (64 indexed pixels per minitile)
    pub data: u16,
    /// Tile code to reference-block map
    pub map: u16,
}

pub const TILESET_ENTRIES: [EraEntries; 4] = [
    // Forest
    EraEntries {
        palette: 189,
        index: 190,
        data: 191,
        map: 192,
    },
    // Winter
    EraEntries {
        palette: 193,
        index: 194,
        data: 195,
        map: 196,
    },
    // Wasteland
    EraEntries {
        palette: 197,
        index: 198,
        data: 199,
        map: 200,
    },
    // Swamp
    EraEntries {
        palette: 201,
        index: 202,
        data: 203,
        map: 204,
    },
];

/// Font entries, indexed by font id (small UI font first).
pub const FONT_ENTRIES: [u16; 5] = [205, 206, 207, 208, 209];

/// Palette and sheet entry for one object in one era.
#[derive(Clone, Copy)]
pub struct EraGfx {
    pub palette: u16,
    pub sheet: u16,
}

/// Graphics row for one object id. Units share a sheet across eras;
/// buildings carry one per era. A `None` slot means the object has no
/// graphics in that era.
pub struct ObjectGfx {
    pub id: u16,
    pub gfx: [Option<EraGfx>; 4],
}

const fn unit(id: u16, sheet: u16) -> ObjectGfx {
    ObjectGfx {
        id,
        gfx: [
            Some(EraGfx {
                palette: TILESET_ENTRIES[0].palette,
                sheet,
            }),
            Some(EraGfx {
                palette: TILESET_ENTRIES[1].palette,
                sheet,
            }),
            Some(EraGfx {
                palette: TILESET_ENTRIES[2].palette,
                sheet,
            }),
            Some(EraGfx {
                palette: TILESET_ENTRIES[3].palette,
                sheet,
            }),
        ],
    }
}

const fn building(id: u16, sheets: [u16; 4]) -> ObjectGfx {
    ObjectGfx {
        id,
        gfx: [
            Some(EraGfx {
                palette: TILESET_ENTRIES[0].palette,
                sheet: sheets[0],
            }),
            Some(EraGfx {
                palette: TILESET_ENTRIES[1].palette,
                sheet: sheets[1],
            }),
            Some(EraGfx {
                palette: TILESET_ENTRIES[2].palette,
                sheet: sheets[2],
            }),
            Some(EraGfx {
                palette: TILESET_ENTRIES[3].palette,
                sheet: sheets[3],
            }),
        ],
    }
}

pub const OBJECT_GFX: &[ObjectGfx] = &[
    unit(0x00, 210), // footman
    unit(0x01, 211), // grunt
    unit(0x02, 212), // peasant
    unit(0x03, 213), // peon
    unit(0x04, 214), // ballista
    unit(0x05, 215), // catapult
    unit(0x06, 216), // knight
    unit(0x07, 217), // ogre
    unit(0x08, 218), // archer
    unit(0x09, 219), // axethrower
    unit(0x26, 220), // dragon
    unit(0x27, 221), // gryphon rider
    building(0x3a, [230, 231, 232, 233]), // farm
    building(0x3b, [234, 235, 236, 237]), // pig farm
    building(0x3c, [238, 239, 240, 241]), // human barracks
    building(0x3d, [242, 243, 244, 245]), // orc barracks
    building(0x4a, [246, 247, 248, 249]), // town hall
    building(0x4b, [250, 251, 252, 253]), // great hall
];

/// Resolve an (object, era) pair to its palette/sheet entries.
pub fn object_gfx(object: u16, era: Era) -> Option<EraGfx> {
    OBJECT_GFX
        .iter()
        .find(|row| row.id == object)
        .and_then(|row| row.gfx[era.index()])
}

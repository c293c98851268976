//! Block kinds and their fixed per-kind attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pack into `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

/// Every kind of tile the world can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Empty space.
    Air,
    /// Surface layer.
    Grass,
    /// Subsurface band below grass.
    Dirt,
    /// Default underground block.
    Stone,
    /// Tree trunk.
    Wood,
    /// Tree canopy.
    Leaves,
    /// World-floor ocean; never breaks.
    Water,
    /// Placeable building block.
    Sand,
    /// Most common ore.
    CoalOre,
    /// Common ore.
    IronOre,
    /// Rare ore.
    GoldOre,
    /// Rarest ore.
    DiamondOre,
}

impl BlockKind {
    /// All variants in declaration order.
    pub const ALL: [BlockKind; 12] = [
        BlockKind::Air,
        BlockKind::Grass,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Wood,
        BlockKind::Leaves,
        BlockKind::Water,
        BlockKind::Sand,
        BlockKind::CoalOre,
        BlockKind::IronOre,
        BlockKind::GoldOre,
        BlockKind::DiamondOre,
    ];

    /// Kinds an actor can select and place (the hotbar set).
    pub const PLACEABLE: [BlockKind; 5] = [
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Wood,
        BlockKind::Leaves,
        BlockKind::Sand,
    ];

    /// Durability sentinel for kinds that never break.
    pub const UNBREAKABLE: u32 = u32::MAX;

    /// Display color. Air reports the sky color it shows through.
    pub const fn color(self) -> Rgb {
        match self {
            BlockKind::Air => Rgb(135, 206, 235),
            BlockKind::Grass => Rgb(34, 139, 34),
            BlockKind::Dirt => Rgb(139, 69, 19),
            BlockKind::Stone => Rgb(105, 105, 105),
            BlockKind::Wood => Rgb(160, 82, 45),
            BlockKind::Leaves => Rgb(0, 128, 0),
            BlockKind::Water => Rgb(0, 105, 148),
            BlockKind::Sand => Rgb(238, 203, 173),
            BlockKind::CoalOre => Rgb(47, 47, 47),
            BlockKind::IronOre => Rgb(169, 169, 169),
            BlockKind::GoldOre => Rgb(255, 215, 0),
            BlockKind::DiamondOre => Rgb(185, 242, 255),
        }
    }

    /// Hits needed to break a fresh cell of this kind.
    ///
    /// Air is `0` (nothing left to break); Water is [`BlockKind::UNBREAKABLE`].
    pub const fn max_durability(self) -> u32 {
        match self {
            BlockKind::Air => 0,
            BlockKind::Grass | BlockKind::Dirt | BlockKind::Leaves | BlockKind::Sand => 1,
            BlockKind::Wood | BlockKind::CoalOre => 2,
            BlockKind::Stone | BlockKind::IronOre | BlockKind::GoldOre => 3,
            BlockKind::DiamondOre => 4,
            BlockKind::Water => Self::UNBREAKABLE,
        }
    }

    /// Whether the kind blocks actor movement.
    pub const fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Air | BlockKind::Water)
    }

    /// Whether hits can wear this kind down.
    pub const fn is_breakable(self) -> bool {
        !matches!(self, BlockKind::Air | BlockKind::Water)
    }

    /// Whether an actor may place this kind.
    pub fn is_placeable(self) -> bool {
        Self::PLACEABLE.contains(&self)
    }

    /// Stable lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Grass => "grass",
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
            BlockKind::Wood => "wood",
            BlockKind::Leaves => "leaves",
            BlockKind::Water => "water",
            BlockKind::Sand => "sand",
            BlockKind::CoalOre => "coal_ore",
            BlockKind::IronOre => "iron_ore",
            BlockKind::GoldOre => "gold_ore",
            BlockKind::DiamondOre => "diamond_ore",
        }
    }

    /// Look up a kind by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Single-character glyph for text dumps.
    pub const fn glyph(self) -> char {
        match self {
            BlockKind::Air => ' ',
            BlockKind::Grass => '"',
            BlockKind::Dirt => '.',
            BlockKind::Stone => '#',
            BlockKind::Wood => '|',
            BlockKind::Leaves => '*',
            BlockKind::Water => '~',
            BlockKind::Sand => ':',
            BlockKind::CoalOre => 'c',
            BlockKind::IronOre => 'i',
            BlockKind::GoldOre => 'g',
            BlockKind::DiamondOre => 'd',
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

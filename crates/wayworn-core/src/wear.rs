//! Wear states and their block-code encoding.
//!
//! A wear state is never stored on its own: it is always parsed from the code
//! of the block currently at a position, so tracked state cannot drift from the
//! actual world content.

use crate::block::BlockCode;
use crate::constants::{TRAIL_DOMAIN, VANILLA_DOMAIN};

/// Soil fertility tier. Preserved across every wear transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fertility {
    Compost,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Fertility {
    pub const ALL: [Fertility; 5] = [
        Fertility::Compost,
        Fertility::High,
        Fertility::Medium,
        Fertility::Low,
        Fertility::VeryLow,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Fertility::Compost => "compost",
            Fertility::High => "high",
            Fertility::Medium => "medium",
            Fertility::Low => "low",
            Fertility::VeryLow => "verylow",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }
}

/// Grass cover on a soil-like block, densest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrassCover {
    Normal,
    Sparse,
    VerySparse,
    None,
}

impl GrassCover {
    pub const ALL: [GrassCover; 4] = [
        GrassCover::Normal,
        GrassCover::Sparse,
        GrassCover::VerySparse,
        GrassCover::None,
    ];

    pub fn code(self) -> &'static str {
        match self {
            GrassCover::Normal => "normal",
            GrassCover::Sparse => "sparse",
            GrassCover::VerySparse => "verysparse",
            GrassCover::None => "none",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn index(self) -> i32 {
        self as i32
    }
}

/// Trail wear tier. The index is the devolution level; `Pretrail` is level 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrailWear {
    Pretrail,
    New,
    Established,
    VeryEstablished,
    Old,
    DirtRoad,
    Highway,
}

impl TrailWear {
    pub const ALL: [TrailWear; 7] = [
        TrailWear::Pretrail,
        TrailWear::New,
        TrailWear::Established,
        TrailWear::VeryEstablished,
        TrailWear::Old,
        TrailWear::DirtRoad,
        TrailWear::Highway,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TrailWear::Pretrail => "pretrail",
            TrailWear::New => "new",
            TrailWear::Established => "established",
            TrailWear::VeryEstablished => "veryestablished",
            TrailWear::Old => "old",
            TrailWear::DirtRoad => "dirtroad",
            TrailWear::Highway => "highway",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.code() == code)
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(level as usize).copied()
    }
}

/// Raw clay colour variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClayKind {
    Blue,
    Fire,
    Red,
}

impl ClayKind {
    fn code(self) -> &'static str {
        match self {
            ClayKind::Blue => "blue",
            ClayKind::Fire => "fire",
            ClayKind::Red => "red",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "blue" => Some(ClayKind::Blue),
            "fire" => Some(ClayKind::Fire),
            "red" => Some(ClayKind::Red),
            _ => None,
        }
    }
}

/// Non-soil ground that can lose its grass cover but never becomes a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrassyMedium {
    Cob,
    Peat,
    Clay(ClayKind),
}

/// A position's place in the wear chain, derived from its block code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WearState {
    /// `game:soil-{fertility}-{cover}`
    Soil {
        fertility: Fertility,
        cover: GrassCover,
    },
    /// `wayworn:soil-{fertility}-pretrail` or `wayworn:trail-{fertility}-{wear}`
    Trail { fertility: Fertility, wear: TrailWear },
    /// `game:forestfloor-{n}`
    ForestFloor { level: u8 },
    /// `game:cob-{cover}`, `game:peat-{cover}`, `game:rawclay-{kind}-{cover}`
    Grassy {
        medium: GrassyMedium,
        cover: GrassCover,
    },
}

impl WearState {
    /// Parse a block code. Returns `None` for blocks outside the wear chain.
    pub fn from_code(code: &BlockCode) -> Option<Self> {
        let parts: Vec<&str> = code.parts().collect();
        if code.is_domain(TRAIL_DOMAIN) {
            return match parts.as_slice() {
                ["soil", fert, "pretrail"] => Some(WearState::Trail {
                    fertility: Fertility::from_code(fert)?,
                    wear: TrailWear::Pretrail,
                }),
                ["trail", fert, wear] => {
                    let wear = TrailWear::from_code(wear)?;
                    if wear == TrailWear::Pretrail {
                        return None;
                    }
                    Some(WearState::Trail {
                        fertility: Fertility::from_code(fert)?,
                        wear,
                    })
                }
                _ => None,
            };
        }

        if !code.is_domain(VANILLA_DOMAIN) {
            return None;
        }

        match parts.as_slice() {
            ["soil", fert, cover] => Some(WearState::Soil {
                fertility: Fertility::from_code(fert)?,
                cover: GrassCover::from_code(cover)?,
            }),
            ["forestfloor", level] => Some(WearState::ForestFloor {
                level: level.parse().ok()?,
            }),
            ["cob", cover] => Some(WearState::Grassy {
                medium: GrassyMedium::Cob,
                cover: GrassCover::from_code(cover)?,
            }),
            ["peat", cover] => Some(WearState::Grassy {
                medium: GrassyMedium::Peat,
                cover: GrassCover::from_code(cover)?,
            }),
            ["rawclay", kind, cover] => Some(WearState::Grassy {
                medium: GrassyMedium::Clay(ClayKind::from_code(kind)?),
                cover: GrassCover::from_code(cover)?,
            }),
            _ => None,
        }
    }

    /// Block code for this state.
    pub fn code(&self) -> BlockCode {
        match *self {
            WearState::Soil { fertility, cover } => BlockCode::new(
                VANILLA_DOMAIN,
                format!("soil-{}-{}", fertility.code(), cover.code()),
            ),
            WearState::Trail {
                fertility,
                wear: TrailWear::Pretrail,
            } => BlockCode::new(TRAIL_DOMAIN, format!("soil-{}-pretrail", fertility.code())),
            WearState::Trail { fertility, wear } => BlockCode::new(
                TRAIL_DOMAIN,
                format!("trail-{}-{}", fertility.code(), wear.code()),
            ),
            WearState::ForestFloor { level } => {
                BlockCode::new(VANILLA_DOMAIN, format!("forestfloor-{level}"))
            }
            WearState::Grassy { medium, cover } => {
                let path = match medium {
                    GrassyMedium::Cob => format!("cob-{}", cover.code()),
                    GrassyMedium::Peat => format!("peat-{}", cover.code()),
                    GrassyMedium::Clay(kind) => {
                        format!("rawclay-{}-{}", kind.code(), cover.code())
                    }
                };
                BlockCode::new(VANILLA_DOMAIN, path)
            }
        }
    }

    /// Position along the wear chain. Strictly increases with every forward step.
    pub fn ordinal(&self) -> i32 {
        match *self {
            WearState::Soil { cover, .. } => cover.index(),
            WearState::Trail { wear, .. } => GrassCover::None.index() + 1 + wear.level() as i32,
            // Forest floor sits just before bare soil.
            WearState::ForestFloor { .. } => GrassCover::VerySparse.index(),
            WearState::Grassy { cover, .. } => cover.index(),
        }
    }

    pub fn fertility(&self) -> Option<Fertility> {
        match *self {
            WearState::Soil { fertility, .. } | WearState::Trail { fertility, .. } => {
                Some(fertility)
            }
            _ => None,
        }
    }

    /// Devolution level for trail blocks (pretrail = 0).
    pub fn trail_level(&self) -> Option<u8> {
        match *self {
            WearState::Trail { wear, .. } => Some(wear.level()),
            _ => None,
        }
    }

    /// Plain untrampled soil: the bottom of the devolution chain.
    pub fn plain_soil(fertility: Fertility) -> Self {
        WearState::Soil {
            fertility,
            cover: GrassCover::None,
        }
    }
}

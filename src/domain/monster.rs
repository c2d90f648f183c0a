/// Monster classes and the per-monster record.
///
/// A "monster" is either an enemy, the player, or a planted bomb — they all
/// live in the same array and tick through the same beat loop.
///
/// The numeric tags are sparse on purpose: they mirror the dungeon file's
/// type codes (Z1 at 0–16, Z4 at 44+, Z2 at 100+, minibosses at 144+,
/// Z3 at 200+) and must be preserved for loader compatibility.

use super::coords::Coords;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum MonsterKind {
    // Z1
    GreenSlime = 0,
    BlueSlime = 1,
    YoloSlime = 2,
    Skeleton1 = 3,
    Skeleton2 = 4,
    Skeleton3 = 5,
    BlueBat = 6,
    RedBat = 7,
    GreenBat = 8,
    Monkey1 = 9,
    Monkey2 = 10,
    Ghost = 11,
    Zombie = 12,
    Wraith = 13,
    Mimic1 = 14,
    Mimic2 = 15,
    Headless = 16,

    // Z4
    Bomber = 44,
    Digger = 45,
    BlackBat = 46,
    Armadildo = 47,
    BladeNovice = 48,
    BladeMaster = 49,
    Ghoul = 50,
    Goolem = 51,
    Harpy = 52,
    Lich1 = 53,
    Lich2 = 54,
    Lich3 = 55,
    ConfMonkey = 56,
    TeleMonkey = 57,
    Pixie = 58,
    Sarco1 = 59,
    Sarco2 = 60,
    Sarco3 = 61,
    Spider = 62,
    Warlock1 = 63,
    Warlock2 = 64,
    Mummy = 65,
    WindStatue = 66,
    SeekStatue = 67,
    BombStatue = 68,
    MineStatue = 69,
    Crate1 = 70,
    Crate2 = 71,
    FreeSpider = 72,

    // Other
    Shopkeeper = 88,
    Player = 89,
    Bomb = 90,

    // Z2
    Skeletank1 = 100,
    Skeletank2 = 101,
    Skeletank3 = 102,
    Windmage1 = 103,
    Windmage2 = 104,
    Windmage3 = 105,
    Mushroom1 = 106,
    Mushroom2 = 107,
    Golem1 = 108,
    Golem2 = 109,
    Armadillo1 = 110,
    Armadillo2 = 111,
    Clone = 112,
    Tarmonster = 113,
    Mole = 114,
    Wight = 115,
    WallMimic = 116,
    Lightshroom = 117,
    Bombshroom = 118,
    /// A bombshroom that has been hit and is counting down its fuse.
    BombshroomPrimed = 119,

    // Minibosses
    Direbat1 = 144,
    Direbat2 = 145,
    Dragon = 146,
    RedDragon = 147,
    BlueDragon = 148,
    Banshee1 = 149,
    Banshee2 = 150,
    Minotaur1 = 151,
    Minotaur2 = 152,
    Nightmare1 = 153,
    Nightmare2 = 154,
    Mommy = 155,
    Ogre = 156,

    // Z3
    FireSlime = 200,
    IceSlime = 201,
    Rider1 = 202,
    Rider2 = 203,
    Rider3 = 204,
    Efreet = 205,
    Djinn = 206,
    Assassin1 = 207,
    Assassin2 = 208,
    FireBeetle = 209,
    IceBeetle = 210,
    Hellhound = 211,
    Shove1 = 212,
    Yeti = 213,
    Ghast = 214,
    FireMimic = 215,
    IceMimic = 216,
    FirePot = 217,
    IcePot = 218,
    Shove2 = 219,
    Beetle = 220,
}

impl MonsterKind {
    /// Killing any of these unlocks the stairs.
    pub fn is_miniboss(self) -> bool {
        (self as u8) >= MonsterKind::Direbat1 as u8 && (self as u8) <= MonsterKind::Ogre as u8
    }

    pub fn is_sarcophagus(self) -> bool {
        matches!(self, MonsterKind::Sarco1 | MonsterKind::Sarco2 | MonsterKind::Sarco3)
    }

    pub fn is_rider(self) -> bool {
        matches!(self, MonsterKind::Rider1 | MonsterKind::Rider2 | MonsterKind::Rider3)
    }

    pub fn is_skeletank(self) -> bool {
        matches!(
            self,
            MonsterKind::Skeletank1 | MonsterKind::Skeletank2 | MonsterKind::Skeletank3
        )
    }

    pub fn is_skeleton(self) -> bool {
        matches!(
            self,
            MonsterKind::Skeleton1 | MonsterKind::Skeleton2 | MonsterKind::Skeleton3
        )
    }

    /// Hidden mimics: immune until revealed (state 2) or bombed.
    pub fn is_mimic(self) -> bool {
        matches!(
            self,
            MonsterKind::Tarmonster
                | MonsterKind::WallMimic
                | MonsterKind::SeekStatue
                | MonsterKind::FireMimic
                | MonsterKind::IceMimic
        )
    }

    pub fn is_bladesman(self) -> bool {
        matches!(self, MonsterKind::BladeNovice | MonsterKind::BladeMaster)
    }

    pub fn is_armadillo(self) -> bool {
        matches!(
            self,
            MonsterKind::Armadillo1 | MonsterKind::Armadillo2 | MonsterKind::Armadildo
        )
    }

    /// Classes that recoil one tile whenever they survive a hit.
    pub fn knocked_back_when_hit(self) -> bool {
        matches!(
            self,
            MonsterKind::Monkey2
                | MonsterKind::TeleMonkey
                | MonsterKind::Assassin2
                | MonsterKind::Banshee1
                | MonsterKind::Banshee2
        )
    }

    /// A rider's mount: what is left when the rider is knocked off.
    pub fn dismounted(self) -> MonsterKind {
        match self {
            MonsterKind::Rider1 => MonsterKind::Skeletank1,
            MonsterKind::Rider2 => MonsterKind::Skeletank2,
            MonsterKind::Rider3 => MonsterKind::Skeletank3,
            other => other,
        }
    }

    /// Look a class up by its numeric tag. The inverse of `as u8`.
    pub fn from_tag(tag: u8) -> Option<MonsterKind> {
        use MonsterKind::*;
        const ALL: [MonsterKind; 103] = [
            GreenSlime, BlueSlime, YoloSlime, Skeleton1, Skeleton2, Skeleton3, BlueBat, RedBat,
            GreenBat, Monkey1, Monkey2, Ghost, Zombie, Wraith, Mimic1, Mimic2, Headless, Bomber,
            Digger, BlackBat, Armadildo, BladeNovice, BladeMaster, Ghoul, Goolem, Harpy, Lich1,
            Lich2, Lich3, ConfMonkey, TeleMonkey, Pixie, Sarco1, Sarco2, Sarco3, Spider, Warlock1,
            Warlock2, Mummy, WindStatue, SeekStatue, BombStatue, MineStatue, Crate1, Crate2,
            FreeSpider, Shopkeeper, Player, Bomb, Skeletank1, Skeletank2, Skeletank3, Windmage1,
            Windmage2, Windmage3, Mushroom1, Mushroom2, Golem1, Golem2, Armadillo1, Armadillo2,
            Clone, Tarmonster, Mole, Wight, WallMimic, Lightshroom, Bombshroom, BombshroomPrimed,
            Direbat1, Direbat2, Dragon, RedDragon, BlueDragon, Banshee1, Banshee2, Minotaur1,
            Minotaur2, Nightmare1, Nightmare2, Mommy, Ogre, FireSlime, IceSlime, Rider1, Rider2,
            Rider3, Efreet, Djinn, Assassin1, Assassin2, FireBeetle, IceBeetle, Hellhound, Shove1,
            Yeti, Ghast, FireMimic, IceMimic, FirePot, IcePot, Shove2, Beetle,
        ];
        ALL.iter().copied().find(|k| *k as u8 == tag)
    }

    /// A skeletank stripped of its shield.
    pub fn unshielded(self) -> MonsterKind {
        match self {
            MonsterKind::Skeletank1 => MonsterKind::Skeleton1,
            MonsterKind::Skeletank2 => MonsterKind::Skeleton2,
            MonsterKind::Skeletank3 => MonsterKind::Skeleton3,
            other => other,
        }
    }
}

/// One entry of the monster array. Index 0 is always the player; indices
/// 1.. are enemies in class-priority order fixed at load time; the tail is
/// a free-list of `Bomb` slots with `hp == 0`.
///
/// Death sets `hp = 0` and clears the tile back-reference; the array is
/// never compacted, so indices stay stable for the whole run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Monster {
    pub kind: MonsterKind,
    pub hp: i8,
    pub pos: Coords,
    pub prev_pos: Coords,
    /// Beats left before the next action (per-class cooldown).
    pub delay: u8,
    /// Beats left of reversed movement.
    pub confusion: u8,
    /// Beats left of being unable to act at all.
    pub freeze: u8,
    /// Small per-class state machine (0–3).
    pub state: u8,
    pub aggro: bool,
    pub vertical: bool,
    /// Latch: already interacted with its current trap or tar this beat.
    pub untrapped: bool,
}

impl Monster {
    pub fn new(kind: MonsterKind, hp: i8, pos: Coords) -> Self {
        Monster {
            kind,
            hp,
            pos,
            prev_pos: pos,
            delay: 0,
            confusion: 0,
            freeze: 0,
            state: 0,
            aggro: false,
            vertical: false,
            untrapped: false,
        }
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_dungeon_codes() {
        assert_eq!(MonsterKind::GreenSlime as u8, 0);
        assert_eq!(MonsterKind::Headless as u8, 16);
        assert_eq!(MonsterKind::Bomber as u8, 44);
        assert_eq!(MonsterKind::Shopkeeper as u8, 88);
        assert_eq!(MonsterKind::Player as u8, 89);
        assert_eq!(MonsterKind::Bomb as u8, 90);
        assert_eq!(MonsterKind::Skeletank1 as u8, 100);
        assert_eq!(MonsterKind::Direbat1 as u8, 144);
        assert_eq!(MonsterKind::FireSlime as u8, 200);
    }

    #[test]
    fn range_predicates() {
        assert!(MonsterKind::Ogre.is_miniboss());
        assert!(MonsterKind::Direbat1.is_miniboss());
        assert!(!MonsterKind::Shopkeeper.is_miniboss());
        assert!(MonsterKind::Sarco2.is_sarcophagus());
        assert!(MonsterKind::SeekStatue.is_mimic());
        assert!(!MonsterKind::Mimic1.is_mimic());
    }

    #[test]
    fn rider_demotion_chain() {
        assert_eq!(MonsterKind::Rider2.dismounted(), MonsterKind::Skeletank2);
        assert_eq!(MonsterKind::Skeletank2.unshielded(), MonsterKind::Skeleton2);
        assert_eq!(MonsterKind::Ghoul.dismounted(), MonsterKind::Ghoul);
    }
}

/// The per-class table: one immutable record per monster class.
///
/// Behavior is a tag switched in the beat loop rather than a function
/// pointer, so `Monster` and the whole world stay plain `Copy` data.
///
/// `radius` is the squared aggro radius. `dig` is the maximum wall
/// hardness the class can break (-1 = cannot dig; 4 also means the class
/// tramples its surroundings while not aggroed). `priority` is the beat
/// ordering key — lower acts earlier — fixed for the whole run at load.

use super::monster::MonsterKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Behavior {
    Nop,
    BasicSeek,
    DiagonalSeek,
    MooreSeek,
    Bat,
    BlackBat,
    Parry,
    /// Stubbed in the original; acts as `Nop` (pinned by tests).
    Todo,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClassInfo {
    pub max_hp: i8,
    pub beat_delay: u8,
    pub radius: i32,
    pub flying: bool,
    pub dig: i8,
    pub priority: u32,
    pub glyph: &'static str,
    pub behavior: Behavior,
}

const fn info(
    max_hp: i8,
    beat_delay: u8,
    radius: i32,
    flying: bool,
    dig: i8,
    priority: u32,
    glyph: &'static str,
    behavior: Behavior,
) -> ClassInfo {
    ClassInfo { max_hp, beat_delay, radius, flying, dig, priority, glyph, behavior }
}

pub fn class_info(kind: MonsterKind) -> ClassInfo {
    use Behavior::*;
    use MonsterKind as K;
    match kind {
        // Z1
        K::GreenSlime => info(1, 9, 0, false, -1, 19901101, "P", Nop),
        K::BlueSlime => info(2, 1, 9, false, -1, 10202202, "P", Todo),
        K::YoloSlime => info(1, 0, 9, false, -1, 10101102, "P", Todo),
        K::Skeleton1 => info(1, 1, 9, false, -1, 10101202, "Z", BasicSeek),
        K::Skeleton2 => info(2, 1, 9, false, -1, 10302203, "Z", BasicSeek),
        K::Skeleton3 => info(3, 1, 9, false, -1, 10403204, "Z", BasicSeek),
        K::BlueBat => info(1, 1, 9, true, -1, 10101202, "B", Bat),
        K::RedBat => info(1, 0, 9, true, -1, 10201103, "B", Bat),
        K::GreenBat => info(1, 0, 9, true, -1, 10301120, "B", Bat),
        K::Monkey1 => info(1, 0, 25, false, -1, 10004101, "Y", BasicSeek),
        K::Monkey2 => info(2, 0, 25, false, -1, 10006103, "Y", BasicSeek),
        K::Ghost => info(1, 0, 9, true, -1, 10201102, "8", Todo),
        K::Zombie => info(1, 1, 9, false, -1, 10201201, "Z", Todo),
        K::Wraith => info(1, 0, 9, true, -1, 10101102, "W", BasicSeek),
        K::Mimic1 => info(1, 0, 0, false, -1, 10201103, "m", Todo),
        K::Mimic2 => info(1, 0, 0, false, -1, 10201103, "m", Todo),
        K::Headless => info(1, 0, 49, false, -1, 10101203, "z", BasicSeek),

        // Z2
        K::Skeletank1 => info(1, 1, 9, false, -1, 10101202, "Z", BasicSeek),
        K::Skeletank2 => info(2, 1, 9, false, -1, 10302204, "Z", BasicSeek),
        K::Skeletank3 => info(3, 1, 9, false, -1, 10503206, "Z", BasicSeek),
        K::Windmage1 => info(1, 1, 25, false, -1, 10201202, "@", Todo),
        K::Windmage2 => info(2, 1, 25, false, -1, 10402204, "@", Todo),
        K::Windmage3 => info(3, 1, 25, false, -1, 10503206, "@", Todo),
        K::Mushroom1 => info(1, 3, 9, false, -1, 10201402, "%", Todo),
        K::Mushroom2 => info(3, 2, 9, false, -1, 10403303, "%", Todo),
        K::Golem1 => info(5, 3, 25, false, 2, 20405404, "'", BasicSeek),
        K::Golem2 => info(7, 3, 25, false, 2, 20607407, "'", BasicSeek),
        K::Armadillo1 => info(1, 0, 25, false, 4, 10201102, "q", Todo),
        K::Armadillo2 => info(2, 0, 25, false, 4, 10302105, "q", Todo),
        K::Clone => info(1, 0, 9, false, -1, 10301102, "@", Todo),
        K::Tarmonster => info(1, 0, 0, false, -1, 10304103, "t", Todo),
        K::Mole => info(1, 0, 9, false, -1, 1020113, "r", Todo),
        K::Wight => info(1, 0, 9, true, -1, 10201103, "W", Todo),
        K::WallMimic => info(1, 0, 0, false, -1, 10201103, "m", Todo),
        K::Lightshroom => info(1, 9, 0, false, -1, 0, "%", Nop),
        K::Bombshroom => info(1, 9, 0, false, -1, 4294967294, "%", Todo),
        K::BombshroomPrimed => info(1, 0, 0, false, -1, 4294967294, "%", Nop),

        // Z3
        K::FireSlime => info(1, 0, 9, false, -1, 10301101, "P", Todo),
        K::IceSlime => info(1, 0, 9, false, -1, 10301101, "P", Todo),
        K::Rider1 => info(1, 0, 25, false, -1, 10201102, "&", BasicSeek),
        K::Rider2 => info(2, 0, 25, false, -1, 10402104, "&", BasicSeek),
        K::Rider3 => info(3, 0, 25, false, -1, 10603106, "&", BasicSeek),
        K::Efreet => info(2, 2, 25, false, -1, 20302302, "E", BasicSeek),
        K::Djinn => info(2, 2, 25, false, -1, 20302302, "E", BasicSeek),
        K::Assassin1 => info(1, 0, 25, false, -1, 10401103, "G", Todo),
        K::Assassin2 => info(2, 0, 25, false, -1, 10602105, "G", Todo),
        K::FireBeetle => info(3, 1, 9, false, -1, 10303202, "a", BasicSeek),
        K::IceBeetle => info(3, 1, 9, false, -1, 10303202, "a", BasicSeek),
        K::Hellhound => info(1, 1, 25, false, -1, 10301202, "d", MooreSeek),
        K::Shove1 => info(2, 0, 25, false, -1, 10002102, "~", BasicSeek),
        K::Shove2 => info(3, 0, 25, false, -1, 10003102, "~", BasicSeek),
        K::Yeti => info(1, 3, 25, false, -1, 20301403, "Y", BasicSeek),
        K::Ghast => info(1, 0, 9, true, -1, 10201102, "W", BasicSeek),
        K::FireMimic => info(1, 0, 0, false, -1, 10201102, "m", Todo),
        K::IceMimic => info(1, 0, 0, false, -1, 10201102, "m", Todo),
        K::FirePot => info(1, 9, 0, false, -1, 0, "(", Nop),
        K::IcePot => info(1, 0, 0, false, -1, 0, "(", Nop),
        K::Beetle => info(3, 1, 9, false, -1, 10303202, "a", BasicSeek),

        // Z4
        K::Bomber => info(1, 1, 25, false, -1, 99999998, "G", DiagonalSeek),
        K::Digger => info(1, 1, 9, false, 2, 10101201, "G", BasicSeek),
        K::BlackBat => info(1, 0, 16, true, -1, 10401120, "B", BlackBat),
        K::Armadildo => info(3, 0, 25, false, 4, 10303104, "q", Todo),
        K::BladeNovice => info(1, 1, 25, false, -1, 99999995, "b", Parry),
        K::BladeMaster => info(2, 1, 25, false, -1, 99999996, "b", Parry),
        K::Ghoul => info(1, 0, 9, false, -1, 10301102, "W", MooreSeek),
        K::Goolem => info(5, 3, 25, false, 2, 20510407, "'", BasicSeek),
        K::Harpy => info(1, 1, 25, true, -1, 10301203, "h", BasicSeek),
        K::Lich1 => info(1, 1, 25, false, -1, 10404202, "L", BasicSeek),
        K::Lich2 => info(2, 1, 25, false, -1, 10404302, "L", BasicSeek),
        K::Lich3 => info(3, 1, 25, false, -1, 10404402, "L", BasicSeek),
        K::ConfMonkey => info(1, 0, 25, false, -1, 10004103, "Y", BasicSeek),
        K::TeleMonkey => info(2, 0, 25, false, -1, 10002103, "Y", BasicSeek),
        K::Pixie => info(1, 0, 25, true, -1, 10401102, "n", BasicSeek),
        K::Sarco1 => info(1, 9, 0, false, -1, 10101805, "|", Todo),
        K::Sarco2 => info(2, 9, 0, false, -1, 10102910, "|", Todo),
        K::Sarco3 => info(3, 9, 0, false, -1, 10103915, "|", Todo),
        K::Spider => info(1, 1, 9, false, -1, 10401202, "s", BasicSeek),
        K::Warlock1 => info(1, 1, 25, false, -1, 10401202, "w", BasicSeek),
        K::Warlock2 => info(2, 1, 25, false, -1, 10401302, "w", BasicSeek),
        K::Mummy => info(1, 1, 25, false, -1, 30201103, "M", MooreSeek),
        K::WindStatue => info(1, 0, 0, false, -1, 99999990, "o", Nop),
        K::SeekStatue => info(1, 0, 0, false, -1, 99999991, "m", Todo),
        K::BombStatue => info(1, 0, 0, false, -1, 99999992, "o", Nop),
        K::MineStatue => info(1, 0, 0, false, -1, 99999993, "o", Nop),
        K::Crate1 => info(1, 0, 0, false, -1, 99999989, "x", Nop),
        K::Crate2 => info(1, 0, 0, false, -1, 99999989, "x", Nop),
        K::FreeSpider => info(1, 1, 9, false, -1, 10401203, "s", BasicSeek),

        // Minibosses
        K::Direbat1 => info(2, 1, 49, true, -1, 30302210, "B", Bat),
        K::Direbat2 => info(3, 1, 49, true, -1, 30403215, "B", Bat),
        K::Dragon => info(4, 1, 49, false, -1, 30404210, "D", BasicSeek),
        K::RedDragon => info(6, 1, 49, false, -1, 99999999, "D", BasicSeek),
        K::BlueDragon => info(6, 1, 49, false, -1, 99999997, "D", BasicSeek),
        K::Banshee1 => info(3, 0, 49, false, -1, 30403110, "8", BasicSeek),
        K::Banshee2 => info(4, 0, 49, false, -1, 30604115, "8", BasicSeek),
        K::Minotaur1 => info(3, 0, 49, false, 4, 30403110, "H", Todo),
        K::Minotaur2 => info(5, 0, 49, false, 4, 30505115, "H", Todo),
        K::Nightmare1 => info(3, 1, 49, false, -1, 30403210, "u", BasicSeek),
        K::Nightmare2 => info(5, 1, 49, false, -1, 30505215, "u", BasicSeek),
        K::Mommy => info(6, 3, 49, false, 4, 30405215, "@", BasicSeek),
        K::Ogre => info(5, 3, 49, false, 4, 30505115, "O", BasicSeek),

        // Other
        K::Shopkeeper => info(9, 9, 0, false, -1, 99999997, "@", Nop),
        K::Player => info(1, 0, 0, false, -1, u32::MAX, "@", Nop),
        // Bombs tick through the enemy loop but detonation is handled
        // there directly, not through a behavior.
        K::Bomb => info(1, 0, 0, true, -1, 0, "●", Nop),
    }
}

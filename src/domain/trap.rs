/// Traps. They never move and never die; "destroyed" is a bit on the tile
/// they sit on, set when a bomb clears the square.

use super::coords::{Coords, NO_DIR};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TrapKind {
    /// Bounces the victim onward in its direction of arrival.
    OmniBounce = 0,
    /// Bounces the victim in the trap's fixed direction.
    Bounce = 1,
    Spike = 2,
    Trapdoor = 3,
    Confuse = 4,
    Teleport = 5,
    TempoDown = 6,
    TempoUp = 7,
    BombTrap = 9,
    Firepig = 10,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Trap {
    pub kind: TrapKind,
    pub pos: Coords,
    /// Unit vector for directional bounce traps, zero otherwise.
    pub dir: Coords,
}

impl Trap {
    pub fn new(kind: TrapKind, pos: Coords) -> Self {
        Trap { kind, pos, dir: NO_DIR }
    }
}

/// Enemy AI: the seek behaviors and the behavior dispatch.
///
/// All behaviors receive `d = player.pos - this.pos` and act through
/// `enemy_move`, so cooldown, confusion, attacking and digging all come
/// along for free.

use crate::domain::class::{class_info, Behavior};
use crate::domain::coords::{coords, Coords};

use super::movement::{can_move, enemy_move, MoveResult};
use super::world::World;

pub fn act(world: &mut World, idx: usize, d: Coords) {
    match class_info(world.monsters[idx].kind).behavior {
        // `Todo` classes have no behavior yet; they stand still, and the
        // tests pin that choice.
        Behavior::Nop | Behavior::Todo => {}
        Behavior::BasicSeek => basic_seek(world, idx, d),
        Behavior::DiagonalSeek => diagonal_seek(world, idx, d),
        Behavior::MooreSeek => moore_seek(world, idx, d),
        Behavior::Bat => bat(world, idx),
        Behavior::BlackBat => black_bat(world, idx, d),
        Behavior::Parry => parry(world, idx, d),
    }
}

fn try_move(world: &mut World, idx: usize, offset: Coords) -> bool {
    enemy_move(world, idx, offset) != MoveResult::Fail
}

/// The bread-and-butter chase. Picks an axis through a cascade of
/// tie-breaks, then steps along it. The cascade order is load-bearing,
/// and rule 6 is intentionally odd; the tests pin every rule.
pub fn basic_seek(world: &mut World, idx: usize, d: Coords) {
    let m = world.monsters[idx];
    let player = *world.player();
    let spawn = world.spawn;

    let vertical =
        // #1: move towards the player
        if d.y == 0 { false }
        else if d.x == 0 { true }

        // #2: avoid obstacles
        else if !can_move(world, idx, coords(0, d.y.signum())) { false }
        else if !can_move(world, idx, coords(d.x.signum(), 0)) { true }

        // #3: move towards the player's previous position
        else if m.pos.y == player.prev_pos.y { false }
        else if m.pos.x == player.prev_pos.x { true }

        // #4: if prevpos aligns with the player, switch axes
        else if m.prev_pos.y == player.pos.y { false }
        else if m.prev_pos.x == player.pos.x { true }

        // #5: don't switch axes over a single-tile offset
        else if d.y.abs() == 1 || d.x.abs() == 1 { m.vertical }

        // #6: if prevpos aligns with the player's prevpos, do something weird
        else if m.prev_pos.y == player.prev_pos.y || m.prev_pos.x == player.prev_pos.x {
            d.x > 0 && player.pos.x > spawn.x
        }

        // #7: keep moving along the same axis
        else { m.vertical };

    world.monsters[idx].vertical = vertical;
    let step = if vertical { coords(0, d.y.signum()) } else { coords(d.x.signum(), 0) };
    enemy_move(world, idx, step);
}

/// Bombers drift diagonally, with axis-aligned players handled by trying
/// both diagonals on that side.
fn diagonal_seek(world: &mut World, idx: usize, d: Coords) {
    let (sx, sy) = (d.x.signum(), d.y.signum());
    if d.y == 0 {
        let _ = try_move(world, idx, coords(sx, 1)) || try_move(world, idx, coords(sx, -1));
    } else if d.x == 0 {
        let _ = try_move(world, idx, coords(1, sy)) || try_move(world, idx, coords(-1, sy));
    } else {
        let _ = try_move(world, idx, coords(sx, sy))
            || try_move(world, idx, coords(1, sy * -sx))
            || try_move(world, idx, coords(-1, sy * sx));
    }
}

/// 8-neighbour chase with a left-biased fallback, mirrored when the
/// player is to the left.
fn moore_seek(world: &mut World, idx: usize, d: Coords) {
    let (sx, sy) = (d.x.signum(), d.y.signum());
    if try_move(world, idx, coords(sx, sy)) {
        return;
    }
    if d.x < 0 {
        let _ = try_move(world, idx, coords(-1, 0)) || try_move(world, idx, coords(0, sy));
    } else {
        let _ = try_move(world, idx, coords(0, sy)) || try_move(world, idx, coords(1, 0));
    }
}

const BAT_DIRS: [Coords; 4] = [coords(1, 0), coords(-1, 0), coords(0, 1), coords(0, -1)];

/// A pseudo-random cardinal flutter: a rotation of the direction table
/// picked off the world RNG, first workable direction wins.
fn bat(world: &mut World, idx: usize) {
    let rng = world.rand() as usize;
    for i in 0..4 {
        if try_move(world, idx, BAT_DIRS[(rng + i) & 3]) {
            return;
        }
    }
}

/// Black bats bite anyone in reach before fluttering.
fn black_bat(world: &mut World, idx: usize, d: Coords) {
    if d.l1() == 1 {
        enemy_move(world, idx, d);
    } else {
        bat(world, idx);
    }
}

/// Bladesmen: chase normally, then after parrying a hit (state 1) riposte
/// with a double step toward where the player last was, then recover.
fn parry(world: &mut World, idx: usize, d: Coords) {
    match world.monsters[idx].state {
        0 => basic_seek(world, idx, d),
        1 => {
            let step = (world.player().prev_pos - world.monsters[idx].pos).sign();
            if !step.is_zero() && try_move(world, idx, step) {
                enemy_move(world, idx, step);
            }
            world.monsters[idx].state = 2;
            world.monsters[idx].delay = 0;
        }
        _ => {
            world.monsters[idx].state = 0;
        }
    }
}

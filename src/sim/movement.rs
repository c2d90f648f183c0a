/// The movement engine: the universal pre-move filter, the four movement
/// flavors (plain, enemy, forced, player) and knockback.
///
/// Every mutation goes through `move_to`, which keeps the tile↔monster
/// back-references consistent — the rest of the engine can then trust them.

use crate::domain::class::class_info;
use crate::domain::coords::{Coords, PLUS_SHAPE};
use crate::domain::tile::TileKind;

use super::damage::{self, DamageKind};
use super::terrain;
use super::world::{World, PLAYER};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveResult {
    /// Nothing happened; the actor gets to retry next beat.
    Fail,
    /// The move was consumed by something else (hazard, dig, trample).
    Special,
    Attack,
    Success,
}

/// Whether `m` may step by `offset`. Enemies may enter the player's tile
/// (that is how attacks happen); nobody else stacks. A monster inside a
/// wall (spiders) may only tunnel to another unlit wall.
pub fn can_move(world: &World, idx: usize, offset: Coords) -> bool {
    debug_assert!(idx != PLAYER || !offset.is_zero());
    let m = &world.monsters[idx];
    let dest = world.tile(m.pos + offset);
    if let Some(occ) = dest.monster {
        return occ as usize == PLAYER && idx != PLAYER;
    }
    if world.tile(m.pos).kind.is_wall() {
        return dest.kind.is_wall() && !dest.torch;
    }
    !dest.kind.is_wall()
}

/// The universal pre-move filter. Freezing, water and tar each consume the
/// move without displacement; water drains and tar latches as a side
/// effect. Returns whether the actor is clear to move.
pub fn before_move(world: &mut World, idx: usize) -> bool {
    if world.monsters[idx].freeze > 0 {
        return false;
    }
    let pos = world.monsters[idx].pos;
    let flying = class_info(world.monsters[idx].kind).flying;
    match world.tile(pos).kind {
        TileKind::Water if !flying => {
            world.tile_mut(pos).kind = TileKind::Floor;
            false
        }
        TileKind::Tar if !flying && !world.monsters[idx].untrapped => {
            world.monsters[idx].untrapped = true;
            false
        }
        _ => true,
    }
}

/// Relocate a monster, maintaining back-references and `prev_pos`.
pub fn move_to(world: &mut World, idx: usize, dest: Coords) {
    let pos = world.monsters[idx].pos;
    world.tile_mut(pos).monster = None;
    let m = &mut world.monsters[idx];
    m.untrapped = false;
    m.prev_pos = pos;
    m.pos = dest;
    world.tile_mut(dest).monster = Some(idx as u8);
}

/// Displacement by outside force: bounce traps, knockback, ice slides.
/// Ignores confusion and delay, never digs. Returns whether anything
/// happened (an attack counts).
pub fn forced_move(world: &mut World, idx: usize, offset: Coords) -> bool {
    debug_assert!(!offset.is_zero());
    if !before_move(world, idx) {
        return false;
    }
    let dest_pos = world.monsters[idx].pos + offset;
    let dest = *world.tile(dest_pos);
    if dest.monster == Some(PLAYER as u8) && idx != PLAYER {
        damage::enemy_attack(world, idx);
        true
    } else if dest.monster.is_none() && !dest.kind.is_wall() {
        move_to(world, idx, dest_pos);
        true
    } else {
        false
    }
}

/// An enemy's voluntary move. Taking the action costs the class cooldown
/// whether or not it works out; only an outright failure refunds it.
pub fn enemy_move(world: &mut World, idx: usize, offset: Coords) -> MoveResult {
    // `move_to` is the sole writer of `prev_pos`: an attack, a dig or a
    // failed move must leave it at the last actual move's source.
    let m = &mut world.monsters[idx];
    m.delay = class_info(m.kind).beat_delay;

    if !before_move(world, idx) {
        return MoveResult::Special;
    }
    let offset = if world.monsters[idx].confusion > 0 { -offset } else { offset };

    let dest_pos = world.monsters[idx].pos + offset;
    if world.tile(dest_pos).monster == Some(PLAYER as u8) {
        damage::enemy_attack(world, idx);
        return MoveResult::Attack;
    }
    if can_move(world, idx, offset) {
        move_to(world, idx, dest_pos);
        return MoveResult::Success;
    }

    // Trampling: a calm heavyweight smashes its surroundings instead.
    let info = class_info(world.monsters[idx].kind);
    if !world.monsters[idx].aggro && info.dig == 4 {
        let origin = world.monsters[idx].pos;
        for d in &PLUS_SHAPE[..4] {
            damage::damage_tile(world, origin + *d, origin, 4, DamageKind::Normal);
        }
        return MoveResult::Special;
    }

    let power = if world.monsters[idx].confusion > 0 { -1 } else { info.dig };
    if terrain::dig(world, dest_pos, power, false) {
        return MoveResult::Special;
    }

    world.monsters[idx].delay = 0;
    MoveResult::Fail
}

/// Shove an enemy away and stun it for `delay` beats.
pub fn knockback(world: &mut World, idx: usize, dir: Coords, delay: u8) {
    if !dir.is_zero() {
        forced_move(world, idx, dir);
    }
    world.monsters[idx].delay = delay;
}

/// The player's move for this beat. Walls get dug, enemies get stabbed,
/// open floor gets stepped on (with lunge and cap digging on top).
/// Standing on ooze drains all power out of shovel and dagger alike.
pub fn player_move(world: &mut World, offset: Coords) {
    if world.sliding_on_ice {
        return;
    }
    if !before_move(world, PLAYER) {
        // The move was consumed in place; prev_pos keeps pointing at the
        // last real move's source.
        return;
    }
    {
        let p = world.player_mut();
        p.prev_pos = p.pos;
    }
    let offset = if world.player().confusion > 0 { -offset } else { offset };

    let on_ooze = world.tile(world.player().pos).kind == TileKind::Ooze;
    let dest_pos = world.player().pos + offset;
    let dest = *world.tile(dest_pos);

    if dest.kind.is_wall() {
        terrain::dig(world, dest_pos, if on_ooze { 0 } else { 2 }, false);
    } else if let Some(occ) = dest.monster {
        damage::damage(
            world,
            occ as usize,
            if on_ooze { 0 } else { 5 },
            offset,
            DamageKind::Weapon,
        );
    } else {
        world.player_moved = true;
        move_to(world, PLAYER, dest_pos);
        if world.boots_on {
            lunge(world, offset);
        }
        if world.miners_cap {
            let origin = world.player().pos;
            let power = if world.tile(origin).kind == TileKind::Ooze { 0 } else { 2 };
            for d in &PLUS_SHAPE[..4] {
                terrain::dig(world, origin + *d, power, false);
            }
        }
    }
}

/// Lunging boots: up to three extra free steps; if the chain ends against
/// a monster it takes 4 damage and a beat of knockback.
fn lunge(world: &mut World, dir: Coords) {
    let mut steps = 4;
    loop {
        steps -= 1;
        if steps == 0 || !can_move(world, PLAYER, dir) {
            break;
        }
        let dest = world.player().pos + dir;
        move_to(world, PLAYER, dest);
    }
    if steps > 0 {
        let next = world.player().pos + dir;
        if let Some(occ) = world.occupant(next) {
            if occ != PLAYER && damage::damage(world, occ, 4, dir, DamageKind::Normal) {
                knockback(world, occ, dir, 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coords::coords;
    use crate::domain::monster::MonsterKind;
    use crate::sim::world::diagram::{spawn, world_from};

    #[test]
    fn water_consumes_the_move_and_drains() {
        let mut world = world_from(&[
            "...", //
            ".~.", //
            ".@.",
        ]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(2, 2));
        assert!(!before_move(&mut world, idx));
        assert_eq!(world.tile(coords(2, 2)).kind, TileKind::Floor);
        // The next attempt goes through.
        assert!(before_move(&mut world, idx));
    }

    #[test]
    fn tar_latches_once() {
        let mut world = world_from(&[
            "t..", //
            ".@.",
        ]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(1, 1));
        assert!(!before_move(&mut world, idx));
        assert!(world.monsters[idx].untrapped);
        assert!(before_move(&mut world, idx));
        // Tar stays tar, unlike water.
        assert_eq!(world.tile(coords(1, 1)).kind, TileKind::Tar);
    }

    #[test]
    fn frozen_monster_never_clears_before_move() {
        let mut world = world_from(&["@.."]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(3, 1));
        world.monsters[idx].freeze = 2;
        assert!(!before_move(&mut world, idx));
        // Idempotent: no counter was consumed by the check itself.
        assert!(!before_move(&mut world, idx));
        assert_eq!(world.monsters[idx].freeze, 2);
    }

    #[test]
    fn enemies_walk_into_the_player_but_not_each_other() {
        let mut world = world_from(&["@..."]);
        let a = spawn(&mut world, MonsterKind::Skeleton1, coords(2, 1));
        let b = spawn(&mut world, MonsterKind::Skeleton1, coords(3, 1));
        assert!(can_move(&world, a, coords(-1, 0))); // toward the player
        assert!(!can_move(&world, a, coords(1, 0))); // toward b
        assert!(!can_move(&world, b, coords(-1, 0)));
    }

    #[test]
    fn forced_move_ignores_confusion_delay_and_walls() {
        let mut world = world_from(&["@.#"]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(2, 1));
        world.monsters[idx].confusion = 3;
        world.monsters[idx].delay = 2;
        // Confusion would flip a voluntary move; the force does not care,
        // never digs the wall, and leaves the cooldown untouched.
        assert!(!forced_move(&mut world, idx, coords(1, 0))); // into the wall
        assert_eq!(world.monsters[idx].pos, coords(2, 1));
        assert!(world.tile(coords(3, 1)).kind.is_wall());
        assert_eq!(world.monsters[idx].delay, 2);
    }

    #[test]
    fn failed_enemy_move_refunds_delay() {
        let mut world = world_from(&[
            "@.2", //
        ]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(2, 1));
        // Stone is too hard for a skeleton (dig -1), no trample either.
        assert_eq!(enemy_move(&mut world, idx, coords(1, 0)), MoveResult::Fail);
        assert_eq!(world.monsters[idx].delay, 0);
    }

    #[test]
    fn successful_enemy_move_costs_the_cooldown() {
        let mut world = world_from(&["@..."]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(3, 1));
        assert_eq!(enemy_move(&mut world, idx, coords(-1, 0)), MoveResult::Success);
        assert_eq!(world.monsters[idx].pos, coords(2, 1));
        assert_eq!(world.monsters[idx].delay, 1);
    }

    #[test]
    fn confused_enemy_moves_backward() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::Skeleton1, coords(3, 1));
        world.monsters[idx].confusion = 2;
        assert_eq!(enemy_move(&mut world, idx, coords(-1, 0)), MoveResult::Success);
        assert_eq!(world.monsters[idx].pos, coords(4, 1));
    }

    #[test]
    fn player_digs_walls_and_lands_moves() {
        let mut world = world_from(&[
            "#@.", //
        ]);
        world.boots_on = false;
        player_move(&mut world, coords(-1, 0));
        assert_eq!(world.tile(coords(1, 1)).kind, TileKind::Floor);
        assert_eq!(world.player().pos, coords(2, 1)); // dig is not a step
        player_move(&mut world, coords(1, 0));
        assert_eq!(world.player().pos, coords(3, 1));
        assert!(world.player_moved);
    }

    #[test]
    fn lunge_stops_at_the_wall() {
        let mut world = world_from(&["@....2"]);
        player_move(&mut world, coords(1, 0));
        // One step plus three free lunge steps, blocked by the stone.
        assert_eq!(world.player().pos, coords(5, 1));
    }
}

/// The damage engine: per-class damage protocols, death handlers, bombs,
/// and enemy attacks on the player.
///
/// `damage` is a two-phase switch. Phase A covers pre-damage special
/// cases — statues, crates, parries, shields, hidden things — most of
/// which swallow the hit entirely. Phase B applies the hit points and
/// runs after-damage transformations.

use crate::domain::coords::{Coords, CONE_SHAPE, SQUARE_SHAPE};
use crate::domain::monster::MonsterKind;
use crate::domain::tile::TileKind;

use super::movement::{forced_move, knockback, move_to};
use super::terrain::{destroy_wall, tile_change};
use super::world::{Board, World, PLAYER};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DamageKind {
    Normal,
    Weapon,
    Bomb,
}

/// Clear a monster off the board without any on-death effects.
pub fn monster_remove(world: &mut World, idx: usize) {
    let pos = world.monsters[idx].pos;
    if world.tile(pos).monster == Some(idx as u8) {
        world.tile_mut(pos).monster = None;
    }
    world.monsters[idx].hp = 0;
}

/// An enemy entering the player's tile. Usually one point of damage, but
/// monkeys grab instead of biting and shovers push.
pub fn enemy_attack(world: &mut World, idx: usize) {
    let d = world.player().pos - world.monsters[idx].pos;
    match world.monsters[idx].kind {
        MonsterKind::ConfMonkey => {
            world.player_mut().confusion = 2;
            monster_remove(world, idx);
        }
        MonsterKind::Pixie => {
            monster_remove(world, idx);
        }
        MonsterKind::Shove1 | MonsterKind::Shove2 => {
            if forced_move(world, PLAYER, d) {
                let dest = world.monsters[idx].pos + d;
                move_to(world, idx, dest);
            } else {
                damage(world, PLAYER, 1, d, DamageKind::Normal);
            }
        }
        _ => {
            damage(world, PLAYER, 1, d, DamageKind::Normal);
        }
    }
}

/// Destroy any diggable wall at `pos`, then forward the damage to whoever
/// stands there, hit from the direction of `origin`.
pub fn damage_tile(world: &mut World, pos: Coords, origin: Coords, dmg: i64, kind: DamageKind) {
    if world.tile(pos).is_diggable() {
        destroy_wall(world, pos);
    }
    if let Some(occ) = world.occupant(pos) {
        damage(world, occ, dmg, (pos - origin).sign(), kind);
    }
}

/// Deal damage to a monster. Returns true iff plain damage was applied
/// and the target survived with no special reaction — the signal a
/// lunging player uses to add knockback on top.
pub fn damage(world: &mut World, idx: usize, dmg: i64, dir: Coords, kind: DamageKind) -> bool {
    use MonsterKind as K;

    if idx == PLAYER && world.iframes > world.current_beat {
        return false;
    }

    let class = world.monsters[idx].kind;
    let state = world.monsters[idx].state;

    // ── Phase A: pushable things react even to 0-damage pokes ──
    match class {
        K::MineStatue => {
            bomb_detonate(world, idx);
            return false;
        }
        K::WindStatue | K::BombStatue if kind != DamageKind::Bomb => {
            let delay = if state != 0 { 2 } else { 0 };
            knockback(world, idx, dir, delay);
            return false;
        }
        K::Crate1 | K::Crate2 if dmg < 3 => {
            knockback(world, idx, dir, 1);
            return false;
        }
        _ => {}
    }

    if dmg == 0 {
        return false;
    }

    // ── Phase A: before-damage triggers ──
    match class {
        K::Bombshroom => {
            world.monsters[idx].kind = K::BombshroomPrimed;
            world.monsters[idx].delay = 3;
            return false;
        }
        k if k.is_mimic() => {
            // Hidden mimics only bleed when bombed or already sprung.
            if kind != DamageKind::Bomb && state != 2 {
                return false;
            }
        }
        K::Mole | K::Ghost => {
            if state != 1 {
                return false;
            }
        }
        K::BladeNovice | K::BladeMaster => {
            if kind != DamageKind::Bomb && state != 2 {
                knockback(world, idx, dir, 1);
                world.monsters[idx].state = 1;
                return false;
            }
        }
        k if k.is_rider() => {
            knockback(world, idx, dir, 1);
            world.monsters[idx].kind = k.dismounted();
            return false;
        }
        k if k.is_skeletank() => {
            // The shield covers the axis the skeletank is oriented along;
            // only a hit down the other axis connects.
            let vertical = world.monsters[idx].vertical;
            let connects = if vertical { dir.y != 0 } else { dir.x != 0 };
            if !connects {
                if dmg >= world.monsters[idx].hp as i64 {
                    world.monsters[idx].kind = k.unshielded();
                }
                knockback(world, idx, dir, 1);
                return false;
            }
        }
        k if k.is_armadillo() => {
            if state == 3 {
                // Mid-charge: shrug it off, but lose the aim.
                world.monsters[idx].prev_pos = world.player().pos;
                return false;
            }
        }
        K::IceBeetle | K::FireBeetle => {
            knockback(world, idx, dir, 1);
            let element = if class == K::FireBeetle { TileKind::Fire } else { TileKind::Ice };
            let center = world.monsters[idx].pos;
            for d in crate::domain::coords::PLUS_SHAPE {
                tile_change(world, center + d, element);
            }
            return false;
        }
        K::Goolem => {
            let player_pos = world.player().pos;
            tile_change(world, player_pos, TileKind::Ooze);
            // And then takes the hit like anyone else.
        }
        _ => {}
    }

    // ── Phase B: apply the damage ──
    world.monsters[idx].hp -= dmg as i8;
    if world.monsters[idx].hp <= 0 {
        monster_kill(world, idx, kind);
        return false;
    }
    if idx == PLAYER {
        world.iframes = world.current_beat + 1;
    }

    // ── Phase B: after-damage triggers ──
    match world.monsters[idx].kind {
        k if (k.is_skeleton() || k.is_skeletank()) && world.monsters[idx].hp == 1 => {
            // Down to the last hit point, the skull comes off and charges.
            world.monsters[idx].kind = K::Headless;
            world.monsters[idx].delay = 0;
            world.monsters[idx].prev_pos = world.player().pos;
            false
        }
        k if k.knocked_back_when_hit() => {
            knockback(world, idx, dir, 1);
            false
        }
        _ => true,
    }
}

/// Kill a monster and run its on-death effects.
pub fn monster_kill(world: &mut World, idx: usize, kind: DamageKind) {
    use MonsterKind as K;

    world.monsters[idx].hp = 0;
    let class = world.monsters[idx].kind;

    if class == K::Pixie || class == K::BombshroomPrimed {
        bomb_detonate(world, idx);
        return;
    }

    let pos = world.monsters[idx].pos;
    if world.tile(pos).monster == Some(idx as u8) {
        world.tile_mut(pos).monster = None;
    }

    if kind == DamageKind::Weapon && (class == K::Warlock1 || class == K::Warlock2) {
        move_to(world, PLAYER, pos);
    } else if class == K::IceSlime || class == K::Yeti {
        tile_change(world, pos, TileKind::Ice);
    } else if class == K::FireSlime || class == K::Hellhound {
        tile_change(world, pos, TileKind::Fire);
    } else if class == K::Bomber {
        bomb_plant(world, pos, 3);
    } else if class.is_miniboss() {
        world.miniboss_killed = true;
    } else if class.is_sarcophagus() {
        world.sarcophagus_killed = true;
    } else if class == K::Harpy {
        world.harpies_killed += 1;
    }
}

/// Arm a bomb from the free-list. Bombs never take a tile back-reference:
/// whoever planted one is usually still standing on it.
pub fn bomb_plant(world: &mut World, pos: Coords, delay: u8) {
    let slot = world
        .monsters
        .iter()
        .position(|m| m.kind == MonsterKind::Bomb && m.hp <= 0);
    if let Some(idx) = slot {
        let bomb = &mut world.monsters[idx];
        bomb.hp = 1;
        bomb.pos = pos;
        bomb.prev_pos = pos;
        bomb.delay = delay;
    }
}

/// The 3×3 blast: flags traps destroyed, quenches water and ice, breaks
/// every non-edge wall, and deals 4 bomb damage all around.
pub fn bomb_detonate(world: &mut World, idx: usize) {
    let pos = world.monsters[idx].pos;
    if world.tile(pos).monster == Some(idx as u8) {
        world.tile_mut(pos).monster = None;
    }
    for d in SQUARE_SHAPE {
        let tile = world.tile_mut(pos + d);
        tile.traps_destroyed = true;
        tile.kind = match tile.kind {
            TileKind::Water => TileKind::Floor,
            TileKind::Ice => TileKind::Water,
            other => other,
        };
    }
    for d in SQUARE_SHAPE {
        damage_tile(world, pos + d, pos, 4, DamageKind::Bomb);
    }
    world.monsters[idx].hp = 0;
    world.bomb_exploded = true;
}

/// The freeze scroll: everything in a 3×5 cone is frozen solid for a
/// while. `dir` mirrors the cone left or right.
pub fn freeze_cone(world: &mut World, pos: Coords, dir: i8) {
    for d in CONE_SHAPE {
        let target = pos + d * dir;
        if !Board::in_bounds(target) {
            continue;
        }
        if let Some(occ) = world.occupant(target) {
            world.monsters[occ].freeze = 5;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coords::coords;
    use crate::sim::world::diagram::{spawn, world_from};

    #[test]
    fn skeletank_side_bounce_demotes_instead_of_killing() {
        let mut world = world_from(&[
            ".......", //
            ".....@.",
        ]);
        let idx = spawn(&mut world, MonsterKind::Skeletank2, coords(3, 2));
        world.monsters[idx].vertical = true;
        // A lethal weapon hit along x: bounced, not killed.
        assert!(!damage(&mut world, idx, 5, coords(1, 0), DamageKind::Weapon));
        let m = &world.monsters[idx];
        assert!(m.alive());
        assert_eq!(m.kind, MonsterKind::Skeleton2);
        assert_eq!(m.pos, coords(4, 2));
        assert_eq!(m.delay, 1);
    }

    #[test]
    fn skeletank_dies_to_a_hit_down_its_axis() {
        let mut world = world_from(&[
            ".......", //
            ".....@.",
        ]);
        let idx = spawn(&mut world, MonsterKind::Skeletank1, coords(3, 2));
        world.monsters[idx].vertical = true;
        assert!(!damage(&mut world, idx, 5, coords(0, 1), DamageKind::Weapon));
        assert!(!world.monsters[idx].alive());
    }

    #[test]
    fn warlock_weapon_kill_teleports_the_player() {
        let mut world = world_from(&["..@"]);
        let idx = spawn(&mut world, MonsterKind::Warlock1, coords(1, 1));
        damage(&mut world, idx, 5, coords(-1, 0), DamageKind::Weapon);
        assert!(!world.monsters[idx].alive());
        assert_eq!(world.player().pos, coords(1, 1));
        assert_eq!(world.tile(coords(1, 1)).monster, Some(PLAYER as u8));
        // A bomb kill would not have pulled the player in.
        let mut world = world_from(&["..@"]);
        let idx = spawn(&mut world, MonsterKind::Warlock1, coords(1, 1));
        damage(&mut world, idx, 5, coords(-1, 0), DamageKind::Bomb);
        assert_eq!(world.player().pos, coords(3, 1));
    }

    #[test]
    fn crates_bounce_off_weak_hits_and_break_under_strong_ones() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::Crate1, coords(3, 1));
        assert!(!damage(&mut world, idx, 2, coords(1, 0), DamageKind::Normal));
        assert_eq!(world.monsters[idx].pos, coords(4, 1));
        assert!(world.monsters[idx].alive());
        assert!(!damage(&mut world, idx, 4, coords(1, 0), DamageKind::Normal));
        assert!(!world.monsters[idx].alive());
    }

    #[test]
    fn bladesman_parries_the_first_swing() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::BladeMaster, coords(2, 1));
        assert!(!damage(&mut world, idx, 5, coords(1, 0), DamageKind::Weapon));
        let m = &world.monsters[idx];
        assert!(m.alive());
        assert_eq!(m.state, 1);
        assert_eq!(m.pos, coords(3, 1));
        // Bombs cannot be parried.
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::BladeMaster, coords(2, 1));
        assert!(!damage(&mut world, idx, 4, coords(1, 0), DamageKind::Bomb));
        assert!(!world.monsters[idx].alive());
    }

    #[test]
    fn hidden_mimic_is_immune_until_sprung() {
        let mut world = world_from(&["@..."]);
        let idx = spawn(&mut world, MonsterKind::WallMimic, coords(3, 1));
        assert!(!damage(&mut world, idx, 5, coords(1, 0), DamageKind::Weapon));
        assert!(world.monsters[idx].alive());
        world.monsters[idx].state = 2;
        assert!(!damage(&mut world, idx, 5, coords(1, 0), DamageKind::Weapon));
        assert!(!world.monsters[idx].alive());
    }

    #[test]
    fn rider_is_knocked_off_its_mount() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::Rider3, coords(2, 1));
        assert!(!damage(&mut world, idx, 5, coords(1, 0), DamageKind::Weapon));
        let m = &world.monsters[idx];
        assert_eq!(m.kind, MonsterKind::Skeletank3);
        assert_eq!(m.pos, coords(3, 1));
        assert!(m.alive());
    }

    #[test]
    fn skeleton_at_one_hp_goes_headless() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::Skeleton3, coords(3, 1));
        assert!(!damage(&mut world, idx, 2, coords(1, 0), DamageKind::Normal));
        let m = &world.monsters[idx];
        assert_eq!(m.kind, MonsterKind::Headless);
        assert_eq!(m.hp, 1);
        assert_eq!(m.delay, 0);
        assert_eq!(m.prev_pos, world.player().pos);
    }

    #[test]
    fn ice_beetle_freezes_its_surroundings() {
        let mut world = world_from(&[
            ".....", //
            "....@", //
            ".....",
        ]);
        let idx = spawn(&mut world, MonsterKind::IceBeetle, coords(3, 2));
        assert!(!damage(&mut world, idx, 1, coords(-1, 0), DamageKind::Weapon));
        // Knocked back one tile, then the plus around it turns to ice.
        assert_eq!(world.monsters[idx].pos, coords(2, 2));
        for pos in [coords(2, 2), coords(1, 2), coords(3, 2), coords(2, 1), coords(2, 3)] {
            assert_eq!(world.tile(pos).kind, TileKind::Ice, "at {pos:?}");
        }
        assert!(world.monsters[idx].alive());
    }

    #[test]
    fn bombshroom_primes_instead_of_dying() {
        let mut world = world_from(&["@..."]);
        let idx = spawn(&mut world, MonsterKind::Bombshroom, coords(3, 1));
        assert!(!damage(&mut world, idx, 5, coords(1, 0), DamageKind::Weapon));
        let m = &world.monsters[idx];
        assert_eq!(m.kind, MonsterKind::BombshroomPrimed);
        assert_eq!(m.delay, 3);
        assert!(m.alive());
    }

    #[test]
    fn bomb_blast_hits_the_whole_square() {
        let mut world = world_from(&[
            ".....", //
            ".....", //
            "....@",
        ]);
        world
            .monsters
            .push(crate::domain::monster::Monster::new(MonsterKind::Bomb, 0, coords(1, 1)));
        bomb_plant(&mut world, coords(2, 2), 1);
        let slime = spawn(&mut world, MonsterKind::GreenSlime, coords(3, 3));
        let bomb = world
            .monsters
            .iter()
            .position(|m| m.kind == MonsterKind::Bomb && m.alive())
            .unwrap();
        bomb_detonate(&mut world, bomb);
        assert!(world.bomb_exploded);
        assert!(!world.monsters[slime].alive());
        assert!(!world.monsters[bomb].alive());
        assert_eq!(world.tile(coords(2, 2)).kind, TileKind::Floor);
        assert!(world.tile(coords(3, 3)).traps_destroyed);
    }

    #[test]
    fn goolem_oozes_the_ground_under_the_player() {
        let mut world = world_from(&["@...."]);
        let idx = spawn(&mut world, MonsterKind::Goolem, coords(3, 1));
        assert!(damage(&mut world, idx, 1, coords(1, 0), DamageKind::Weapon));
        assert_eq!(world.tile(coords(1, 1)).kind, TileKind::Ooze);
        assert!(world.monsters[idx].alive());
    }

    #[test]
    fn player_iframes_swallow_the_second_hit_of_a_beat() {
        let mut world = world_from(&["@.."]);
        world.player_mut().hp = 3;
        damage(&mut world, PLAYER, 1, coords(1, 0), DamageKind::Normal);
        assert_eq!(world.player().hp, 2);
        damage(&mut world, PLAYER, 1, coords(1, 0), DamageKind::Normal);
        assert_eq!(world.player().hp, 2);
        // Next beat, the player is vulnerable again.
        world.current_beat += 1;
        damage(&mut world, PLAYER, 1, coords(1, 0), DamageKind::Normal);
        assert_eq!(world.player().hp, 1);
    }

    #[test]
    fn freeze_cone_reaches_three_deep() {
        let mut world = world_from(&["@......"]);
        let near = spawn(&mut world, MonsterKind::GreenSlime, coords(2, 1));
        let far = spawn(&mut world, MonsterKind::GreenSlime, coords(4, 1));
        let beyond = spawn(&mut world, MonsterKind::GreenSlime, coords(5, 1));
        freeze_cone(&mut world, coords(1, 1), 1);
        assert_eq!(world.monsters[near].freeze, 5);
        assert_eq!(world.monsters[far].freeze, 5);
        assert_eq!(world.monsters[beyond].freeze, 0);
    }
}

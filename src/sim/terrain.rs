/// The tile engine: digging, wall destruction, hazard transmutation and
/// the torch light field.

use crate::domain::coords::{Coords, PLUS_SHAPE};
use crate::domain::monster::MonsterKind;
use crate::domain::tile::TileKind;

use super::world::{Board, World};

/// Radial light falloff, indexed by squared distance from the torch.
/// Holes (-1) are distances no integer offset produces within the 9×9.
const LIGHT_TABLE: [i16; 33] = [
    102, 102, 102, -1, 102, 102, -1, -1, 102, //
    94, 83, -1, -1, 53, -1, -1, 19, 10, 2, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Splat (or retract, diff = -1) a torch's light onto the 9×9 square
/// around `pos`. Called when torched tiles load and when they fall.
pub fn adjust_lights(world: &mut World, pos: Coords, diff: i16) {
    for dx in -4i8..=4 {
        for dy in -4i8..=4 {
            let d = Coords { x: dx, y: dy };
            let target = pos + d;
            if !Board::in_bounds(target) {
                continue;
            }
            let falloff = LIGHT_TABLE[d.l2() as usize];
            if falloff > 0 {
                world.tile_mut(target).light += diff * falloff;
            }
        }
    }
}

/// Tear a diggable wall down. Zone 2 and 3 walls of hardness 2 leave
/// their element behind; a spider living inside is shaken loose.
pub fn destroy_wall(world: &mut World, pos: Coords) {
    debug_assert!(world.tile(pos).is_diggable());
    let tile = world.tile(pos);
    let new_kind = match (tile.hp, tile.zone) {
        (2, 2) => TileKind::Fire,
        (2, 3) => TileKind::Ice,
        _ => TileKind::Floor,
    };
    world.tile_mut(pos).kind = new_kind;

    if let Some(idx) = world.occupant(pos) {
        if world.monsters[idx].kind == MonsterKind::Spider {
            world.monsters[idx].kind = MonsterKind::FreeSpider;
            world.monsters[idx].delay = 1;
        }
    }
    if world.tile(pos).torch {
        adjust_lights(world, pos, -1);
    }
}

/// Try to dig away the wall at `pos`. Returns whether the dig succeeded.
///
/// `z4` marks the recursive arm of a catacomb chain: those follow-up digs
/// are capped at power 2, cannot open doors, and do not chain further.
pub fn dig(world: &mut World, pos: Coords, power: i8, z4: bool) -> bool {
    let wall = *world.tile(pos);

    // Doors are immune to catacomb chain demolition.
    if z4 && wall.hp == 0 {
        return false;
    }
    if !wall.kind.is_wall() || wall.hp > power {
        return false; // Dink!
    }

    destroy_wall(world, pos);
    if !z4 && wall.zone == 4 && (wall.hp == 1 || wall.hp == 2) {
        for d in &PLUS_SHAPE[..4] {
            dig(world, pos + *d, power.min(2), true);
        }
    }
    true
}

/// Overwrite a tile with a floor hazard. Stairs and walls are immutable;
/// fire and ice quench each other to water; fire on water boils down to
/// floor. Any trap on the square is destroyed.
pub fn tile_change(world: &mut World, pos: Coords, new_kind: TileKind) {
    let tile = world.tile_mut(pos);
    tile.kind = match (tile.kind, new_kind) {
        (TileKind::Stairs, _) => TileKind::Stairs,
        (TileKind::Wall, _) => TileKind::Wall,
        (TileKind::Fire, TileKind::Ice) | (TileKind::Ice, TileKind::Fire) => TileKind::Water,
        (TileKind::Water, TileKind::Fire) => TileKind::Floor,
        (_, k) => k,
    };
    tile.traps_destroyed = true;
}

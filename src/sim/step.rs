/// The beat driver: one call to `do_beat` advances the world by exactly
/// one beat.
///
/// Processing order within a beat:
///   1. Player turn (input dispatch, ice slides, fire, victory check)
///   2. Enemies, in the priority order fixed at load
///   3. Traps
///   4. Beat counter
///
/// Nothing outside the driver ever observes a half-finished beat.

use crate::domain::class::class_info;
use crate::domain::coords::{coords, NO_DIR};
use crate::domain::monster::MonsterKind;
use crate::domain::tile::TileKind;
use crate::domain::trap::TrapKind;

use super::ai::act;
use super::damage::{bomb_detonate, bomb_plant, damage, freeze_cone, monster_remove, DamageKind};
use super::fov::{can_see, update_fov};
use super::movement::{can_move, forced_move, player_move};
use super::world::{World, PLAYER};

/// The input alphabet, one symbol per beat. Codes 0–5 are the solver's
/// encoding; the byte forms are the interactive keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    Left,
    Down,
    Right,
    Up,
    Bomb,
    Scroll,
}

pub const INPUTS: [Input; 6] = [
    Input::Left,
    Input::Down,
    Input::Right,
    Input::Up,
    Input::Bomb,
    Input::Scroll,
];

impl Input {
    pub fn from_byte(b: u8) -> Option<Input> {
        match b {
            b'e' => Some(Input::Left),
            b'f' => Some(Input::Down),
            b'i' => Some(Input::Right),
            b'j' => Some(Input::Up),
            b'<' => Some(Input::Bomb),
            b'z' => Some(Input::Scroll),
            _ => None,
        }
    }

    pub fn from_code(code: u8) -> Option<Input> {
        INPUTS.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn byte(self) -> u8 {
        match self {
            Input::Left => b'e',
            Input::Down => b'f',
            Input::Right => b'i',
            Input::Up => b'j',
            Input::Bomb => b'<',
            Input::Scroll => b'z',
        }
    }

    /// Display symbol used when printing routes.
    pub fn symbol(self) -> &'static str {
        match self {
            Input::Left => "←",
            Input::Down => "↓",
            Input::Right => "→",
            Input::Up => "↑",
            Input::Bomb => "s",
            Input::Scroll => "z",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BeatOutcome {
    Ongoing,
    Victory,
    Death,
}

/// The stairs only work once every lock has been broken.
pub fn player_won(world: &World) -> bool {
    world.tile(world.player().pos).kind == TileKind::Stairs
        && world.miniboss_killed
        && world.sarcophagus_killed
}

pub fn do_beat(world: &mut World, input: Option<Input>) -> BeatOutcome {
    player_turn(world, input);
    if player_won(world) {
        world.current_beat += 1;
        return BeatOutcome::Victory;
    }
    if world.player().hp <= 0 {
        world.current_beat += 1;
        return BeatOutcome::Death;
    }

    for idx in 1..world.monsters.len() {
        enemy_turn(world, idx);
    }
    for t in 0..world.traps.len() {
        trap_turn(world, t);
    }

    world.current_beat += 1;
    if world.player().hp <= 0 {
        BeatOutcome::Death
    } else {
        BeatOutcome::Ongoing
    }
}

fn player_turn(world: &mut World, input: Option<Input>) {
    world.player_moved = false;

    match input {
        Some(Input::Left) => player_move(world, coords(-1, 0)),
        Some(Input::Down) => player_move(world, coords(0, 1)),
        Some(Input::Right) => player_move(world, coords(1, 0)),
        Some(Input::Up) => player_move(world, coords(0, -1)),
        Some(Input::Bomb) => {
            let pos = world.player().pos;
            bomb_plant(world, pos, 3);
        }
        Some(Input::Scroll) => {
            if world.scrolls > 0 {
                world.scrolls -= 1;
                let p = *world.player();
                let facing = if (p.pos - p.prev_pos).x < 0 { -1 } else { 1 };
                freeze_cone(world, p.pos, facing);
            }
        }
        None => {}
    }

    if world.sliding_on_ice {
        let dir = (world.player().pos - world.player().prev_pos).sign();
        world.player_moved = !dir.is_zero() && forced_move(world, PLAYER, dir);
    } else if !world.player_moved && world.tile(world.player().pos).kind == TileKind::Fire {
        damage(world, PLAYER, 2, NO_DIR, DamageKind::Normal);
    }

    let dir = (world.player().pos - world.player().prev_pos).sign();
    world.sliding_on_ice = world.player_moved
        && world.tile(world.player().pos).kind == TileKind::Ice
        && !dir.is_zero()
        && can_move(world, PLAYER, dir);

    // The countdowns tick at the end of the turn, so a one-beat confusion
    // still reverses this beat's input.
    {
        let p = world.player_mut();
        p.confusion -= u8::from(p.confusion > 0);
        p.freeze -= u8::from(p.freeze > 0);
    }

    update_fov(world);
}

fn enemy_turn(world: &mut World, idx: usize) {
    if !world.monsters[idx].alive() {
        return;
    }
    let kind = world.monsters[idx].kind;

    // Fuses: armed bombs and primed bombshrooms blow the beat their
    // countdown runs out.
    if kind == MonsterKind::Bomb || kind == MonsterKind::BombshroomPrimed {
        let m = &mut world.monsters[idx];
        if m.delay > 0 {
            m.delay -= 1;
        }
        if world.monsters[idx].delay == 0 {
            bomb_detonate(world, idx);
        }
        return;
    }

    {
        let m = &mut world.monsters[idx];
        m.confusion -= u8::from(m.confusion > 0);
        m.freeze -= u8::from(m.freeze > 0);
    }

    let d = world.player().pos - world.monsters[idx].pos;
    let info = class_info(kind);
    if !world.monsters[idx].aggro {
        let within = d.l2() <= info.radius;
        if within && can_see(world, world.monsters[idx].pos) {
            world.monsters[idx].aggro = true;
        }
        // Out of range and still calm: stay asleep.
        if !within {
            return;
        }
    }
    if world.monsters[idx].delay > 0 {
        world.monsters[idx].delay -= 1;
        return;
    }
    if world.monsters[idx].freeze > 0 {
        return;
    }
    act(world, idx, d);
}

fn trap_turn(world: &mut World, t: usize) {
    let trap = world.traps[t];
    if world.tile(trap.pos).traps_destroyed {
        return;
    }
    let Some(idx) = world.occupant(trap.pos) else {
        return;
    };
    if world.monsters[idx].untrapped || class_info(world.monsters[idx].kind).flying {
        return;
    }
    world.monsters[idx].untrapped = true;

    match trap.kind {
        TrapKind::OmniBounce => {
            let m = &world.monsters[idx];
            let dir = (m.pos - m.prev_pos).sign();
            if !dir.is_zero() {
                forced_move(world, idx, dir);
            }
        }
        TrapKind::Bounce => {
            if !trap.dir.is_zero() {
                forced_move(world, idx, trap.dir);
            }
        }
        TrapKind::Spike => {
            damage(world, idx, 4, NO_DIR, DamageKind::Bomb);
        }
        TrapKind::Trapdoor | TrapKind::Teleport => {
            monster_remove(world, idx);
        }
        TrapKind::Confuse => {
            if world.monsters[idx].confusion == 0 {
                world.monsters[idx].confusion = 10;
            }
        }
        TrapKind::BombTrap => {
            if idx == PLAYER {
                bomb_plant(world, trap.pos, 2);
            }
        }
        TrapKind::TempoDown | TrapKind::TempoUp | TrapKind::Firepig => {}
    }
}

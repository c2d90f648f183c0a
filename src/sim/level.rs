/// Dungeon loader.
///
/// Dungeon files are XML-shaped: a `<dungeon>` root, `<level num="N">`
/// sections, and flat `<tile>`/`<enemy>`/`<trap>`/`<chest>`/`<crate>`/
/// `<shrine>`/`<item>` children with integer attributes. This is not a
/// general XML parser — a regex node scanner is all the dialect needs.
///
/// Coordinates in the file are relative to the player spawn. The loader
/// scans the level once to find the offset that keeps everything inside
/// the 1..=30 playfield, then again to place entities.

use std::collections::HashMap;

use anyhow::{bail, ensure, Context, Result};
use regex::Regex;

use crate::domain::class::class_info;
use crate::domain::coords::{coords, Coords};
use crate::domain::monster::{Monster, MonsterKind};
use crate::domain::tile::TileKind;
use crate::domain::trap::{Trap, TrapKind};

use super::step::{do_beat, Input};
use super::terrain::adjust_lights;
use super::world::{World, BOMB_SLOTS, PLAYER};

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub level: i32,
    pub seed: u64,
    /// Item names (or fragments) to grant before the first beat.
    pub items: Vec<String>,
    /// Inputs replayed before handing over control.
    pub replay: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { level: 1, seed: 42, items: Vec::new(), replay: String::new() }
    }
}

pub fn load_dungeon_file(path: &str, opts: &LoadOptions) -> Result<World> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Cannot open file: {path}"))?;
    load_dungeon(&text, opts).with_context(|| format!("File isn't valid dungeon XML: {path}"))
}

// ── Node scanning ──

struct Node {
    name: String,
    attrs: HashMap<String, String>,
}

impl Node {
    /// Missing attributes read as 0, like an empty string through atoi.
    fn int(&self, key: &str) -> i32 {
        self.attrs.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

fn scan_nodes(text: &str) -> Result<Vec<Node>> {
    let node_re = Regex::new(r#"<\s*(/?[a-zA-Z?]+)((?:\s+[a-zA-Z]+\s*=\s*"[^"]*")*)\s*/?\??>"#)
        .expect("node regex");
    let attr_re = Regex::new(r#"([a-zA-Z]+)\s*=\s*"([^"]*)""#).expect("attr regex");

    let mut nodes = Vec::new();
    for caps in node_re.captures_iter(text) {
        let name = caps[1].to_string();
        let attrs = attr_re
            .captures_iter(caps.get(2).map_or("", |m| m.as_str()))
            .map(|a| (a[1].to_string(), a[2].to_string()))
            .collect();
        nodes.push(Node { name, attrs });
    }
    ensure!(
        nodes.iter().any(|n| n.name == "dungeon") && nodes.iter().any(|n| n.name == "/dungeon"),
        "no <dungeon> root"
    );
    Ok(nodes)
}

const fn is_oob(pos: Coords) -> bool {
    pos.x < 1 || pos.y < 1 || pos.x > 30 || pos.y > 30
}

// ── Type tables ──

/// Floor tiles use the tile-class tags directly; 100+ are wall variants.
fn tile_init(world: &mut World, pos: Coords, ty: i32, zone: i32, torch: bool) -> Result<()> {
    let (kind, hp) = match ty {
        0 => (TileKind::Wall, 1),
        1 => (TileKind::Floor, 0),
        3 => (TileKind::Shop, 0),
        4 => (TileKind::Water, 0),
        8 => (TileKind::Tar, 0),
        9 => (TileKind::Stairs, 0),
        10 => (TileKind::Fire, 0),
        11 => (TileKind::Ice, 0),
        17 => (TileKind::Ooze, 0),
        // Wall variants: dirt, doors, shop walls, stone, catacomb.
        100 | 101 => (TileKind::Wall, 1),
        103 | 111 | 118 => (TileKind::Wall, 0),
        104 | 110 | 112..=117 => (TileKind::Wall, 3),
        107 => (TileKind::Wall, 2),
        108 => (TileKind::Wall, 2),
        _ => bail!("Unknown tile type: {ty}"),
    };

    let tile = world.tile_mut(pos);
    tile.kind = kind;
    tile.hp = hp;
    tile.zone = if ty == 108 { 4 } else { zone as i8 };
    tile.torch = torch;
    if torch {
        adjust_lights(world, pos, 1);
    }
    if kind == TileKind::Stairs {
        world.stairs = pos;
    }
    Ok(())
}

/// Dungeon enemy codes: Z1 at 0+, Z2 at 100+, Z3 at 200+ map straight to
/// class tags; Z4 at 300+ and minibosses at 400+ sit 256 above theirs;
/// the shopkeeper is 600.
fn monster_type(ty: i32) -> Option<MonsterKind> {
    match ty {
        16 => Some(MonsterKind::Mimic2),
        0..=15 | 100..=118 | 200..=219 => MonsterKind::from_tag(ty as u8),
        300..=327 | 400..=412 => MonsterKind::from_tag((ty - 256) as u8),
        600 => Some(MonsterKind::Shopkeeper),
        _ => None,
    }
}

fn enemy_init(world: &mut World, pos: Coords, ty: i32, lord: bool) -> Result<()> {
    let Some(kind) = monster_type(ty) else {
        bail!("Invalid enemy type: {ty}");
    };
    let mut hp = class_info(kind).max_hp;
    if lord {
        hp *= 2;
    }
    world.monsters.push(Monster::new(kind, hp, pos));
    if kind == MonsterKind::Lightshroom {
        adjust_lights(world, pos, 1);
    }
    Ok(())
}

const TRAP_DIR_X: [i8; 8] = [1, -1, 0, 0, 1, -1, -1, 1];
const TRAP_DIR_Y: [i8; 8] = [0, 0, 1, -1, 1, 1, -1, -1];

fn trap_init(world: &mut World, pos: Coords, ty: i32, subtype: i32) -> Result<()> {
    let kind = if subtype == 8 {
        TrapKind::OmniBounce
    } else {
        match ty {
            0 => TrapKind::OmniBounce,
            1 => TrapKind::Bounce,
            2 => TrapKind::Spike,
            3 => TrapKind::Trapdoor,
            4 => TrapKind::Confuse,
            5 => TrapKind::Teleport,
            6 => TrapKind::TempoDown,
            7 => TrapKind::TempoUp,
            9 => TrapKind::BombTrap,
            10 => TrapKind::Firepig,
            _ => bail!("Unknown trap type: {ty}"),
        }
    };
    let mut trap = Trap::new(kind, pos);
    if matches!(kind, TrapKind::Bounce | TrapKind::Firepig) {
        let i = (subtype & 7) as usize;
        trap.dir = coords(TRAP_DIR_X[i], TRAP_DIR_Y[i]);
    }
    world.traps.push(trap);
    Ok(())
}

fn pickup_item(world: &mut World, name: &str) {
    if name.contains("miner") {
        world.miners_cap = true;
    } else if name.contains("lunging") {
        world.boots_on = true;
    } else if name.contains("freeze") {
        world.scrolls += 1;
    } else {
        log::warn!("ignoring unsupported item: {name}");
    }
}

// ── Loading proper ──

pub fn load_dungeon(text: &str, opts: &LoadOptions) -> Result<World> {
    let nodes = scan_nodes(text)?;

    // Root attributes and level selection.
    let mut character = 0u8;
    for node in &nodes {
        if node.name == "dungeon" {
            character = (node.int("character") % 1000) as u8;
            ensure!(
                opts.level <= node.int("numLevels"),
                "No level {} in dungeon (max: {})",
                opts.level,
                node.int("numLevels")
            );
        }
    }
    ensure!(opts.level > 0, "Invalid level: {} (expected a positive integer)", opts.level);

    let mut in_level = false;
    let mut selected: Vec<&Node> = Vec::new();
    for node in &nodes {
        match node.name.as_str() {
            "level" => in_level = node.int("num") == opts.level,
            "tile" | "enemy" | "trap" | "chest" | "crate" | "shrine" | "item" => {
                // Editor leftovers are parked far off-screen.
                if in_level && (node.int("x") > -180 || node.int("y") > -180) {
                    selected.push(node);
                }
            }
            _ => {}
        }
    }

    // Pass A: find the spawn offset that keeps the level inside 1..=30.
    let mut spawn = coords(1, 1);
    for node in &selected {
        if node.int("type") >= 100 {
            continue;
        }
        spawn.x = spawn.x.max((2 - node.int("x")) as i8);
        spawn.y = spawn.y.max((2 - node.int("y")) as i8);
        ensure!(
            !is_oob(spawn),
            "Tile too far away from spawn: ({}, {})",
            node.int("x"),
            node.int("y")
        );
    }

    let mut world = World::new(spawn);
    world.character = character;
    world.seed = opts.seed;

    // Pass B: place everything.
    for node in &selected {
        let ty = node.int("type");
        ensure!(ty >= 0, "Invalid {} type: {}", node.name, ty);
        let pos = coords(node.int("x") as i8, node.int("y") as i8) + spawn;
        if is_oob(pos) {
            if ty >= 100 {
                continue;
            }
            bail!("Out of bounds entity: ({}, {})", node.int("x"), node.int("y"));
        }
        match node.name.as_str() {
            "tile" => tile_init(&mut world, pos, ty, node.int("zone"), node.int("torch") != 0)?,
            "enemy" => enemy_init(&mut world, pos, ty, node.int("lord") != 0)?,
            "trap" => trap_init(&mut world, pos, ty, node.int("subtype"))?,
            "crate" => {
                let kind =
                    if ty == 1 { MonsterKind::Crate2 } else { MonsterKind::Crate1 };
                world.monsters.push(Monster::new(kind, 1, pos));
            }
            "item" if pos == spawn => {
                if let Some(name) = node.attrs.get("type") {
                    pickup_item(&mut world, name);
                }
            }
            "chest" | "shrine" | "item" => {
                log::debug!("ignoring <{}> at ({}, {})", node.name, pos.x, pos.y);
            }
            _ => {}
        }
    }

    finalize(&mut world, opts)?;
    Ok(world)
}

/// Priority-sort the enemies, wire up back-references, reserve the bomb
/// free-list, settle the victory locks and replay any scripted prefix.
fn finalize(world: &mut World, opts: &LoadOptions) -> Result<()> {
    ensure!(world.monsters.len() <= 200, "too many monsters");
    world.monsters[1..].sort_by_key(|m| class_info(m.kind).priority);

    for i in 1..world.monsters.len() {
        let pos = world.monsters[i].pos;
        ensure!(
            world.tile(pos).monster.is_none(),
            "two entities on one tile: ({}, {})",
            pos.x,
            pos.y
        );
        world.tile_mut(pos).monster = Some(i as u8);
        if matches!(world.monsters[i].kind, MonsterKind::Nightmare1 | MonsterKind::Nightmare2) {
            world.nightmare = Some(i as u8);
        }
    }
    ensure!(
        world.occupant(world.spawn) == Some(PLAYER),
        "Non-player entity at spawn"
    );

    for _ in 0..BOMB_SLOTS {
        world.monsters.push(Monster::new(MonsterKind::Bomb, 0, coords(1, 1)));
    }

    // A dungeon without a miniboss (or sarcophagus) has nothing locking
    // the stairs on that front.
    world.miniboss_killed = !world.monsters.iter().any(|m| m.kind.is_miniboss());
    world.sarcophagus_killed = !world.monsters.iter().any(|m| m.kind.is_sarcophagus());

    for item in &opts.items {
        pickup_item(world, item);
    }

    super::fov::update_fov(world);

    for b in opts.replay.bytes() {
        do_beat(world, Input::from_byte(b));
    }
    world.current_beat = 0;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::step::player_won;

    const DUNGEON: &str = r#"<?xml version="1.0"?>
<dungeon character="0" numLevels="2">
<level num="1">
<tile x="0" y="0" type="1" zone="1"/>
<tile x="1" y="0" type="1" zone="1"/>
<tile x="2" y="0" type="1" zone="1"/>
<tile x="3" y="0" type="9" zone="1"/>
<tile x="0" y="1" type="1" zone="1"/>
<tile x="1" y="1" type="4" zone="1"/>
<tile x="2" y="1" type="100" zone="1" torch="1"/>
<enemy x="2" y="0" type="3"/>
<enemy x="0" y="1" type="402"/>
<trap x="1" y="0" type="2"/>
</level>
<level num="2">
<tile x="0" y="0" type="1" zone="2"/>
</level>
</dungeon>
"#;

    fn load(opts: &LoadOptions) -> World {
        load_dungeon(DUNGEON, opts).expect("fixture loads")
    }

    #[test]
    fn places_everything_relative_to_spawn() {
        let world = load(&LoadOptions::default());
        let spawn = world.spawn;
        assert_eq!(world.occupant(spawn), Some(PLAYER));
        assert_eq!(world.tile(spawn + coords(3, 0)).kind, TileKind::Stairs);
        assert_eq!(world.stairs, spawn + coords(3, 0));
        assert_eq!(world.tile(spawn + coords(1, 1)).kind, TileKind::Water);
        let wall = world.tile(spawn + coords(2, 1));
        assert!(wall.kind.is_wall() && wall.hp == 1 && wall.torch);
        assert_eq!(world.traps.len(), 1);
        assert_eq!(world.traps[0].pos, spawn + coords(1, 0));
        world.check_invariants();
    }

    #[test]
    fn enemies_sort_by_priority_and_bombs_trail() {
        let world = load(&LoadOptions::default());
        // The dragon (miniboss) outranks the skeleton's priority number.
        let kinds: Vec<_> = world.monsters.iter().map(|m| m.kind).collect();
        assert_eq!(kinds[0], MonsterKind::Player);
        assert_eq!(kinds[1], MonsterKind::Skeleton1);
        assert_eq!(kinds[2], MonsterKind::Dragon);
        assert!(kinds[3..].iter().all(|k| *k == MonsterKind::Bomb));
        assert_eq!(kinds.len(), 3 + BOMB_SLOTS);
    }

    #[test]
    fn victory_locks_follow_the_bestiary() {
        let world = load(&LoadOptions::default());
        // A live dragon locks the stairs; no sarcophagus means no second lock.
        assert!(!world.miniboss_killed);
        assert!(world.sarcophagus_killed);
        assert!(!player_won(&world));
    }

    #[test]
    fn items_and_seed_apply() {
        let opts = LoadOptions {
            seed: 7,
            items: vec!["head_miners_cap".into(), "scroll_freeze_enemies".into()],
            ..LoadOptions::default()
        };
        let world = load(&opts);
        assert_eq!(world.seed, 7);
        assert!(world.miners_cap);
        assert_eq!(world.scrolls, 1);
    }

    #[test]
    fn replay_prefix_resets_the_beat_counter() {
        let opts = LoadOptions { replay: "ee".into(), ..LoadOptions::default() };
        let world = load(&opts);
        assert_eq!(world.current_beat, 0);
        // Two no-op-ish beats still ran: the water tile is where it was,
        // but the world is past its initial state only through play.
        let fresh = load(&LoadOptions::default());
        assert_eq!(world.spawn, fresh.spawn);
    }

    #[test]
    fn bad_inputs_are_load_errors() {
        let opts = LoadOptions::default();
        assert!(load_dungeon("<p>hi</p>", &opts).is_err());
        assert!(load_dungeon(
            r#"<dungeon numLevels="1"><level num="1"><tile x="0" y="0" type="99"/></level></dungeon>"#,
            &opts
        )
        .is_err());
        assert!(load_dungeon(
            r#"<dungeon numLevels="1"><level num="1"><enemy x="0" y="0" type="777"/></level></dungeon>"#,
            &opts
        )
        .is_err());
        let missing = LoadOptions { level: 3, ..LoadOptions::default() };
        assert!(load_dungeon(DUNGEON, &missing).is_err());
    }
}

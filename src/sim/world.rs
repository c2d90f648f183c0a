/// World: the complete snapshot of a running game.
///
/// One aggregate value — board, monsters, traps, flags — with no pointers
/// anywhere, so snapshotting is `clone()` and comparing two snapshots is
/// `==`. The solver and fuzzer lean on both.
///
/// ## Monster array discipline
///
/// Index 0 is the player, always. Indices 1.. are enemies sorted once at
/// load by class priority (ties by load order) and never re-sorted; the
/// tail is a free-list of `Bomb` slots with hp 0. Tiles refer to their
/// occupant by index. Death zeroes hp and clears the back-reference but
/// never compacts the array.

use crate::domain::coords::Coords;
use crate::domain::monster::{Monster, MonsterKind};
use crate::domain::tile::Tile;
use crate::domain::trap::Trap;

pub const BOARD_SIZE: usize = 32;

/// Index of the player in the monster array.
pub const PLAYER: usize = 0;

/// How many bomb slots the loader reserves at the end of the array.
pub const BOMB_SLOTS: usize = 8;

/// The board grid. Born as solid edge wall; the loader carves the level
/// into it, leaving the indestructible border that spares every movement
/// and FOV routine its bounds checks.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board([[Tile; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Board([[Tile::default(); BOARD_SIZE]; BOARD_SIZE])
    }

    pub fn in_bounds(pos: Coords) -> bool {
        (0..BOARD_SIZE as i8).contains(&pos.x) && (0..BOARD_SIZE as i8).contains(&pos.y)
    }

    #[inline]
    pub fn tile(&self, pos: Coords) -> &Tile {
        &self.0[pos.y as usize][pos.x as usize]
    }

    #[inline]
    pub fn tile_mut(&mut self, pos: Coords) -> &mut Tile {
        &mut self.0[pos.y as usize][pos.x as usize]
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct World {
    pub board: Board,
    pub monsters: Vec<Monster>,
    pub traps: Vec<Trap>,

    // ── Per-beat flags ──
    pub player_moved: bool,
    pub bomb_exploded: bool,
    pub sliding_on_ice: bool,

    // ── Inventory ──
    pub boots_on: bool,
    pub miners_cap: bool,
    pub scrolls: u8,

    // ── Run progress ──
    pub miniboss_killed: bool,
    pub sarcophagus_killed: bool,
    pub harpies_killed: u32,
    pub current_beat: u32,
    /// Beat number until which the player shrugs off further damage.
    pub iframes: u32,

    /// In-world RNG state. Part of the snapshot: equal worlds draw equal
    /// random sequences, which is what makes runs replayable by seed.
    pub seed: u64,

    pub stairs: Coords,
    pub spawn: Coords,
    pub nightmare: Option<u8>,
    pub character: u8,
}

impl World {
    pub fn new(spawn: Coords) -> Self {
        let mut world = World {
            board: Board::new(),
            monsters: vec![Monster::new(MonsterKind::Player, 1, spawn)],
            traps: Vec::new(),
            player_moved: false,
            bomb_exploded: false,
            sliding_on_ice: false,
            boots_on: true,
            miners_cap: false,
            scrolls: 0,
            miniboss_killed: false,
            sarcophagus_killed: false,
            harpies_killed: 0,
            current_beat: 0,
            iframes: 0,
            seed: 0,
            stairs: Coords::default(),
            spawn,
            nightmare: None,
            character: 0,
        };
        world.board.tile_mut(spawn).monster = Some(PLAYER as u8);
        world
    }

    // ── Queries ──

    #[inline]
    pub fn tile(&self, pos: Coords) -> &Tile {
        self.board.tile(pos)
    }

    #[inline]
    pub fn tile_mut(&mut self, pos: Coords) -> &mut Tile {
        self.board.tile_mut(pos)
    }

    #[inline]
    pub fn player(&self) -> &Monster {
        &self.monsters[PLAYER]
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Monster {
        &mut self.monsters[PLAYER]
    }

    /// The index of the monster standing on `pos`, if any.
    #[inline]
    pub fn occupant(&self, pos: Coords) -> Option<usize> {
        self.tile(pos).monster.map(usize::from)
    }

    // ── RNG ──

    /// SplitMix64 step. Lives in the world so that snapshots carry the
    /// generator state and stay bit-comparable.
    pub fn rand(&mut self) -> u32 {
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        (z ^ (z >> 31)) as u32
    }

    // ── Invariants ──

    /// Tile↔monster consistency, one monster per cell, intact border.
    /// Checked by tests after every beat; violations are programmer errors.
    pub fn check_invariants(&self) {
        for (i, m) in self.monsters.iter().enumerate() {
            // Bombs never hold a back-reference; whoever planted one is
            // usually still standing on it.
            if m.alive() && m.kind != MonsterKind::Bomb {
                assert_eq!(
                    self.tile(m.pos).monster,
                    Some(i as u8),
                    "monster {i} not backed by its tile"
                );
            }
        }
        for y in 0..BOARD_SIZE as i8 {
            for x in 0..BOARD_SIZE as i8 {
                let pos = Coords { x, y };
                let t = self.tile(pos);
                if let Some(idx) = t.monster {
                    let m = &self.monsters[idx as usize];
                    assert!(m.alive(), "tile ({x},{y}) refers to a dead monster");
                    assert_eq!(m.pos, pos, "tile ({x},{y}) back-reference mismatch");
                }
                if x == 0 || y == 0 || x == BOARD_SIZE as i8 - 1 || y == BOARD_SIZE as i8 - 1 {
                    assert!(t.kind.is_wall() && t.hp == 5, "border breached at ({x},{y})");
                }
            }
        }
    }
}

// ── Test scaffolding ──

#[cfg(test)]
pub mod diagram {
    //! Build worlds from string diagrams, one character per tile.
    //! Legend:  '#'=dirt wall (hp 1)  '2'=stone wall (hp 2)  '+'=door
    //!          '='=edge wall (hp 5)  '>'=stairs  '~'=water  't'=tar
    //!          'f'=fire  'i'=ice  'o'=ooze  '@'=player  '.'=floor
    //! The diagram is pasted at (1,1); everything outside stays edge wall.

    use super::*;
    use crate::domain::class::class_info;
    use crate::domain::coords::coords;
    use crate::domain::tile::TileKind;

    pub fn world_from(rows: &[&str]) -> World {
        let mut world = World::new(coords(1, 1));
        world.board.tile_mut(coords(1, 1)).monster = None;
        let mut player_pos = None;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let pos = coords(x as i8 + 1, y as i8 + 1);
                let tile = world.board.tile_mut(pos);
                let (kind, hp) = match ch {
                    '#' => (TileKind::Wall, 1),
                    '2' => (TileKind::Wall, 2),
                    '+' => (TileKind::Wall, 0),
                    '=' => (TileKind::Wall, 5),
                    '>' => (TileKind::Stairs, 0),
                    '~' => (TileKind::Water, 0),
                    't' => (TileKind::Tar, 0),
                    'f' => (TileKind::Fire, 0),
                    'i' => (TileKind::Ice, 0),
                    'o' => (TileKind::Ooze, 0),
                    '@' => {
                        player_pos = Some(pos);
                        (TileKind::Floor, 0)
                    }
                    _ => (TileKind::Floor, 0),
                };
                tile.kind = kind;
                tile.hp = hp;
                tile.revealed = true;
            }
        }
        let spawn = player_pos.expect("diagram needs an '@'");
        world.spawn = spawn;
        world.monsters[PLAYER].pos = spawn;
        world.monsters[PLAYER].prev_pos = spawn;
        world.board.tile_mut(spawn).monster = Some(PLAYER as u8);
        world
    }

    /// Append a monster and wire up its tile back-reference.
    pub fn spawn(world: &mut World, kind: MonsterKind, pos: Coords) -> usize {
        let idx = world.monsters.len();
        world.monsters.push(Monster::new(kind, class_info(kind).max_hp, pos));
        world.board.tile_mut(pos).monster = Some(idx as u8);
        idx
    }
}

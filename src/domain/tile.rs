/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// The numeric tags are stable: they are the type codes the dungeon
/// loader reads, so they must not be renumbered.
///
/// `Wall` covers every wall variant — dirt, stone, shop, door, level edge,
/// fire-wall, ice-wall, catacomb. Variants are distinguished by the tile's
/// `hp` (0 = door, 1–4 = diggable hardness, 5 = indestructible edge) and
/// `zone` (2 = fire-wall at hp 2, 3 = ice-wall at hp 2, 4 = catacomb).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TileKind {
    Wall = 0,
    Floor = 1,
    Shop = 3,
    Water = 4,
    Tar = 8,
    Stairs = 9,
    Fire = 10,
    Ice = 11,
    Ooze = 17,
}

impl TileKind {
    pub fn is_wall(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Floor hazards a bomb or beetle can overwrite.
    pub fn is_hazard(self) -> bool {
        matches!(
            self,
            TileKind::Water | TileKind::Tar | TileKind::Fire | TileKind::Ice | TileKind::Ooze
        )
    }
}

/// One board cell. The `monster` back-reference is an index into the
/// world's monster array — a relation, not ownership — which is what keeps
/// the whole board `Copy` and snapshots cheap.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub kind: TileKind,
    /// Wall hardness. Meaningless for non-walls.
    pub hp: i8,
    /// Biome classifier 1–4; drives dig chaining and death transmutation.
    pub zone: i8,
    /// Accumulated torch light. Shadowcasting reveals tiles lit >= 102.
    pub light: i16,
    pub torch: bool,
    pub traps_destroyed: bool,
    pub revealed: bool,
    pub monster: Option<u8>,
}

impl Tile {
    /// Walls are diggable between hardness 0 (doors) and 4; 5 marks the
    /// indestructible level edge.
    pub fn is_diggable(&self) -> bool {
        self.kind.is_wall() && self.hp < 5
    }

    pub fn is_door(&self) -> bool {
        self.kind.is_wall() && self.hp == 0
    }

    /// Zone-4 catacomb walls chain-demolish their neighbours when dug.
    pub fn is_catacomb(&self) -> bool {
        self.kind.is_wall() && self.zone == 4 && (self.hp == 1 || self.hp == 2)
    }
}

impl Default for Tile {
    /// The default cell is a level-edge wall; the loader carves the level
    /// interior out of it, which is what guarantees the indestructible
    /// border without per-move bounds checks.
    fn default() -> Self {
        Tile {
            kind: TileKind::Wall,
            hp: 5,
            zone: 0,
            light: 0,
            torch: false,
            traps_destroyed: false,
            revealed: false,
            monster: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tile_is_edge_wall() {
        let t = Tile::default();
        assert!(t.kind.is_wall());
        assert_eq!(t.hp, 5);
        assert!(!t.is_diggable());
    }

    #[test]
    fn wall_variants() {
        let mut t = Tile::default();
        t.hp = 0;
        assert!(t.is_door() && t.is_diggable());
        t.hp = 2;
        t.zone = 4;
        assert!(t.is_catacomb());
        t.kind = TileKind::Floor;
        assert!(!t.is_catacomb() && !t.is_diggable());
    }

    #[test]
    fn hazard_classification() {
        assert!(TileKind::Tar.is_hazard());
        assert!(TileKind::Ooze.is_hazard());
        assert!(!TileKind::Stairs.is_hazard());
        assert!(!TileKind::Wall.is_hazard());
    }
}

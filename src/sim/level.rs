//! Level grid parsing
//!
//! Levels are ASCII art, one character per 64-unit cell. Text is authored
//! top-down but the world is y-up, so the last text line is world row 0.
//!
//! ```text
//! xxxxxxxx
//! x    s x     x wall      s star
//! x vxx  x     v vortex    f finish
//! x  t  fx     t teleport  e teleport exit
//! xe     x
//! xxxxxxxx
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::error::LevelError;
use crate::cell_to_world;

/// Level file number (`level1.txt` is `LevelId(1)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(pub u32);

impl LevelId {
    pub fn file_name(&self) -> String {
        format!("level{}.txt", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level{}", self.0)
    }
}

/// Kinds of static level entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Wall,
    Vortex,
    Star,
    Finish,
    TeleportEntrance,
    TeleportExit,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Wall,
        EntityKind::Vortex,
        EntityKind::Star,
        EntityKind::Finish,
        EntityKind::TeleportEntrance,
        EntityKind::TeleportExit,
    ];

    /// Map a level letter to an entity. `Ok(None)` is an empty cell, `Err` an unknown letter.
    pub fn from_letter(letter: char) -> Result<Option<Self>, char> {
        match letter {
            'x' => Ok(Some(EntityKind::Wall)),
            'v' => Ok(Some(EntityKind::Vortex)),
            's' => Ok(Some(EntityKind::Star)),
            'f' => Ok(Some(EntityKind::Finish)),
            't' => Ok(Some(EntityKind::TeleportEntrance)),
            'e' => Ok(Some(EntityKind::TeleportExit)),
            ' ' => Ok(None),
            other => Err(other),
        }
    }

    pub fn letter(&self) -> char {
        match self {
            EntityKind::Wall => 'x',
            EntityKind::Vortex => 'v',
            EntityKind::Star => 's',
            EntityKind::Finish => 'f',
            EntityKind::TeleportEntrance => 't',
            EntityKind::TeleportExit => 'e',
        }
    }
}

/// A positioned level entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique within a session; assigned when the level is installed
    pub id: u32,
    pub kind: EntityKind,
    /// Grid cell, row 0 at the bottom
    pub cell: UVec2,
    /// Cell centre in world units
    pub pos: Vec2,
}

/// A parsed level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    /// Text lines as authored (top line first)
    pub rows: Vec<String>,
    /// Entities, bottom row first, left to right
    pub entities: Vec<Entity>,
    /// Teleport destinations in the order they were found
    pub teleport_exits: Vec<Vec2>,
}

impl Level {
    /// A level with no rows and nothing in it
    pub fn empty(id: LevelId) -> Self {
        Self {
            id,
            rows: Vec::new(),
            entities: Vec::new(),
            teleport_exits: Vec::new(),
        }
    }

    /// Number of entities of a kind still in the level
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    /// Grid size in cells (widest row x row count)
    pub fn size(&self) -> UVec2 {
        let width = self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        UVec2::new(width as u32, self.rows.len() as u32)
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Remove an entity by id, returning it if it was present
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Give entities session-unique ids starting at `first`. Returns the next free id.
    pub fn assign_ids(&mut self, first: u32) -> u32 {
        let mut next = first;
        for entity in &mut self.entities {
            entity.id = next;
            next += 1;
        }
        next
    }
}

/// Parse level text into entities.
///
/// Entity ids are left at zero; the game state numbers them when the level is
/// installed.
pub fn parse_level(id: LevelId, text: &str, cell_size: f32) -> Result<Level, LevelError> {
    let mut lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    // A final newline is not an extra (empty) bottom row
    if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.iter().all(|l| l.is_empty()) {
        return Err(LevelError::Empty { level: id });
    }

    let line_count = lines.len();
    let mut entities = Vec::new();
    let mut teleport_exits = Vec::new();

    for (row, line) in lines.iter().rev().enumerate() {
        for (column, letter) in line.chars().enumerate() {
            let kind = EntityKind::from_letter(letter).map_err(|letter| LevelError::UnknownLetter {
                level: id,
                letter,
                line: line_count - row,
                column: column + 1,
            })?;
            let Some(kind) = kind else {
                continue;
            };

            let cell = UVec2::new(column as u32, row as u32);
            let pos = cell_to_world(cell, cell_size);
            if kind == EntityKind::TeleportExit {
                teleport_exits.push(pos);
            }
            entities.push(Entity { id: 0, kind, cell, pos });
        }
    }

    Ok(Level {
        id,
        rows: lines.iter().map(|l| (*l).to_owned()).collect(),
        entities,
        teleport_exits,
    })
}

/// Provides raw level text by id
pub trait LevelSource {
    fn load_text(&self, id: LevelId) -> Result<String, LevelError>;
}

/// Level files compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLevels;

impl BundledLevels {
    const LEVELS: [&'static str; 3] = [
        include_str!("../../levels/level1.txt"),
        include_str!("../../levels/level2.txt"),
        include_str!("../../levels/level3.txt"),
    ];

    pub fn ids() -> impl Iterator<Item = LevelId> {
        (1..=Self::LEVELS.len() as u32).map(LevelId)
    }
}

impl LevelSource for BundledLevels {
    fn load_text(&self, id: LevelId) -> Result<String, LevelError> {
        let index = (id.0 as usize).checked_sub(1).ok_or(LevelError::MissingLevel(id))?;
        Self::LEVELS
            .get(index)
            .map(|text| (*text).to_owned())
            .ok_or(LevelError::MissingLevel(id))
    }
}

/// Level files read from a directory at load time (`<dir>/levelN.txt`)
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl LevelSource for LevelDirectory {
    fn load_text(&self, id: LevelId) -> Result<String, LevelError> {
        let path = self.root.join(id.file_name());
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LevelError::MissingLevel(id)
            } else {
                LevelError::Io { level: id, source }
            }
        })
    }
}

/// Load and parse in one step
pub fn load_level(source: &dyn LevelSource, id: LevelId, cell_size: f32) -> Result<Level, LevelError> {
    let text = source.load_text(id)?;
    let level = parse_level(id, &text, cell_size)?;
    log::info!(
        "Loaded {} ({}x{} cells, {} entities, {} teleport exits)",
        id,
        level.size().x,
        level.size().y,
        level.entities.len(),
        level.teleport_exits.len()
    );
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CELL_SIZE;
    use proptest::prelude::*;

    fn parse(text: &str) -> Level {
        parse_level(LevelId(1), text, CELL_SIZE).expect("level should parse")
    }

    #[test]
    fn test_parse_small_grid() {
        let level = parse("x s\nx  \nxxx");
        assert_eq!(level.count(EntityKind::Wall), 5);
        assert_eq!(level.count(EntityKind::Star), 1);
        assert_eq!(level.size(), UVec2::new(3, 3));

        // Top text line is the highest world row
        let star = level
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Star)
            .expect("star");
        assert_eq!(star.cell, UVec2::new(2, 2));
        assert_eq!(star.pos, Vec2::new(2.0 * 64.0 + 32.0, 2.0 * 64.0 + 32.0));
    }

    #[test]
    fn test_parse_star_in_middle_cell() {
        let level = parse(" x \nxs \n x ");
        assert_eq!(level.count(EntityKind::Wall), 3);
        assert_eq!(level.count(EntityKind::Star), 1);
        let star = level.entities.iter().find(|e| e.kind == EntityKind::Star).expect("star");
        assert_eq!(star.pos, Vec2::new(96.0, 96.0));
    }

    #[test]
    fn test_entities_bottom_row_first() {
        let level = parse("s\nx");
        assert_eq!(level.entities[0].kind, EntityKind::Wall);
        assert_eq!(level.entities[0].pos, Vec2::new(32.0, 32.0));
        assert_eq!(level.entities[1].kind, EntityKind::Star);
        assert_eq!(level.entities[1].pos, Vec2::new(32.0, 96.0));
    }

    #[test]
    fn test_teleport_exits_in_encounter_order() {
        let level = parse("e t\n  e");
        assert_eq!(level.teleport_exits, vec![Vec2::new(160.0, 32.0), Vec2::new(32.0, 96.0)]);
        assert_eq!(level.count(EntityKind::TeleportExit), 2);
        assert_eq!(level.count(EntityKind::TeleportEntrance), 1);
    }

    #[test]
    fn test_unknown_letter_reports_authored_position() {
        let err = parse_level(LevelId(2), "xxx\nx?x\nxxx", CELL_SIZE).unwrap_err();
        match err {
            LevelError::UnknownLetter { level, letter, line, column } => {
                assert_eq!(level, LevelId(2));
                assert_eq!(letter, '?');
                assert_eq!(line, 2);
                assert_eq!(column, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_uppercase_is_not_in_alphabet() {
        assert!(matches!(
            parse_level(LevelId(1), "X", CELL_SIZE),
            Err(LevelError::UnknownLetter { letter: 'X', .. })
        ));
    }

    #[test]
    fn test_trailing_newline_and_crlf() {
        let plain = parse("x s\nx  \nxxx");
        let unix = parse("x s\nx  \nxxx\n");
        let dos = parse("x s\r\nx  \r\nxxx\r\n");
        assert_eq!(plain.entities, unix.entities);
        assert_eq!(plain.entities, dos.entities);
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(matches!(parse_level(LevelId(4), "", CELL_SIZE), Err(LevelError::Empty { .. })));
        assert!(matches!(parse_level(LevelId(4), "\n", CELL_SIZE), Err(LevelError::Empty { .. })));
    }

    #[test]
    fn test_assign_ids_and_remove() {
        let mut level = parse("sss");
        let next = level.assign_ids(10);
        assert_eq!(next, 13);
        assert_eq!(level.remove(11).map(|e| e.id), Some(11));
        assert!(level.remove(11).is_none());
        assert_eq!(level.entities.len(), 2);
    }

    #[test]
    fn test_bundled_levels_parse() {
        for id in BundledLevels::ids() {
            let level = load_level(&BundledLevels, id, CELL_SIZE).expect("bundled level");
            assert_eq!(level.count(EntityKind::Finish), 1, "{id} needs a finish");
            assert!(level.count(EntityKind::Star) > 0, "{id} has no stars");
            // Ball starts in an empty cell
            let start = crate::consts::PLAYER_START;
            assert!(
                level.entities.iter().all(|e| e.pos != start),
                "{id} blocks the start cell"
            );
        }
        assert!(matches!(BundledLevels.load_text(LevelId(0)), Err(LevelError::MissingLevel(_))));
        assert!(matches!(BundledLevels.load_text(LevelId(9)), Err(LevelError::MissingLevel(_))));
    }

    #[test]
    fn test_directory_missing_file() {
        let dir = LevelDirectory::new(std::env::temp_dir().join("marble-maze-no-such-dir"));
        assert!(matches!(dir.load_text(LevelId(1)), Err(LevelError::MissingLevel(LevelId(1)))));
    }

    fn level_text() -> impl Strategy<Value = String> {
        prop::collection::vec("[xvsfte ]{1,12}", 1..10).prop_map(|rows| rows.join("\n"))
    }

    proptest! {
        #[test]
        fn prop_parse_is_deterministic(text in level_text()) {
            let a = parse_level(LevelId(1), &text, CELL_SIZE);
            let b = parse_level(LevelId(1), &text, CELL_SIZE);
            match (a, b) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(_), Err(_)) => {}
                _ => prop_assert!(false, "parse results differ"),
            }
        }

        #[test]
        fn prop_first_line_is_highest(rows in prop::collection::vec("[ vs]{0,8}", 1..10)) {
            // Wall on the first line, everything else below it
            let text = format!("x\n{}", rows.join("\n"));
            let level = parse_level(LevelId(1), &text, CELL_SIZE).expect("alphabet only");
            let top_wall = level
                .entities
                .iter()
                .filter(|e| e.kind == EntityKind::Wall)
                .map(|e| e.pos.y)
                .fold(f32::MIN, f32::max);
            let highest = level.entities.iter().map(|e| e.pos.y).fold(f32::MIN, f32::max);
            prop_assert_eq!(top_wall, highest);
            prop_assert_eq!(level.teleport_exits.len(), level.count(EntityKind::TeleportExit));
        }
    }
}

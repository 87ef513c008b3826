//! Recursive branching growth of a bonsai onto a [`Canvas`].
//!
//! Growth starts at the bottom centre of the stage's envelope and walks
//! upward. Every step records which neighbours a cell is connected to; the
//! connection mask picks the box-drawing glyph at paint time, so corners
//! appear where a branch turns and tees/crosses where branches fork.
//!
//! # Determinism
//!
//! Each call owns a [`ChaCha8Rng`]. With a seed the whole random sequence
//! (turns, forks, leaf placement) follows from it and the same inputs yield
//! the same canvas on every platform. Without a seed the generator is
//! seeded from OS entropy and the result cannot be replayed.

use crate::canvas::{Canvas, BLANK};
use crate::catalog::{Catalog, SeasonPalette, StyleProfile, TrunkGlyphs};
use crate::types::{AgeStage, Season, Style};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LINK_N: u8 = 0b0001;
const LINK_S: u8 = 0b0010;
const LINK_E: u8 = 0b0100;
const LINK_W: u8 = 0b1000;

/// Connection mask -> index into the trunk glyph set.
const GLYPH_FOR_MASK: [usize; 16] = [0, 0, 0, 0, 1, 4, 2, 6, 1, 5, 3, 7, 1, 9, 8, 10];

/// Trunk length as a fraction of canvas height
const TRUNK_LENGTH_RATIO: f64 = 0.5;
/// Child branch length as a fraction of its parent's
const CHILD_LENGTH_RATIO: f64 = 0.65;
/// Per-step fork probability before complexity scaling
const SPAWN_BASE: f64 = 0.22;
const MAX_SPAWN: f64 = 0.85;
/// Chance a sideways run bends back upward
const RISE_BACK: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Up,
    Left,
    Right,
}

impl Heading {
    fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// Link set on the cell being left
    fn exit(self) -> u8 {
        match self {
            Heading::Up => LINK_N,
            Heading::Left => LINK_W,
            Heading::Right => LINK_E,
        }
    }

    /// Link set on the cell being entered
    fn entry(self) -> u8 {
        match self {
            Heading::Up => LINK_S,
            Heading::Left => LINK_E,
            Heading::Right => LINK_W,
        }
    }

    fn mirror(self) -> Self {
        match self {
            Heading::Up => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// Grows trees from the parameters in a [`Catalog`].
///
/// Holds no mutable state, so one grower can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct TreeGrower<'a> {
    catalog: &'a Catalog,
}

impl<'a> TreeGrower<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Grow a tree. See the module docs for how `seed` is used.
    pub fn grow(&self, style: Style, season: Season, age: AgeStage, seed: Option<u64>) -> Canvas {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut growth = Growth::new(
            *self.catalog.style(style),
            *self.catalog.palette(season),
            age,
            rng,
        );
        growth.run();
        growth.paint(self.catalog.trunk())
    }
}

/// Mutable state for a single `grow` call
struct Growth {
    profile: StyleProfile,
    palette: SeasonPalette,
    age: AgeStage,
    rng: ChaCha8Rng,
    width: i32,
    height: i32,
    depth: u32,
    links: Vec<u8>,
    leaves: Vec<Option<char>>,
}

impl Growth {
    fn new(profile: StyleProfile, palette: SeasonPalette, age: AgeStage, rng: ChaCha8Rng) -> Self {
        let envelope = age.envelope();
        let cells = envelope.width * envelope.height;
        let depth = (f64::from(age.base_depth()) * profile.complexity).round() as u32;
        Self {
            profile,
            palette,
            age,
            rng,
            width: envelope.width as i32,
            height: envelope.height as i32,
            depth,
            links: vec![0; cells],
            leaves: vec![None; cells],
        }
    }

    fn run(&mut self) {
        let base = (self.width / 2, self.height - 1);
        let length = (f64::from(self.height) * TRUNK_LENGTH_RATIO).round() as u32;
        self.branch(base, Heading::Up, 0, length, None);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Walk one branch. Leaving the canvas or running into existing wood
    /// ends the branch where it stands.
    ///
    /// `side` pins every sideways move of a branch that grew off to one side
    /// of its parent, so descendants never cross back over the wood they
    /// came from.
    fn branch(
        &mut self,
        start: (i32, i32),
        mut heading: Heading,
        level: u32,
        length: u32,
        side: Option<Heading>,
    ) {
        let (mut x, mut y) = start;
        let mut drawn = 0;

        for step in 0..length {
            let (dx, dy) = heading.delta();
            let (nx, ny) = (x + dx, y + dy);
            let (Some(from), Some(to)) = (self.index(x, y), self.index(nx, ny)) else {
                break;
            };
            if self.links[to] != 0 {
                break;
            }
            self.links[from] |= heading.exit();
            self.links[to] |= heading.entry();
            x = nx;
            y = ny;
            drawn += 1;

            let interior = step + 1 < length;
            if interior && level < self.depth && step + 1 >= length / 3 {
                self.fork((x, y), heading, level, length, side);
            }
            heading = self.turn(heading, level, side);
        }

        if drawn > 0 {
            self.canopy(x, y);
        }
    }

    /// Possibly spawn one or two child branches from `at`.
    fn fork(
        &mut self,
        at: (i32, i32),
        heading: Heading,
        level: u32,
        parent_length: u32,
        side: Option<Heading>,
    ) {
        let spawn = (SPAWN_BASE * self.profile.complexity + self.profile.curve_bias.abs() * 0.1)
            .clamp(0.0, MAX_SPAWN);
        if !self.rng.gen_bool(spawn) {
            return;
        }
        let twin = (self.profile.complexity - 1.0 + 0.2).clamp(0.0, 0.7);
        let both = self.rng.gen_bool(twin);
        let length = (f64::from(parent_length) * CHILD_LENGTH_RATIO).round().max(2.0) as u32;
        let level = level + 1;

        match (heading, side) {
            (Heading::Up, None) => {
                let first = self.pick_side();
                self.branch(at, first, level, length, Some(first));
                if both {
                    self.branch(at, first.mirror(), level, length, Some(first.mirror()));
                }
            }
            (Heading::Up, Some(side)) => {
                self.branch(at, side, level, length, Some(side));
                if both {
                    self.branch(at, Heading::Up, level, length, Some(side));
                }
            }
            (sideways, side) => {
                self.branch(at, Heading::Up, level, length, Some(side.unwrap_or(sideways)));
            }
        }
    }

    fn turn(&mut self, heading: Heading, level: u32, side: Option<Heading>) -> Heading {
        let bias = self.profile.curve_bias.abs();
        match heading {
            Heading::Up => {
                let lean = if level == 0 {
                    bias * 0.8
                } else {
                    0.2 + bias * 0.5 + 0.05 * f64::from(level)
                };
                if !self.rng.gen_bool(lean.min(0.8)) {
                    return Heading::Up;
                }
                match side {
                    Some(side) => side,
                    None => self.pick_side(),
                }
            }
            sideways => {
                if self.rng.gen_bool(RISE_BACK) {
                    Heading::Up
                } else {
                    sideways
                }
            }
        }
    }

    /// Left or right, skewed by the curve bias
    fn pick_side(&mut self) -> Heading {
        let right = (0.5 + self.profile.curve_bias).clamp(0.1, 0.9);
        if self.rng.gen_bool(right) {
            Heading::Right
        } else {
            Heading::Left
        }
    }

    /// Scatter leaves around a branch terminus.
    fn canopy(&mut self, cx: i32, cy: i32) {
        let radius = self.age.canopy_radius();
        let density = self.age.leaf_density();
        // cells are roughly twice as tall as wide
        for dy in -radius..=radius {
            for dx in -(radius * 2)..=(radius * 2) {
                let Some(i) = self.index(cx + dx, cy + dy) else {
                    continue;
                };
                if self.links[i] != 0 || !self.rng.gen_bool(density) {
                    continue;
                }
                let pick = self.rng.gen_range(0..self.palette.leaves.len());
                self.leaves[i] = Some(self.palette.leaves[pick]);
            }
        }
    }

    fn paint(&self, trunk: &TrunkGlyphs) -> Canvas {
        let mut canvas = Canvas::blank(self.width as usize, self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let i = (y * self.width + x) as usize;
                let glyph = match (self.links[i], self.leaves[i]) {
                    (0, Some(leaf)) => leaf,
                    (0, None) => BLANK,
                    (mask, _) => trunk.get(GLYPH_FOR_MASK[mask as usize]),
                };
                canvas.set(x as usize, y as usize, glyph);
            }
        }
        canvas
    }
}

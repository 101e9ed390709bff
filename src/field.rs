//! Occupancy grid and neighbour queries.

use crate::entity::EntityId;
use crate::location::Location;
use rand::Rng;
use std::collections::HashMap;

/// Default depth used when a non-positive dimension is requested
pub const DEFAULT_DEPTH: usize = 80;
/// Default width used when a non-positive dimension is requested
pub const DEFAULT_WIDTH: usize = 120;

/// Bounded rectangular grid holding at most one occupant per cell.
///
/// The field keeps a reverse index from occupant to cell so that placing an
/// occupant always vacates the cell it held before.
#[derive(Clone, Debug)]
pub struct Field {
    depth: usize,
    width: usize,
    /// cells[row * width + col]
    cells: Vec<Option<EntityId>>,
    positions: HashMap<EntityId, Location>,
}

impl Field {
    /// Create an empty field. Zero dimensions fall back to the defaults.
    pub fn new(depth: usize, width: usize) -> Self {
        let (depth, width) = if depth == 0 || width == 0 {
            log::warn!(
                "Field dimensions must be greater than zero (got {}x{}), using {}x{}",
                depth,
                width,
                DEFAULT_DEPTH,
                DEFAULT_WIDTH
            );
            (DEFAULT_DEPTH, DEFAULT_WIDTH)
        } else {
            (depth, width)
        };

        Self {
            depth,
            width,
            cells: vec![None; depth * width],
            positions: HashMap::new(),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn contains(&self, loc: Location) -> bool {
        loc.row < self.depth && loc.col < self.width
    }

    #[inline]
    fn index(&self, loc: Location) -> Option<usize> {
        self.contains(loc).then(|| loc.row * self.width + loc.col)
    }

    /// Put `id` at `loc`, vacating whatever cell `id` held before.
    ///
    /// Any other occupant of `loc` is evicted from the index.
    pub fn place(&mut self, id: EntityId, loc: Location) {
        let Some(idx) = self.index(loc) else {
            return;
        };

        if let Some(previous) = self.positions.remove(&id) {
            if let Some(prev_idx) = self.index(previous) {
                if self.cells[prev_idx] == Some(id) {
                    self.cells[prev_idx] = None;
                }
            }
        }

        if let Some(evicted) = self.cells[idx].replace(id) {
            if evicted != id {
                self.positions.remove(&evicted);
            }
        }
        self.positions.insert(id, loc);
    }

    /// Vacate a cell
    pub fn clear(&mut self, loc: Location) {
        if let Some(idx) = self.index(loc) {
            if let Some(id) = self.cells[idx].take() {
                self.positions.remove(&id);
            }
        }
    }

    /// Vacate every cell
    pub fn clear_all(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.positions.clear();
    }

    /// Occupant of a cell, if any
    #[inline]
    pub fn occupant_at(&self, loc: Location) -> Option<EntityId> {
        self.index(loc).and_then(|idx| self.cells[idx])
    }

    /// Cell currently held by an occupant
    #[inline]
    pub fn location_of(&self, id: EntityId) -> Option<Location> {
        self.positions.get(&id).copied()
    }

    #[inline]
    pub fn is_free(&self, loc: Location) -> bool {
        self.contains(loc) && self.occupant_at(loc).is_none()
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.positions.len()
    }

    /// In-bounds 8-neighbours of `loc`, row-major, excluding `loc` itself.
    pub fn adjacent_locations(&self, loc: Location) -> Vec<Location> {
        let mut neighbours = Vec::with_capacity(8);
        if !self.contains(loc) {
            return neighbours;
        }

        let row_min = loc.row.saturating_sub(1);
        let row_max = (loc.row + 1).min(self.depth - 1);
        let col_min = loc.col.saturating_sub(1);
        let col_max = (loc.col + 1).min(self.width - 1);

        for row in row_min..=row_max {
            for col in col_min..=col_max {
                if row != loc.row || col != loc.col {
                    neighbours.push(Location::new(row, col));
                }
            }
        }

        neighbours
    }

    /// Unoccupied neighbours, in the same order as [`Field::adjacent_locations`]
    pub fn free_adjacent_locations(&self, loc: Location) -> Vec<Location> {
        self.adjacent_locations(loc)
            .into_iter()
            .filter(|&n| self.occupant_at(n).is_none())
            .collect()
    }

    /// First unoccupied neighbour in row-major order.
    ///
    /// Movement through this drifts towards the top-left corner. It draws
    /// nothing from the RNG.
    pub fn free_adjacent_location(&self, loc: Location) -> Option<Location> {
        self.adjacent_locations(loc)
            .into_iter()
            .find(|&n| self.occupant_at(n).is_none())
    }

    /// Uniformly chosen neighbour, occupied or not
    pub fn random_adjacent_location<R: Rng + ?Sized>(
        &self,
        loc: Location,
        rng: &mut R,
    ) -> Option<Location> {
        let neighbours = self.adjacent_locations(loc);
        if neighbours.is_empty() {
            None
        } else {
            Some(neighbours[rng.gen_range(0..neighbours.len())])
        }
    }

    /// Iterate over occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Location, EntityId)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|id| (Location::new(idx / self.width, idx % self.width), id))
        })
    }
}

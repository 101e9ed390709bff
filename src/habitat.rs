//! The habitat: the field plus every entity standing on it.
//!
//! Entities never reference each other or the field directly. All placement,
//! movement and death goes through the habitat so the occupancy grid and the
//! locations recorded on entities never disagree.

use crate::entity::{DeathCause, Entity, EntityId, Origin};
use crate::field::Field;
use crate::location::Location;
use crate::species::{Kind, SpeciesTable};
use rand::Rng;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct Habitat {
    field: Field,
    entities: HashMap<EntityId, Entity>,
    next_id: EntityId,
}

impl Habitat {
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            field: Field::new(depth, width),
            entities: HashMap::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Liveness of an entity; unknown ids count as dead
    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(&id).map_or(false, Entity::is_active)
    }

    /// Entity standing on a cell
    pub fn occupant(&self, loc: Location) -> Option<&Entity> {
        self.field.occupant_at(loc).and_then(|id| self.entities.get(&id))
    }

    /// Create an entity and place it on the field, evicting any occupant.
    ///
    /// Returns `None` (and creates nothing) if `loc` lies outside the field.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        kind: Kind,
        loc: Location,
        origin: Origin,
        species: &SpeciesTable,
        rng: &mut R,
    ) -> Option<EntityId> {
        if !self.field.contains(loc) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;

        if let Some(evicted) = self.field.occupant_at(loc) {
            self.kill(evicted, DeathCause::Overcrowding);
        }

        let entity = Entity::new(id, kind, loc, origin, species, rng);
        self.field.place(id, loc);
        self.entities.insert(id, entity);
        Some(id)
    }

    /// Move a live entity to a free cell. Returns false if the move is illegal.
    pub fn relocate(&mut self, id: EntityId, to: Location) -> bool {
        if !self.field.is_free(to) {
            return false;
        }
        match self.entities.get_mut(&id) {
            Some(entity) if entity.is_active() => {
                self.field.place(id, to);
                entity.set_location(to);
                true
            }
            _ => false,
        }
    }

    /// Mark an entity dead and vacate its cell
    pub fn kill(&mut self, id: EntityId, cause: DeathCause) {
        if let Some(entity) = self.entities.get_mut(&id) {
            if let Some(loc) = entity.location() {
                if self.field.occupant_at(loc) == Some(id) {
                    self.field.clear(loc);
                }
            }
            entity.mark_dead(cause);
        }
    }

    /// Drop dead entities from the arena; returns how many were removed
    pub fn purge_dead(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, entity| entity.is_active());
        before - self.entities.len()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.field.clear_all();
        self.entities.clear();
    }

    /// Live entities in field order (row-major)
    pub fn living(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.field
            .occupied()
            .filter_map(move |(_, id)| self.entities.get(&id))
            .filter(|entity| entity.is_active())
    }

    /// Number of entities held in the arena, dead or alive
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live count of one kind
    pub fn count(&self, kind: Kind) -> usize {
        self.living().filter(|entity| entity.kind == kind).count()
    }

    /// Check the occupancy invariants: every live entity sits on exactly the
    /// cell that references it, and every occupied cell holds a live entity.
    pub fn is_consistent(&self) -> bool {
        let cells_ok = self.field.occupied().all(|(loc, id)| {
            self.entities
                .get(&id)
                .map_or(false, |e| e.is_active() && e.location() == Some(loc))
        });
        let entities_ok = self.entities.values().all(|e| match (e.is_active(), e.location()) {
            (true, Some(loc)) => self.field.occupant_at(loc) == Some(e.id),
            (true, None) => false,
            (false, loc) => loc.is_none(),
        });
        cells_ok && entities_ok
    }

    /// Render the field as text, one glyph per cell
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.field.width() + 1) * self.field.depth());
        for row in 0..self.field.depth() {
            for col in 0..self.field.width() {
                let glyph = self
                    .occupant(Location::new(row, col))
                    .map_or('.', |entity| entity.kind.glyph());
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

use crate::{
    Position,
    map::{Grid, GridError},
    occupant::OccupantId,
};

/// Position to occupant lookup.
///
/// Each cell holds the ids registered there in insertion order. Several
/// occupants may share a cell (clutter under the player, for instance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupantIndex {
    cells: Grid<Vec<OccupantId>>,
}

impl OccupantIndex {
    pub fn new(width: usize, height: usize) -> Self {
        OccupantIndex {
            cells: Grid::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        self.cells.in_bounds(position)
    }

    /// Ids registered at `position`. Empty for out-of-bounds positions.
    pub fn at(&self, position: Position) -> &[OccupantId] {
        self.cells
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn insert(&mut self, id: OccupantId, position: Position) -> Result<(), GridError> {
        let error = self.cells.out_of_bounds(position);
        let cell = self.cells.get_mut(position).ok_or(error)?;
        cell.push(id);
        Ok(())
    }

    /// Removes `id` from `position`. Returns whether it was present.
    pub fn remove(&mut self, id: OccupantId, position: Position) -> bool {
        let Some(cell) = self.cells.get_mut(position) else {
            return false;
        };
        match cell.iter().position(|other| *other == id) {
            Some(slot) => {
                cell.remove(slot);
                true
            }
            None => false,
        }
    }

    /// Moves `id` from `from` to `to` as one step.
    ///
    /// The index is left untouched if `to` is out of bounds or `id` is not
    /// registered at `from`.
    pub fn relocate(
        &mut self,
        id: OccupantId,
        from: Position,
        to: Position,
    ) -> Result<(), GridError> {
        if !self.cells.in_bounds(to) {
            return Err(self.cells.out_of_bounds(to));
        }
        if !self.at(from).contains(&id) {
            return Err(GridError::NotRegistered {
                id,
                x: from.x,
                y: from.y,
            });
        }
        self.remove(id, from);
        self.insert(id, to)
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(Vec::clear);
    }

    /// Every `(position, id)` pair in row-major, then insertion, order.
    pub fn entries(&self) -> impl Iterator<Item = (Position, OccupantId)> + '_ {
        self.cells
            .enumerate()
            .flat_map(|(position, ids)| ids.iter().map(move |id| (position, *id)))
    }
}

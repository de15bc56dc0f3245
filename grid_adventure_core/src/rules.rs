//! Contact policy between a moving occupant and an occupant in its way.
//!
//! The table is keyed on the variant pair only, plus the player's key count
//! for doors, so it can be tested without building a world.

use crate::occupant::OccupantKind;

/// What happens when `mover` enters a cell held by another occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The occupant is removed. A player mover gains a key.
    Consume,
    /// The door is removed and the player spends a key.
    Unlock,
    /// The mover shares the cell with the occupant.
    PassThrough,
    /// The occupant must itself move one step in the same direction.
    Push,
}

/// Resolves the contact between `mover` and `occupant`.
///
/// Precedence: consume, unlock, pass through, push.
pub fn contact(mover: OccupantKind, occupant: OccupantKind, keys: u32) -> Contact {
    use OccupantKind::*;

    match (mover, occupant) {
        (_, Consumable) => Contact::Consume,
        (Player, Door) if keys > 0 => Contact::Unlock,
        (Player, Clutter) => Contact::PassThrough,
        _ => Contact::Push,
    }
}

//! Player vs falling item contact test
//!
//! Both shapes are treated as circles: the item uses half its size, the
//! player uses half its *width* for both axes. The asymmetry is part of how
//! the game feels; keep the formula as is.

use super::entity::{FallingItem, ItemKind, Player, Rgba};
use super::state::Viewport;

/// Outcome of checking one item against the player this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Item touched the player
    Hit(ItemKind),
    /// Item fell past the bottom edge untouched
    Missed,
    /// Still falling
    None,
}

impl Contact {
    /// Item must be removed from play
    #[inline]
    pub fn removes_item(&self) -> bool {
        !matches!(self, Contact::None)
    }

    /// Score change requested by this contact (before flooring at zero)
    pub fn score_delta(&self) -> i32 {
        match self {
            Contact::Hit(ItemKind::Rose) => 1,
            Contact::Hit(ItemKind::BrokenHeart) => -1,
            Contact::Missed | Contact::None => 0,
        }
    }

    /// Particle color for the feedback burst, if any
    pub fn burst_color(&self) -> Option<Rgba> {
        match self {
            Contact::Hit(kind) => Some(kind.burst_color()),
            Contact::Missed | Contact::None => None,
        }
    }
}

/// Bounding-circle overlap (strict: touching circles do not collide)
pub fn is_hit(item: &FallingItem, player: &Player) -> bool {
    let distance = item.center().distance(player.center());
    distance < item.radius() + player.radius()
}

/// Classify an item after it has moved this frame
pub fn check_contact(item: &FallingItem, player: &Player, viewport: &Viewport) -> Contact {
    if is_hit(item, player) {
        Contact::Hit(item.kind)
    } else if item.is_below(viewport) {
        Contact::Missed
    } else {
        Contact::None
    }
}

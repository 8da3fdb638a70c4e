//! Collision event dispatch
//!
//! Handlers are registered per ordered category pair, not per shape
//! instance. The world consults the dispatcher once per contact, before
//! impulse resolution; a handler can suppress resolution for that step.
//!
//! Handlers mutate only the context `C` (the game's side of the seam), never
//! the stepping world; the game applies any world removals the handler
//! recorded once `step` returns.

use super::shape::{CollisionCategory, Shape};

/// What the physics step should do with a dispatched contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    /// Run normal impulse resolution
    Resolve,
    /// Exclude this contact from impulse resolution for this step
    Suppress,
}

type Handler<C> = Box<dyn FnMut(&mut C, &Shape, &Shape) -> ContactAction>;

/// Maps ordered collision-category pairs to contact handlers
pub struct CollisionDispatcher<C> {
    handlers: Vec<(CollisionCategory, CollisionCategory, Handler<C>)>,
}

impl<C> Default for CollisionDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CollisionDispatcher<C> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler for contacts between `first` and `second`. The
    /// handler always receives the shapes oriented so its first shape
    /// argument carries `first`, regardless of detection order.
    pub fn register(
        &mut self,
        first: CollisionCategory,
        second: CollisionCategory,
        handler: impl FnMut(&mut C, &Shape, &Shape) -> ContactAction + 'static,
    ) {
        self.handlers.push((first, second, Box::new(handler)));
    }

    /// Invoke the handler for this shape pair, if one is registered.
    /// Returns `None` when no handler matches (the contact resolves
    /// normally).
    pub fn dispatch(&mut self, ctx: &mut C, a: &Shape, b: &Shape) -> Option<ContactAction> {
        for (first, second, handler) in &mut self.handlers {
            if a.category == *first && b.category == *second {
                return Some(handler(ctx, a, b));
            }
            if b.category == *first && a.category == *second {
                return Some(handler(ctx, b, a));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phys::body::BodyId;
    use crate::phys::shape::ShapeId;

    fn shape(id: u32, category: CollisionCategory) -> Shape {
        Shape::circle(ShapeId(id), BodyId(id), 10.0, category)
    }

    #[test]
    fn test_dispatch_orients_pair_to_registration_order() {
        let mut dispatcher: CollisionDispatcher<Vec<u32>> = CollisionDispatcher::new();
        dispatcher.register(
            CollisionCategory::Ball,
            CollisionCategory::Alien,
            |hits, ball, alien| {
                assert_eq!(ball.category, CollisionCategory::Ball);
                assert_eq!(alien.category, CollisionCategory::Alien);
                hits.push(alien.id.0);
                ContactAction::Resolve
            },
        );

        let ball = shape(0, CollisionCategory::Ball);
        let alien = shape(7, CollisionCategory::Alien);
        let mut hits = Vec::new();

        // Both detection orders reach the same handler with the same
        // orientation
        assert_eq!(
            dispatcher.dispatch(&mut hits, &ball, &alien),
            Some(ContactAction::Resolve)
        );
        assert_eq!(
            dispatcher.dispatch(&mut hits, &alien, &ball),
            Some(ContactAction::Resolve)
        );
        assert_eq!(hits, vec![7, 7]);
    }

    #[test]
    fn test_dispatch_unregistered_pair_is_none() {
        let mut dispatcher: CollisionDispatcher<()> = CollisionDispatcher::new();
        dispatcher.register(
            CollisionCategory::Ball,
            CollisionCategory::Alien,
            |_, _, _| ContactAction::Suppress,
        );

        let ball = shape(0, CollisionCategory::Ball);
        let wall = shape(1, CollisionCategory::Wall);
        assert_eq!(dispatcher.dispatch(&mut (), &ball, &wall), None);
    }

    #[test]
    fn test_dispatch_suppress_is_returned() {
        let mut dispatcher: CollisionDispatcher<()> = CollisionDispatcher::new();
        dispatcher.register(
            CollisionCategory::Ball,
            CollisionCategory::Alien,
            |_, _, _| ContactAction::Suppress,
        );

        let ball = shape(0, CollisionCategory::Ball);
        let alien = shape(1, CollisionCategory::Alien);
        assert_eq!(
            dispatcher.dispatch(&mut (), &ball, &alien),
            Some(ContactAction::Suppress)
        );
    }
}

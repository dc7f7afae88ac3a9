//! Animation capability surface.
//!
//! The scheduler drives anything implementing [`Animation`]; it never looks
//! inside. The contract is the emitter lifecycle: advance until finished,
//! then get retired by the owner.

use std::time::Duration;

use crate::render::DrawList;

/// Draw-order grouping key.
///
/// A render pass pulls one layer at a time; an animation lives on exactly
/// one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Under the playfield actors (impact marks, shadows).
    Ground,
    /// At actor height (explosions, hit flashes, projectile trails).
    #[default]
    Air,
    /// Above everything (clouds, weather, screen-space flashes).
    Sky,
}

/// A unit of animated state driven on the shared clock.
///
/// Contract:
/// - `advance` and `finished` have no side effects on scheduler bookkeeping.
/// - Once `finished` returns `true` it keeps returning `true`; the scheduler
///   retires the animation on the first tick that observes it, exactly once.
/// - `advance` arrives from the driver thread, `layer`/`render` also from
///   render-pass threads; none may block indefinitely.
pub trait Animation: Send {
    /// The draw-order layer this animation renders on.
    fn layer(&self) -> Layer;

    /// Returns true once the animation has played out.
    fn finished(&self) -> bool;

    /// Advances internal time by `elapsed` (already speed-scaled).
    fn advance(&mut self, elapsed: Duration);

    /// Appends this animation's draw commands to the frame's list.
    fn render(&self, out: &mut DrawList);
}

/// Owned trait object as stored in the scheduler's active set.
pub type BoxedAnimation = Box<dyn Animation>;

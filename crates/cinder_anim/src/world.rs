//! World capability boundary.

use crate::animation::BoxedAnimation;

/// What the scheduler needs from the game world, and nothing more.
///
/// Passed in at construction as `Arc<dyn World>` and read from the driver
/// thread; there is no hidden back-reference to a larger game object.
pub trait World: Send + Sync {
    /// Current simulation speed factor, read once per tick.
    ///
    /// `1.0` is real time, `0.0` freezes every animation without stopping
    /// the driver. Negative values are treated as `0.0`.
    fn speed_multiplier(&self) -> f32;

    /// Produces one ambient animation (drifting clouds and the like).
    ///
    /// Called batch-size times in a row whenever the ambient countdown
    /// expires; the scheduler admits the results into its own active set.
    fn spawn_ambient(&self) -> BoxedAnimation;
}

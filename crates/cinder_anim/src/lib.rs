//! # CINDER Animation Engine
//!
//! Shared-clock animation scheduling:
//! - Every active animation is driven by ONE dedicated thread
//! - Fixed 50 ms tick, scaled by the world's speed multiplier
//! - Finished animations are retired mark-then-sweep, never mid-traversal
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   add()    ┌───────────────────────┐  render(list, layer)
//! │ Producers │───────────>│  AnimationScheduler   │<──────────────────────
//! └───────────┘            │  ┌─────────────────┐  │      render passes
//!                          │  │   active set    │  │
//! ┌───────────┐  spawn ×5  │  └─────────────────┘  │
//! │   World   │<───────────│     driver thread     │
//! │  (speed)  │───────────>│  tick / sweep / nap   │
//! └───────────┘  per tick  └───────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use cinder_anim::{AnimationScheduler, SchedulerConfig};
//!
//! let scheduler = AnimationScheduler::new(world, SchedulerConfig::default());
//! scheduler.start()?;
//! scheduler.add(Box::new(explosion));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod animation;
pub mod config;
pub mod error;
pub mod events;
pub mod render;
pub mod scheduler;
pub mod world;

pub use animation::{Animation, BoxedAnimation, Layer};
pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use events::{EventReceiver, SchedulerEvent};
pub use render::{DrawCommand, DrawList};
pub use scheduler::{AnimationScheduler, SchedulerStats};
pub use world::World;

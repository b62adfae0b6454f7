//! # driftfield
//!
//! Ambient particle backgrounds: a fixed population of small particles that
//! drift at constant velocity, wrap around the edges, get pushed away from
//! the pointer, and are joined by faint lines when close to each other.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let config = FieldConfig::default()
//!     .with_particle_count(80)
//!     .with_hex_color("#22d3ee")?
//!     .with_interactive(false);
//!
//! let mut field = ParticleField::new(config);
//! let mut scheduler = ManualScheduler::new();
//! let mut surface = RasterSurface::new(800, 600);
//!
//! field.initialize(800.0, 600.0);
//! field.start(&mut scheduler);
//! for handle in scheduler.tick() {
//!     field.on_frame(handle, &mut surface, &mut scheduler);
//! }
//! surface.save("frame.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! A [`ParticleField`] moves through `Uninitialized → Running → TornDown`.
//! [`initialize`](ParticleField::initialize) scatters particles over a
//! surface; each frame is a [`step`](ParticleField::step) followed by a
//! [`render`](ParticleField::render).
//!
//! ### Driving
//!
//! Interactive fields (the default) react to a [`PointerTracker`] and are
//! advanced by the host. Non-interactive fields run their own loop through a
//! [`FrameScheduler`], one pending frame at a time, until
//! [`teardown`](ParticleField::teardown).
//!
//! ### Surfaces
//!
//! Rendering goes through the [`Surface`] trait: [`RecordingSurface`] for
//! inspection, [`RasterSurface`] for CPU pixels and PNG snapshots, and
//! [`GpuSurface`] for a wgpu window.
//!
//! ### Motion
//!
//! The [`motion`] module holds the page effects that usually sit next to a
//! particle background: spring-smoothed cursor followers, a scroll beam,
//! parallax offsets and a typewriter reveal.

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod motion;
pub mod particle;
pub mod pointer;
pub mod raster;
pub mod scheduler;
pub mod spatial;
pub mod surface;
pub mod time;
pub mod viewer;

pub use color::{Rgb, Rgba};
pub use config::{ConnectionStrategy, FieldConfig};
pub use error::{ConfigError, GpuError, SnapshotError, ViewerError};
pub use field::{FieldState, ParticleField};
pub use glam::Vec2;
pub use gpu::GpuSurface;
pub use particle::Particle;
pub use pointer::{PointerSubscription, PointerTracker};
pub use raster::{render_snapshot, RasterSurface};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use spatial::Connection;
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Rgb, Rgba};
    pub use crate::config::{ConnectionStrategy, FieldConfig};
    pub use crate::field::{FieldState, ParticleField};
    pub use crate::motion::{CursorFollower, ParallaxSection, ScrollBeam, ScrollSpy, Spring, SpringConfig, Typewriter};
    pub use crate::pointer::PointerTracker;
    pub use crate::raster::RasterSurface;
    pub use crate::scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
    pub use crate::surface::{RecordingSurface, Surface};
    pub use crate::Vec2;
}

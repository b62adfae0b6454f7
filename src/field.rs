//! The particle field simulator.
//!
//! A [`ParticleField`] owns a fixed population of particles. Each frame it
//! moves them, wraps them around the surface edges, optionally pushes them
//! away from the pointer, and draws them plus faint lines between close
//! pairs.
//!
//! # Driving a field
//!
//! Interactive fields (the default) are advanced by the host, usually from
//! its own redraw handler:
//!
//! ```ignore
//! let mut field = ParticleField::new(FieldConfig::default());
//! field.initialize(800.0, 600.0);
//! field.subscribe_pointer(&mut tracker);
//! // every repaint
//! field.advance(&mut surface);
//! ```
//!
//! Non-interactive fields run their own loop through a [`FrameScheduler`]:
//!
//! ```ignore
//! field.initialize(800.0, 600.0);
//! field.start(&mut scheduler);
//! // whenever the scheduler fires a handle
//! field.on_frame(handle, &mut surface, &mut scheduler);
//! // on unmount
//! field.teardown(&mut scheduler);
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::FieldConfig;
use crate::particle::{wrap_coordinate, Particle};
use crate::pointer::{PointerSubscription, PointerTracker};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::spatial::{find_connections, Connection};
use crate::surface::Surface;

/// Pointer force is `(radius - distance) / FORCE_DIVISOR`.
pub const FORCE_DIVISOR: f32 = 1000.0;

/// Lifecycle of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Created, no particles yet.
    Uninitialized,
    /// Particles exist and frames advance them.
    Running,
    /// Frame loop cancelled and pointer released. Terminal.
    TornDown,
}

/// A fixed population of ambient particles.
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    state: FieldState,
    rng: SmallRng,
    pointer: Option<PointerSubscription>,
    /// The one frame request this field will honor.
    pending_frame: Option<FrameHandle>,
    frames: u64,
    // Scratch buffers reused by render.
    positions: Vec<Vec2>,
    connections: Vec<Connection>,
}

impl ParticleField {
    /// An uninitialized field; seeded from `config.seed` when set.
    pub fn new(config: FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            config,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            state: FieldState::Uninitialized,
            rng,
            pointer: None,
            pending_frame: None,
            frames: 0,
            positions: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// The configuration this field was built with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Particles in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to particle records. The count cannot change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Surface size the particles were distributed over.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Number of step+render frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether a frame request is outstanding.
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Whether this field currently reads the pointer.
    pub fn is_tracking_pointer(&self) -> bool {
        self.pointer.is_some()
    }

    /// Scatter `particle_count` fresh particles over a `width × height` surface.
    ///
    /// Discards any previous particles rather than rescaling them. A zero
    /// dimension collapses that coordinate to 0. Ignored after teardown.
    pub fn initialize(&mut self, width: f32, height: f32) {
        if self.state == FieldState::TornDown {
            debug!("ignoring initialize on a torn down particle field");
            return;
        }

        self.width = width.max(0.0);
        self.height = height.max(0.0);

        let count = self.config.particle_count as usize;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = Particle::random(&mut self.rng, self.width, self.height, &self.config);
            self.particles.push(particle);
        }

        self.state = FieldState::Running;
        debug!(
            count,
            width = self.width,
            height = self.height,
            "initialized particle field"
        );
    }

    /// Start reading pointer positions from `tracker`.
    ///
    /// Only interactive fields subscribe; for others this is a no-op.
    pub fn subscribe_pointer(&mut self, tracker: &mut PointerTracker) {
        if !self.config.interactive || self.state == FieldState::TornDown {
            return;
        }
        self.pointer = Some(tracker.subscribe());
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        if self.state != FieldState::Running {
            return;
        }

        let pointer = if self.config.interactive {
            self.pointer.as_ref().and_then(PointerSubscription::get)
        } else {
            None
        };
        let radius = self.config.interaction_radius;
        let (width, height) = (self.width, self.height);

        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.position.x = wrap_coordinate(particle.position.x, width);
            particle.position.y = wrap_coordinate(particle.position.y, height);

            if let Some(pointer) = pointer {
                particle.velocity += repulsion(particle.position, pointer, radius);
            }

            // A negative length cap would flip the velocity instead of limiting it.
            if let Some(max) = self.config.max_velocity {
                particle.velocity = particle.velocity.clamp_length_max(max.max(0.0));
            }
        }
    }

    /// Draw the particles and their connecting lines.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();

        let color = self.config.color;
        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.radius, color.with_alpha(particle.opacity));
        }

        self.positions.clear();
        self.positions.extend(self.particles.iter().map(|p| p.position));
        let max_distance = self.config.connection_distance;
        find_connections(&self.positions, max_distance, self.config.connections, &mut self.connections);

        for connection in &self.connections {
            let alpha = (1.0 - connection.distance / max_distance) * self.config.line_opacity;
            surface.stroke_line(
                self.positions[connection.a],
                self.positions[connection.b],
                self.config.line_width,
                color.with_alpha(alpha),
            );
        }
    }

    /// One step plus one render. Does nothing unless running.
    ///
    /// This is how the host drives an interactive field.
    pub fn advance<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if self.state != FieldState::Running {
            return;
        }
        self.step();
        self.render(surface);
        self.frames += 1;
    }

    /// Begin the autonomous frame loop.
    ///
    /// Interactive fields are host-driven and never schedule frames. Calling
    /// this while a frame is already pending does nothing, so there is at
    /// most one loop per field.
    pub fn start<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if self.state != FieldState::Running || self.config.interactive || self.pending_frame.is_some() {
            return;
        }
        self.pending_frame = Some(scheduler.request_frame());
    }

    /// Handle a fired frame. Returns true if the field stepped and rendered.
    ///
    /// Only the handle this field last requested is honored; stale handles
    /// from a cancelled loop are ignored.
    pub fn on_frame<S, F>(&mut self, handle: FrameHandle, surface: &mut S, scheduler: &mut F) -> bool
    where
        S: Surface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if self.pending_frame != Some(handle) || self.state != FieldState::Running {
            return false;
        }
        self.pending_frame = None;
        self.advance(surface);
        self.pending_frame = Some(scheduler.request_frame());
        true
    }

    /// Reinitialize for a new surface size.
    ///
    /// A running frame loop is restarted as a single loop; a field that was
    /// never started stays host-driven.
    pub fn resize<F: FrameScheduler + ?Sized>(&mut self, width: f32, height: f32, scheduler: &mut F) {
        if self.state == FieldState::TornDown {
            return;
        }
        let was_looping = self.pending_frame.is_some();
        self.cancel_pending(scheduler);
        self.initialize(width, height);
        if was_looping {
            self.start(scheduler);
        }
    }

    /// Cancel the frame loop and release the pointer. Safe to call repeatedly
    /// or on a field that never started.
    pub fn teardown<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        self.cancel_pending(scheduler);
        self.pointer = None;
        if self.state != FieldState::TornDown {
            debug!(frames = self.frames, "tore down particle field");
        }
        self.state = FieldState::TornDown;
    }

    fn cancel_pending<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
    }
}

/// Velocity change pushing a particle at `position` away from `pointer`.
///
/// Falls off linearly from `radius / FORCE_DIVISOR` at the pointer to zero at
/// `radius`. A particle exactly on the pointer is pushed toward `-x`.
pub fn repulsion(position: Vec2, pointer: Vec2, radius: f32) -> Vec2 {
    let offset = position - pointer;
    let distance = offset.length();
    if distance >= radius {
        return Vec2::ZERO;
    }
    let direction = if distance > 0.0 {
        offset / distance
    } else {
        Vec2::NEG_X
    };
    direction * ((radius - distance) / FORCE_DIVISOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::surface::RecordingSurface;

    fn still_field(config: FieldConfig) -> ParticleField {
        let mut field = ParticleField::new(config.with_seed(3));
        field.initialize(800.0, 600.0);
        for p in field.particles_mut() {
            p.velocity = Vec2::ZERO;
        }
        field
    }

    #[test]
    fn test_new_is_uninitialized() {
        let field = ParticleField::new(FieldConfig::default());
        assert_eq!(field.state(), FieldState::Uninitialized);
        assert!(field.particles().is_empty());
    }

    #[test]
    fn test_step_before_initialize_is_noop() {
        let mut field = ParticleField::new(FieldConfig::default());
        field.step();
        let mut surface = RecordingSurface::new(10, 10);
        field.advance(&mut surface);
        assert_eq!(field.frames(), 0);
        assert_eq!(surface.frame_count(), 0);
    }

    #[test]
    fn test_initialize_count_and_state() {
        let mut field = ParticleField::new(FieldConfig::default().with_particle_count(10));
        field.initialize(800.0, 600.0);
        assert_eq!(field.state(), FieldState::Running);
        assert_eq!(field.particles().len(), 10);
    }

    #[test]
    fn test_repulsion_falloff() {
        let push = repulsion(Vec2::new(150.0, 100.0), Vec2::new(100.0, 100.0), 100.0);
        assert!((push.x - 0.05).abs() < 1e-6);
        assert!(push.y.abs() < 1e-6);

        assert_eq!(repulsion(Vec2::new(200.0, 100.0), Vec2::new(100.0, 100.0), 100.0), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_on_pointer() {
        let push = repulsion(Vec2::splat(5.0), Vec2::splat(5.0), 100.0);
        assert!((push.x + 0.1).abs() < 1e-6);
        assert_eq!(push.y, 0.0);
    }

    #[test]
    fn test_velocity_clamp() {
        let mut field = still_field(FieldConfig::default().with_particle_count(1).with_max_velocity(0.01));
        let mut tracker = PointerTracker::new();
        field.subscribe_pointer(&mut tracker);
        let p = field.particles()[0].position;
        tracker.set(Some(p + Vec2::new(10.0, 0.0)));

        field.step();
        assert!(field.particles()[0].velocity.length() <= 0.01 + 1e-6);
    }

    #[test]
    fn test_negative_velocity_cap_never_reverses() {
        let mut config = FieldConfig::default().with_particle_count(1).with_interactive(false);
        config.max_velocity = Some(-0.01);
        let mut field = still_field(config);
        field.particles_mut()[0].velocity = Vec2::new(-0.159, -0.078);

        field.step();
        let v = field.particles()[0].velocity;
        assert!(v.x <= 0.0 && v.y <= 0.0, "velocity reversed: {v:?}");
        assert!(v.length() <= 1e-6);
    }

    #[test]
    fn test_non_interactive_ignores_pointer() {
        let mut field = still_field(FieldConfig::default().with_particle_count(1).with_interactive(false));
        let mut tracker = PointerTracker::new();
        field.subscribe_pointer(&mut tracker);
        assert!(!field.is_tracking_pointer());

        tracker.set(Some(field.particles()[0].position));
        field.step();
        assert_eq!(field.particles()[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_interactive_does_not_schedule() {
        let mut field = still_field(FieldConfig::default());
        let mut scheduler = ManualScheduler::new();
        field.start(&mut scheduler);
        assert_eq!(scheduler.pending(), 0);
        assert!(!field.has_pending_frame());
    }

    #[test]
    fn test_start_twice_keeps_one_loop() {
        let mut field = still_field(FieldConfig::default().with_interactive(false));
        let mut scheduler = ManualScheduler::new();
        field.start(&mut scheduler);
        field.start(&mut scheduler);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stale_handle_ignored() {
        let mut field = still_field(FieldConfig::default().with_interactive(false));
        let mut scheduler = ManualScheduler::new();
        let mut surface = RecordingSurface::new(800, 600);
        assert!(!field.on_frame(FrameHandle(999), &mut surface, &mut scheduler));
        assert_eq!(field.frames(), 0);
    }

    #[test]
    fn test_line_opacity() {
        let mut field = still_field(FieldConfig::default().with_particle_count(2));
        field.particles_mut()[0].position = Vec2::new(100.0, 100.0);
        field.particles_mut()[1].position = Vec2::new(175.0, 100.0);

        let mut surface = RecordingSurface::new(800, 600);
        field.render(&mut surface);

        let line = surface
            .last_frame()
            .iter()
            .find_map(|c| match c {
                crate::surface::DrawCommand::Line { color, width, .. } => Some((*color, *width)),
                _ => None,
            })
            .unwrap();
        // (1 - 75/150) * 0.3
        assert!((line.0.alpha - 0.15).abs() < 1e-6);
        assert!((line.1 - 0.5).abs() < 1e-6);
    }
}

//! Transition engine for full-screen lightbox overlays.
//!
//! Content grows from an origin rectangle (typically the thumbnail that was
//! tapped) to the full window, and collapses back when dismissed. The crate
//! owns the state machine, the spring that drives it and the per-frame
//! geometry; drawing is left to a [`PresentationShell`](shell::PresentationShell).
//!
//! ```ignore
//! let mut lightbox = Lightbox::builder()
//!     .viewport(Viewport::new(390.0, 844.0))
//!     .origin(Rect::new(24.0, 310.0, 120.0, 90.0))
//!     .on_close(|| println!("closed"))
//!     .build()?;
//!
//! lightbox.open();
//! loop {
//!     lightbox.frame(Duration::from_millis(16), &mut shell);
//! }
//! ```

pub mod animation;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod header;
pub mod interpolate;
pub mod shell;

use std::time::Duration;

use animation::{Animator, SpringAnimator, SpringConfig};
use controller::{Callbacks, ChangeFlags, TransitionController};
use geometry::{Color, Rect, Viewport};
use header::{CloseHandle, Header, RenderHeader};
use shell::{OverlayFrame, PresentationShell, ShellEvent};

pub use error::{LightboxError, Result};

pub mod prelude {
    pub use crate::animation::{Animator, SpringAnimator, SpringConfig};
    pub use crate::controller::{ChangeFlags, Phase, TransitionState};
    pub use crate::geometry::{Color, Rect, Viewport};
    pub use crate::header::{CloseButton, CloseHandle, Header};
    pub use crate::interpolate::{interpolate, Frame};
    pub use crate::shell::{DismissReason, OverlayFrame, PresentationShell, ShellEvent};
    pub use crate::{Lightbox, LightboxBuilder, LightboxConfig, LightboxError};
}

pub struct LightboxConfig {
    pub viewport: Viewport,
    /// Where the content grows from; the viewport centre when absent
    pub origin: Option<Rect>,
    /// Expanded frame; the viewport's content rect when absent
    pub target_rect: Option<Rect>,
    pub spring: SpringConfig,
    pub background_color: Color,
    /// Open immediately after construction
    pub is_open: bool,
    pub swipe_to_dismiss: bool,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1280.0, 720.0),
            origin: None,
            target_rect: None,
            spring: SpringConfig::DEFAULT,
            background_color: Color::BLACK,
            is_open: false,
            swipe_to_dismiss: true,
        }
    }
}

/// Collects configuration and lifecycle hooks for a [`Lightbox`]
pub struct LightboxBuilder<H = ()> {
    config: LightboxConfig,
    callbacks: Callbacks,
    render_header: Option<RenderHeader<H>>,
}

impl LightboxBuilder<()> {
    pub fn new() -> Self {
        Self::with_config(LightboxConfig::default())
    }

    pub fn with_config(config: LightboxConfig) -> Self {
        Self {
            config,
            callbacks: Callbacks::default(),
            render_header: None,
        }
    }
}

impl Default for LightboxBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> LightboxBuilder<H> {
    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.config.viewport = viewport;
        self
    }

    pub fn origin(mut self, origin: Rect) -> Self {
        self.config.origin = Some(origin);
        self
    }

    pub fn target_rect(mut self, rect: Rect) -> Self {
        self.config.target_rect = Some(rect);
        self
    }

    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.config.spring = spring;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.config.background_color = color;
        self
    }

    pub fn is_open(mut self, is_open: bool) -> Self {
        self.config.is_open = is_open;
        self
    }

    pub fn swipe_to_dismiss(mut self, enabled: bool) -> Self {
        self.config.swipe_to_dismiss = enabled;
        self
    }

    /// Called when an opening starts, before the first frame moves
    pub fn will_open<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.callbacks.will_open = Some(Box::new(callback));
        self
    }

    /// Called once the opening animation has settled
    pub fn on_open<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.callbacks.on_open = Some(Box::new(callback));
        self
    }

    /// Called before the closing animation starts. Owners can begin their own
    /// teardown here while the overlay collapses.
    pub fn will_close<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.callbacks.will_close = Some(Box::new(callback));
        self
    }

    /// Called once the closing animation has settled
    pub fn on_close<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.callbacks.on_close = Some(Box::new(callback));
        self
    }

    /// Replace the default close button with custom header content
    pub fn render_header<T, F>(self, render: F) -> LightboxBuilder<T>
    where
        F: Fn(CloseHandle) -> T + 'static,
    {
        LightboxBuilder {
            config: self.config,
            callbacks: self.callbacks,
            render_header: Some(Box::new(render)),
        }
    }

    /// Build with the default spring animator
    pub fn build(self) -> Result<Lightbox<SpringAnimator, H>> {
        self.build_with(SpringAnimator::default())
    }

    /// Build around a caller-supplied animator
    pub fn build_with<A: Animator>(self, animator: A) -> Result<Lightbox<A, H>> {
        let LightboxBuilder {
            config,
            callbacks,
            render_header,
        } = self;

        config.spring.validate()?;
        config.viewport.validate()?;

        let controller =
            TransitionController::new(animator, config.spring, config.viewport, config.origin)
                .with_target_rect(config.target_rect)
                .with_callbacks(callbacks);

        let mut lightbox = Lightbox {
            controller,
            background_color: config.background_color,
            swipe_to_dismiss: config.swipe_to_dismiss,
            render_header,
        };

        // Opens once when the overlay starts out requested
        lightbox.set_open(config.is_open);
        Ok(lightbox)
    }
}

/// A lightbox overlay: transition controller plus presentation settings
pub struct Lightbox<A: Animator = SpringAnimator, H = ()> {
    controller: TransitionController<A>,
    background_color: Color,
    swipe_to_dismiss: bool,
    render_header: Option<RenderHeader<H>>,
}

impl Lightbox {
    pub fn builder() -> LightboxBuilder {
        LightboxBuilder::new()
    }
}

impl<A: Animator, H> Lightbox<A, H> {
    pub fn controller(&self) -> &TransitionController<A> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TransitionController<A> {
        &mut self.controller
    }

    pub fn open(&mut self) {
        self.controller.open();
    }

    pub fn close(&mut self) {
        self.controller.close();
    }

    /// Mirror the owner's open flag; see [`TransitionController::set_open`]
    pub fn set_open(&mut self, is_open: bool) {
        self.controller.set_open(is_open);
    }

    pub fn set_origin(&mut self, origin: Option<Rect>) {
        self.controller.set_origin(origin);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        viewport.validate()?;
        self.controller.set_viewport(viewport);
        Ok(())
    }

    /// Route an event reported by the shell
    pub fn handle_event(&mut self, event: ShellEvent) -> Result<()> {
        match event {
            ShellEvent::Dismiss(reason) => {
                log::debug!("Dismiss requested: {:?}", reason);
                self.controller.close();
            }
            ShellEvent::Resized(viewport) => self.set_viewport(viewport)?,
        }
        Ok(())
    }

    pub fn tick(&mut self, dt: Duration) -> ChangeFlags {
        self.controller.tick(dt)
    }

    pub fn header(&self) -> Header<H> {
        Header::render(self.render_header.as_ref())
    }

    /// Geometry, opacity and backdrop for the current progress
    pub fn overlay_frame(&self) -> OverlayFrame {
        OverlayFrame::compose(
            self.controller.frame(),
            self.controller.phase(),
            self.controller.progress(),
            &self.controller.viewport(),
            self.background_color,
            self.swipe_to_dismiss,
        )
    }

    /// Tick by `dt` and hand the result to `shell` if anything changed
    pub fn frame<S: PresentationShell<H>>(&mut self, dt: Duration, shell: &mut S) -> ChangeFlags {
        let changes = self.tick(dt);
        if !changes.is_empty() {
            log::trace!("Presenting frame, changes: {:?}", changes);
            shell.present(&self.overlay_frame(), &self.header());
        }
        changes
    }
}

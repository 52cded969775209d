//! The seam between the transition engine and whatever draws it.

use crate::controller::Phase;
use crate::geometry::{Color, Rect, Viewport};
use crate::header::Header;
use crate::interpolate::Frame;

/// Fixed opacity of the dimmed backdrop behind the content
pub const BACKDROP_OPACITY: f32 = 0.8;

/// Why the shell wants the overlay gone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissReason {
    /// Hardware or system back action
    BackAction,
    BackdropTap,
    CloseButton,
}

/// Events a shell reports back to the lightbox
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShellEvent {
    Dismiss(DismissReason),
    Resized(Viewport),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backdrop {
    pub rect: Rect,
    pub color: Color,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderLayout {
    /// Top edge, below any unsafe area
    pub top: f32,
    pub width: f32,
    pub opacity: f32,
}

/// Everything a shell needs to draw one frame of the overlay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayFrame {
    /// False once the overlay has settled closed; the shell can unmount it
    pub visible: bool,
    pub phase: Phase,
    pub progress: f32,
    pub backdrop: Backdrop,
    /// Where the content sits, status bar offset applied
    pub content: Rect,
    pub header: HeaderLayout,
    /// Passed through for shells implementing drag-to-dismiss
    pub swipe_to_dismiss: bool,
}

impl OverlayFrame {
    pub fn compose(
        frame: Frame,
        phase: Phase,
        progress: f32,
        viewport: &Viewport,
        background: Color,
        swipe_to_dismiss: bool,
    ) -> Self {
        Self {
            visible: phase != Phase::Closed,
            phase,
            progress,
            backdrop: Backdrop {
                rect: viewport.content_rect(),
                color: background,
                opacity: BACKDROP_OPACITY,
            },
            content: frame.rect.translate(0.0, viewport.status_bar_offset),
            header: HeaderLayout {
                top: viewport.top_inset,
                width: viewport.width,
                opacity: frame.opacity,
            },
            swipe_to_dismiss,
        }
    }
}

/// Draws overlay frames. Implemented by the owner's windowing layer.
pub trait PresentationShell<H> {
    fn present(&mut self, frame: &OverlayFrame, header: &Header<H>);
}

impl<H, F> PresentationShell<H> for F
where
    F: FnMut(&OverlayFrame, &Header<H>),
{
    fn present(&mut self, frame: &OverlayFrame, header: &Header<H>) {
        self(frame, header)
    }
}

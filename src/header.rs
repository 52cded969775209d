//! Header content drawn above the overlay.
//!
//! Owners can supply their own renderer. It receives a [`CloseHandle`] that
//! the shell turns back into a dismiss request when the custom header's own
//! close affordance is used. Without a renderer the shell draws the default
//! close button.

use crate::geometry::Color;
use crate::shell::{DismissReason, ShellEvent};

/// Token handed to header renderers for wiring up a close affordance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloseHandle {
    _private: (),
}

impl CloseHandle {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// The event the shell should deliver when this handle is pressed
    pub fn event(self) -> ShellEvent {
        ShellEvent::Dismiss(DismissReason::CloseButton)
    }
}

/// Builds custom header content around a close handle
pub type RenderHeader<H> = Box<dyn Fn(CloseHandle) -> H>;

/// Drop shadow behind the close glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub offset: (f32, f32),
    pub radius: f32,
    pub color: Color,
}

/// Style of the default close affordance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseButton {
    pub glyph: char,
    pub font_size: f32,
    pub line_height: f32,
    pub width: f32,
    pub color: Color,
    pub shadow: TextShadow,
    pub handle: CloseHandle,
}

impl Default for CloseButton {
    fn default() -> Self {
        Self {
            glyph: '×',
            font_size: 35.0,
            line_height: 40.0,
            width: 40.0,
            color: Color::WHITE,
            shadow: TextShadow {
                offset: (0.0, 0.0),
                radius: 1.5,
                color: Color::BLACK.with_alpha(0.8),
            },
            handle: CloseHandle::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Header<H> {
    CloseButton(CloseButton),
    Custom(H),
}

impl<H> Header<H> {
    /// Run the owner's renderer, or fall back to the default close button
    pub fn render(renderer: Option<&RenderHeader<H>>) -> Self {
        match renderer {
            Some(render) => Header::Custom(render(CloseHandle::new())),
            None => Header::CloseButton(CloseButton::default()),
        }
    }
}

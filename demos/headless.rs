//! Drives a lightbox through one open/close cycle without a window,
//! printing every frame the shell receives.
//!
//! Run with `RUST_LOG=debug` to see the phase transitions.

use std::time::Duration;

use lightbox::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn print_frame(frame: &OverlayFrame, header: &Header<()>) {
    let header = match header {
        Header::CloseButton(button) => button.glyph.to_string(),
        Header::Custom(()) => "custom".to_string(),
    };
    println!(
        "{:>8?} p={:.3} content=({:.1}, {:.1}, {:.1}x{:.1}) header[{}] opacity={:.2}",
        frame.phase,
        frame.progress,
        frame.content.x,
        frame.content.y,
        frame.content.width,
        frame.content.height,
        header,
        frame.header.opacity,
    );
}

fn main() -> lightbox::Result<()> {
    env_logger::init();

    let mut lightbox = Lightbox::builder()
        .viewport(Viewport::new(390.0, 844.0).with_top_inset(47.0))
        .origin(Rect::new(24.0, 310.0, 120.0, 90.0))
        .background_color("black".parse()?)
        .on_open(|| println!("-- opened"))
        .will_close(|| println!("-- closing"))
        .on_close(|| println!("-- closed"))
        .build()?;

    let mut shell = print_frame;

    lightbox.open();
    while lightbox.controller().phase() != Phase::Open {
        lightbox.frame(FRAME, &mut shell);
    }

    lightbox.handle_event(ShellEvent::Dismiss(DismissReason::BackAction))?;
    while lightbox.controller().phase() != Phase::Closed {
        lightbox.frame(FRAME, &mut shell);
    }

    Ok(())
}

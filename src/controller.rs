//! The open/close transition state machine.
//!
//! ```text
//!            open()                 animator settles
//!   Closed ───────────▶ Opening ─────────────────────▶ Open
//!     ▲                   │                              │
//!     │ settles           │ close() (redirect)           │ close()
//!     │                   ▼                              │
//!     └────────────── Closing ◀──────────────────────────┘
//! ```
//!
//! Re-entrant calls are resolved as follows:
//!
//! - `open()` while `Opening` or `Open` is ignored.
//! - `close()` while `Closed` is ignored. While `Closing` it only cancels a
//!   queued reopen.
//! - `close()` while `Opening` redirects the animator toward 0. `will_close`
//!   fires and the interrupted opening never reports `on_open`.
//! - `open()` while `Closing` is queued. The close finishes (`on_close`
//!   fires) and the open starts right after it.
//!
//! A run the animator gives up on (`finished == false`) still settles the
//! phase it was driving, with progress snapped to that phase's end value.
//!
//! The animator reports one completion per run it started. Only the
//! completion of the run the controller is currently waiting on settles a
//! phase, so a replaced run can neither clear `is_animating` early nor fire
//! a lifecycle callback twice.

use std::time::Duration;

use bitflags::bitflags;

use crate::animation::{AnimationId, AnimationRequest, Animator, Completion, SpringConfig};
use crate::geometry::{Rect, Viewport};
use crate::interpolate::{interpolate, resolve_origin, Frame, OPEN_OPACITY, RESTING_OPACITY};

bitflags! {
    /// What changed since the owner last collected changes
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        /// Progress moved, geometry and opacity must be redrawn
        const PROGRESS = 0b001;
        /// The controller entered a new phase
        const PHASE    = 0b010;
        /// Origin, target or viewport changed
        const GEOMETRY = 0b100;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// A lifecycle hook supplied by the owner
pub type LifecycleCallback = Box<dyn FnMut()>;

/// Lifecycle hooks. Absent hooks are skipped.
#[derive(Default)]
pub struct Callbacks {
    /// Fired synchronously when an opening starts
    pub will_open: Option<LifecycleCallback>,
    /// Fired once the opening animation has settled
    pub on_open: Option<LifecycleCallback>,
    /// Fired synchronously before the closing animation starts
    pub will_close: Option<LifecycleCallback>,
    /// Fired once the closing animation has settled
    pub on_close: Option<LifecycleCallback>,
}

fn fire(callback: &mut Option<LifecycleCallback>, name: &str) {
    match callback {
        Some(callback) => callback(),
        None => log::trace!("No {} callback registered", name),
    }
}

/// Snapshot of the controller's transition bookkeeping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    pub is_animating: bool,
    /// Declared target of the current (or last) transition
    pub target: Frame,
    pub progress: f32,
}

/// Drives the overlay between its collapsed and expanded presentations
pub struct TransitionController<A: Animator> {
    animator: A,
    spring: SpringConfig,
    phase: Phase,
    progress: f32,
    is_animating: bool,
    target: Frame,
    origin: Option<Rect>,
    viewport: Viewport,
    /// Caller-chosen expanded frame; the viewport's content rect otherwise
    target_rect: Option<Rect>,
    /// Run whose completion settles the current phase
    pending_run: Option<AnimationId>,
    reopen_queued: bool,
    /// Last value passed to `set_open`
    open_flag: bool,
    callbacks: Callbacks,
    completions: Vec<Completion>,
    changes: ChangeFlags,
}

impl<A: Animator> TransitionController<A> {
    pub fn new(
        animator: A,
        spring: SpringConfig,
        viewport: Viewport,
        origin: Option<Rect>,
    ) -> Self {
        let progress = animator.value();
        let mut controller = Self {
            animator,
            spring,
            phase: Phase::Closed,
            progress,
            is_animating: false,
            target: Frame::default(),
            origin,
            viewport,
            target_rect: None,
            pending_run: None,
            reopen_queued: false,
            open_flag: false,
            callbacks: Callbacks::default(),
            completions: Vec::new(),
            changes: ChangeFlags::all(),
        };
        controller.target = controller.collapsed_target();
        controller
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_target_rect(mut self, rect: Option<Rect>) -> Self {
        self.target_rect = rect;
        self.target = match self.phase {
            Phase::Closed => self.collapsed_target(),
            _ => self.expanded_target(),
        };
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_reopen_queued(&self) -> bool {
        self.reopen_queued
    }

    pub fn origin(&self) -> Option<Rect> {
        self.origin
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn spring(&self) -> SpringConfig {
        self.spring
    }

    pub fn state(&self) -> TransitionState {
        TransitionState {
            is_animating: self.is_animating,
            target: self.target,
            progress: self.progress,
        }
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    /// Geometry and opacity to draw for the current progress
    pub fn frame(&self) -> Frame {
        interpolate(self.progress, self.origin, self.target)
    }

    /// Start expanding toward the full-window target
    pub fn open(&mut self) {
        match self.phase {
            Phase::Closed => self.begin_open(),
            Phase::Closing => {
                log::debug!("open() while closing, reopening once the close settles");
                self.reopen_queued = true;
            }
            Phase::Opening | Phase::Open => {
                log::debug!("open() ignored, already {:?}", self.phase);
            }
        }
    }

    /// Start collapsing back toward the origin
    pub fn close(&mut self) {
        match self.phase {
            Phase::Open | Phase::Opening => self.begin_close(),
            Phase::Closing => {
                if self.reopen_queued {
                    log::debug!("close() cancelled the queued reopen");
                    self.reopen_queued = false;
                } else {
                    log::debug!("close() ignored, already closing");
                }
            }
            Phase::Closed => log::debug!("close() ignored, already closed"),
        }
    }

    /// Feed the owner's "open" flag.
    ///
    /// Edge-triggered: a false to true change opens the overlay, or queues
    /// the reopen while it is still closing. Dropping the flag never closes
    /// it.
    pub fn set_open(&mut self, is_open: bool) {
        let rising = is_open && !self.open_flag;
        self.open_flag = is_open;
        if rising && matches!(self.phase, Phase::Closed | Phase::Closing) {
            self.open();
        }
    }

    /// Move the origin the overlay grows out of and collapses back into
    pub fn set_origin(&mut self, origin: Option<Rect>) {
        if self.origin == origin {
            return;
        }
        self.origin = origin;
        if self.phase == Phase::Closed {
            self.target = self.collapsed_target();
        }
        self.changes |= ChangeFlags::GEOMETRY;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        log::debug!("Viewport changed to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.target = match self.phase {
            Phase::Closed => self.collapsed_target(),
            _ => self.expanded_target(),
        };
        self.changes |= ChangeFlags::GEOMETRY;
    }

    /// Advance the animator by `dt` and settle the phase if its run completed.
    ///
    /// Returns everything that changed since the previous call.
    pub fn tick(&mut self, dt: Duration) -> ChangeFlags {
        if self.animator.is_running() || self.pending_run.is_some() {
            let value = self.animator.advance(dt, &mut self.completions);
            if value != self.progress {
                self.progress = value;
                self.changes |= ChangeFlags::PROGRESS;
            }

            let completions = std::mem::take(&mut self.completions);
            for completion in &completions {
                self.handle_completion(*completion);
            }
            // Keep the allocation for the next tick
            self.completions = completions;
            self.completions.clear();
        }

        self.take_changes()
    }

    /// Changes accumulated since the last call, without ticking
    pub fn take_changes(&mut self) -> ChangeFlags {
        std::mem::replace(&mut self.changes, ChangeFlags::empty())
    }

    fn handle_completion(&mut self, completion: Completion) {
        if self.pending_run != Some(completion.id) {
            log::trace!("Ignoring completion of superseded run {:?}", completion.id);
            return;
        }
        if !completion.finished {
            log::debug!("Run {:?} was interrupted by the animator", completion.id);
        }

        self.pending_run = None;
        self.is_animating = false;

        let settled = match self.phase {
            Phase::Opening => 1.0,
            Phase::Closing => 0.0,
            Phase::Open | Phase::Closed => self.animator.value(),
        };
        if settled != self.progress {
            self.progress = settled;
            self.changes |= ChangeFlags::PROGRESS;
        }

        match self.phase {
            Phase::Opening => {
                self.set_phase(Phase::Open);
                fire(&mut self.callbacks.on_open, "on_open");
            }
            Phase::Closing => {
                self.set_phase(Phase::Closed);
                self.target = self.collapsed_target();
                fire(&mut self.callbacks.on_close, "on_close");
                if std::mem::take(&mut self.reopen_queued) {
                    self.begin_open();
                }
            }
            Phase::Open | Phase::Closed => {
                log::warn!("Completion {:?} arrived while {:?}", completion.id, self.phase);
            }
        }
    }

    fn begin_open(&mut self) {
        fire(&mut self.callbacks.will_open, "will_open");

        self.target = self.expanded_target();
        self.is_animating = true;
        self.set_phase(Phase::Opening);
        self.pending_run = Some(self.animator.start(AnimationRequest::new(1.0, self.spring)));
    }

    fn begin_close(&mut self) {
        fire(&mut self.callbacks.will_close, "will_close");

        self.is_animating = true;
        self.set_phase(Phase::Closing);
        self.pending_run = Some(self.animator.start(AnimationRequest::new(0.0, self.spring)));
    }

    fn set_phase(&mut self, phase: Phase) {
        log::debug!("Lightbox {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.changes |= ChangeFlags::PHASE;
    }

    fn expanded_rect(&self) -> Rect {
        self.target_rect.unwrap_or_else(|| self.viewport.content_rect())
    }

    fn expanded_target(&self) -> Frame {
        Frame::new(self.expanded_rect(), OPEN_OPACITY)
    }

    fn collapsed_target(&self) -> Frame {
        Frame::new(
            resolve_origin(self.origin, &self.expanded_rect()),
            RESTING_OPACITY,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Animator that only moves when told to
    #[derive(Default)]
    struct ScriptedAnimator {
        value: f32,
        next_id: u64,
        running: Option<(AnimationId, f32)>,
        reported: Vec<Completion>,
        starts: Vec<AnimationRequest>,
    }

    impl ScriptedAnimator {
        /// Jump to the run's target; the completion is reported on the next tick
        fn settle(&mut self) {
            if let Some((id, to)) = self.running.take() {
                self.value = to;
                self.reported.push(Completion { id, finished: true });
            }
        }

        /// Give up on the run without reaching its target
        fn interrupt(&mut self) {
            if let Some((id, _)) = self.running.take() {
                self.reported.push(Completion {
                    id,
                    finished: false,
                });
            }
        }

        fn set_value(&mut self, value: f32) {
            self.value = value;
        }
    }

    impl Animator for ScriptedAnimator {
        fn start(&mut self, request: AnimationRequest) -> AnimationId {
            if let Some((id, _)) = self.running.take() {
                self.reported.push(Completion {
                    id,
                    finished: false,
                });
            }
            self.next_id += 1;
            let id = AnimationId(self.next_id);
            self.running = Some((id, request.to_value));
            self.starts.push(request);
            id
        }

        fn advance(&mut self, _dt: Duration, completions: &mut Vec<Completion>) -> f32 {
            completions.append(&mut self.reported);
            self.value
        }

        fn value(&self) -> f32 {
            self.value
        }

        fn is_running(&self) -> bool {
            self.running.is_some()
        }
    }

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recording_callbacks(log: &Log) -> Callbacks {
        let hook = |name: &'static str| -> Option<LifecycleCallback> {
            let log = log.clone();
            Some(Box::new(move || log.borrow_mut().push(name)))
        };
        Callbacks {
            will_open: hook("will_open"),
            on_open: hook("on_open"),
            will_close: hook("will_close"),
            on_close: hook("on_close"),
        }
    }

    fn controller(log: &Log) -> TransitionController<ScriptedAnimator> {
        TransitionController::new(
            ScriptedAnimator::default(),
            SpringConfig::DEFAULT,
            Viewport::new(400.0, 800.0),
            Some(Rect::new(10.0, 20.0, 30.0, 40.0)),
        )
        .with_callbacks(recording_callbacks(log))
    }

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(controller: &mut TransitionController<ScriptedAnimator>) {
        controller.animator_mut().settle();
        controller.tick(FRAME);
    }

    #[test]
    fn test_initial_state() {
        let log = Log::default();
        let controller = controller(&log);

        assert_eq!(controller.phase(), Phase::Closed);
        assert_eq!(controller.progress(), 0.0);
        assert!(!controller.is_animating());
        assert_eq!(
            controller.state().target,
            Frame::new(Rect::new(10.0, 20.0, 30.0, 40.0), RESTING_OPACITY)
        );
        assert_eq!(controller.frame().rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_open_is_synchronously_animating() {
        let log = Log::default();
        let mut controller = controller(&log);

        controller.open();

        assert_eq!(controller.phase(), Phase::Opening);
        assert!(controller.is_animating());
        assert_eq!(
            controller.state().target,
            Frame::new(Rect::new(0.0, 0.0, 400.0, 800.0), OPEN_OPACITY)
        );
        assert_eq!(controller.animator().starts.len(), 1);
        assert_eq!(controller.animator().starts[0].to_value, 1.0);
        assert_eq!(*log.borrow(), vec!["will_open"]);

        // Not open until the animator reports
        controller.tick(FRAME);
        assert_eq!(controller.phase(), Phase::Opening);

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Open);
        assert!(!controller.is_animating());
        assert_eq!(controller.progress(), 1.0);
        assert_eq!(*log.borrow(), vec!["will_open", "on_open"]);
    }

    #[test]
    fn test_close_ordering() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.open();
        settle(&mut controller);
        log.borrow_mut().clear();

        controller.close();
        // will_close already fired, animator started after it
        assert_eq!(*log.borrow(), vec!["will_close"]);
        assert_eq!(controller.animator().starts.len(), 2);
        assert_eq!(controller.animator().starts[1].to_value, 0.0);
        assert_eq!(controller.phase(), Phase::Closing);
        assert!(controller.is_animating());

        controller.tick(FRAME);
        assert_eq!(*log.borrow(), vec!["will_close"]);

        settle(&mut controller);
        assert_eq!(*log.borrow(), vec!["will_close", "on_close"]);
        assert_eq!(controller.phase(), Phase::Closed);
        assert!(!controller.is_animating());
        assert_eq!(controller.state().target.opacity, RESTING_OPACITY);
    }

    #[test]
    fn test_double_close_fires_on_close_once() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.open();
        settle(&mut controller);
        log.borrow_mut().clear();

        controller.close();
        controller.close();
        assert_eq!(controller.animator().starts.len(), 2);

        settle(&mut controller);
        controller.tick(FRAME);

        assert_eq!(*log.borrow(), vec!["will_close", "on_close"]);
        assert!(!controller.is_animating());

        // Settled: another close is a no-op
        controller.close();
        controller.tick(FRAME);
        assert_eq!(*log.borrow(), vec!["will_close", "on_close"]);
        assert_eq!(controller.phase(), Phase::Closed);
    }

    #[test]
    fn test_open_while_open_is_ignored() {
        let log = Log::default();
        let mut controller = controller(&log);

        controller.open();
        controller.open();
        assert_eq!(controller.animator().starts.len(), 1);

        settle(&mut controller);
        controller.open();
        controller.tick(FRAME);

        assert_eq!(controller.animator().starts.len(), 1);
        assert_eq!(*log.borrow(), vec!["will_open", "on_open"]);
    }

    #[test]
    fn test_close_while_opening_redirects() {
        let log = Log::default();
        let mut controller = controller(&log);

        controller.open();
        controller.animator_mut().set_value(0.4);
        controller.tick(FRAME);
        assert_eq!(controller.progress(), 0.4);

        controller.close();
        assert_eq!(controller.phase(), Phase::Closing);

        // The replaced opening run reports first and must be ignored
        controller.tick(FRAME);
        assert_eq!(controller.phase(), Phase::Closing);
        assert!(controller.is_animating());

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Closed);
        assert!(!controller.is_animating());
        assert_eq!(
            *log.borrow(),
            vec!["will_open", "will_close", "on_close"],
            "interrupted opening must not report on_open"
        );
    }

    #[test]
    fn test_open_while_closing_is_queued() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.open();
        settle(&mut controller);

        controller.close();
        controller.open();
        assert!(controller.is_reopen_queued());
        assert_eq!(controller.phase(), Phase::Closing);
        assert_eq!(controller.animator().starts.len(), 2);

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Opening);
        assert!(controller.is_animating());
        assert!(!controller.is_reopen_queued());

        settle(&mut controller);
        assert_eq!(
            *log.borrow(),
            vec![
                "will_open",
                "on_open",
                "will_close",
                "on_close",
                "will_open",
                "on_open"
            ]
        );
    }

    #[test]
    fn test_close_cancels_queued_reopen() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.open();
        settle(&mut controller);

        controller.close();
        controller.open();
        controller.close();
        assert!(!controller.is_reopen_queued());

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Closed);
        assert_eq!(controller.animator().starts.len(), 2);
    }

    #[test]
    fn test_open_flag_is_edge_triggered() {
        let log = Log::default();
        let mut controller = controller(&log);

        controller.set_open(true);
        assert_eq!(controller.phase(), Phase::Opening);

        // Level stays high: no second open
        controller.set_open(true);
        settle(&mut controller);
        assert_eq!(controller.animator().starts.len(), 1);

        // Dropping the flag does not close
        controller.set_open(false);
        assert_eq!(controller.phase(), Phase::Open);

        controller.close();
        settle(&mut controller);
        controller.set_open(true);
        assert_eq!(controller.phase(), Phase::Opening);
        assert_eq!(controller.animator().starts.len(), 3);
    }

    #[test]
    fn test_rising_flag_while_closing_queues_reopen() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.set_open(true);
        settle(&mut controller);

        controller.set_open(false);
        controller.close();
        controller.tick(FRAME);

        controller.set_open(true);
        assert!(controller.is_reopen_queued());
        assert_eq!(controller.phase(), Phase::Closing);

        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Opening);
        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Open);
        assert_eq!(
            *log.borrow(),
            vec![
                "will_open",
                "on_open",
                "will_close",
                "on_close",
                "will_open",
                "on_open"
            ]
        );
    }

    #[test]
    fn test_rising_flag_while_open_is_ignored() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.open();
        settle(&mut controller);

        controller.set_open(true);
        controller.tick(FRAME);
        assert_eq!(controller.phase(), Phase::Open);
        assert_eq!(controller.animator().starts.len(), 1);
    }

    #[test]
    fn test_interrupted_run_settles_at_end_value() {
        let log = Log::default();
        let mut controller = controller(&log);

        controller.open();
        controller.animator_mut().set_value(0.6);
        controller.animator_mut().interrupt();
        controller.tick(FRAME);

        assert_eq!(controller.phase(), Phase::Open);
        assert!(!controller.is_animating());
        assert_eq!(controller.progress(), 1.0);
        assert_eq!(controller.frame().rect, Rect::new(0.0, 0.0, 400.0, 800.0));

        controller.close();
        controller.animator_mut().set_value(0.3);
        controller.animator_mut().interrupt();
        controller.tick(FRAME);

        assert_eq!(controller.phase(), Phase::Closed);
        assert_eq!(controller.progress(), 0.0);
        assert_eq!(*log.borrow(), vec!["will_open", "on_open", "will_close", "on_close"]);
    }

    #[test]
    fn test_missing_callbacks_are_skipped() {
        let mut controller = TransitionController::new(
            ScriptedAnimator::default(),
            SpringConfig::DEFAULT,
            Viewport::new(400.0, 800.0),
            None,
        );
        controller.open();
        settle(&mut controller);
        controller.close();
        settle(&mut controller);
        assert_eq!(controller.phase(), Phase::Closed);
    }

    #[test]
    fn test_change_flags() {
        let log = Log::default();
        let mut controller = controller(&log);
        assert_eq!(controller.take_changes(), ChangeFlags::all());
        assert_eq!(controller.tick(FRAME), ChangeFlags::empty());

        controller.open();
        controller.animator_mut().set_value(0.5);
        assert_eq!(
            controller.tick(FRAME),
            ChangeFlags::PHASE | ChangeFlags::PROGRESS
        );

        controller.set_origin(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(controller.tick(FRAME), ChangeFlags::GEOMETRY);
    }

    #[test]
    fn test_viewport_change_retargets_open_overlay() {
        let log = Log::default();
        let mut controller = controller(&log);
        controller.open();
        settle(&mut controller);

        controller.set_viewport(Viewport::new(800.0, 400.0));
        assert_eq!(controller.frame().rect, Rect::new(0.0, 0.0, 800.0, 400.0));
    }

    #[test]
    fn test_custom_target_rect() {
        let log = Log::default();
        let mut controller =
            controller(&log).with_target_rect(Some(Rect::new(20.0, 40.0, 360.0, 360.0)));
        controller.open();
        settle(&mut controller);
        assert_eq!(controller.frame().rect, Rect::new(20.0, 40.0, 360.0, 360.0));
    }
}

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::ScheduleConfig;
use crate::debounce::Debouncer;
use crate::model::*;
use crate::observability;

use super::validate::{check_contiguity, validate_with};
use super::ScheduleError;

// ── Observer seam ────────────────────────────────────────────────

/// Receives read-only snapshots from a controller.
///
/// Callbacks run while the controller is locked; they must not call back
/// into the same controller.
pub trait SelectionObserver: Send + Sync {
    fn on_selection_change(&self, days: &[Day]);
    fn on_error(&self, message: &str);
}

/// Adapts a pair of closures into an observer.
pub struct FnObserver<S, E> {
    on_change: S,
    on_error: E,
}

impl<S, E> FnObserver<S, E>
where
    S: Fn(&[Day]) + Send + Sync,
    E: Fn(&str) + Send + Sync,
{
    pub fn new(on_change: S, on_error: E) -> Self {
        Self { on_change, on_error }
    }
}

impl<S, E> SelectionObserver for FnObserver<S, E>
where
    S: Fn(&[Day]) + Send + Sync,
    E: Fn(&str) + Send + Sync,
{
    fn on_selection_change(&self, days: &[Day]) {
        (self.on_change)(days)
    }

    fn on_error(&self, message: &str) {
        (self.on_error)(message)
    }
}

/// Forwards callbacks as `ControllerEvent`s to an async consumer.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ControllerEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SelectionObserver for ChannelObserver {
    fn on_selection_change(&self, days: &[Day]) {
        let _ = self.tx.send(ControllerEvent::SelectionChange {
            days: days.to_vec(),
        });
    }

    fn on_error(&self, message: &str) {
        let _ = self.tx.send(ControllerEvent::Error {
            message: message.to_string(),
        });
    }
}

// ── Gesture state machine ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    PointerDown { anchor: Day },
    Dragging { anchor: Day },
    Settled,
}

struct Inner {
    state: GestureState,
    selection: Selection,
    disposed: bool,
    /// Bumped whenever a pending deferred validation is superseded or cancelled.
    debounce_generation: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    observer: Arc<dyn SelectionObserver>,
    config: ScheduleConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn report(&self, result: &ValidationResult, path: &'static str) {
        if let ValidationResult::Invalid { kind, message } = result {
            debug!(kind = kind.label(), path, "selection rejected");
            metrics::counter!(
                observability::VALIDATION_FAILURES_TOTAL,
                "kind" => kind.label(),
                "path" => path
            )
            .increment(1);
            self.observer.on_error(message);
        }
    }

    fn emit_selection(&self, selection: &Selection) {
        metrics::counter!(observability::SELECTION_CHANGES_TOTAL).increment(1);
        self.observer.on_selection_change(&selection.days());
    }

    /// Contiguity-only check that runs on every mutation. Reports, never mutates.
    fn immediate_check(&self, selection: &Selection) {
        if !self.config.require_contiguous {
            return;
        }
        if let Some(result) = check_contiguity(selection) {
            self.report(&result, "immediate");
        }
    }
}

/// Owns one weekly selection and drives it from pointer gestures.
///
/// A click (down then up on the same day) toggles that day and schedules a
/// deferred full validation. A drag (down, enter another day, up) replaces
/// the selection with the forward arc from the anchor and validates
/// immediately, clearing the selection if it fails.
pub struct SelectionController {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl SelectionController {
    /// Create a controller bound to the current tokio runtime.
    pub fn new(
        config: ScheduleConfig,
        observer: Arc<dyn SelectionObserver>,
    ) -> Result<Self, ScheduleError> {
        config.validate()?;
        let debouncer = Debouncer::try_current()?;
        let selection = Selection::from_days(config.initial_selection.iter().copied());
        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: GestureState::Idle,
                    selection,
                    disposed: false,
                    debounce_generation: 0,
                }),
                observer,
                config,
            }),
            debouncer,
        })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.shared.config
    }

    /// Copy of the current selection.
    pub fn snapshot(&self) -> Selection {
        self.shared.lock().selection
    }

    pub fn state(&self) -> GestureState {
        self.shared.lock().state
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }

    pub fn has_pending_validation(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Full validation of the current selection, without side effects.
    pub fn validate(&self) -> ValidationResult {
        validate_with(&self.shared.lock().selection, &self.shared.config)
    }

    pub fn pointer_down(&self, day: Day) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        if let GestureState::PointerDown { anchor } | GestureState::Dragging { anchor } = inner.state {
            debug!(%anchor, "pointer down while a gesture is open; restarting gesture");
        }
        trace!(%day, "pointer down");
        inner.state = GestureState::PointerDown { anchor: day };
    }

    /// Hovering a day. Starts or continues a drag; ignored outside a gesture.
    pub fn pointer_enter(&self, day: Day) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        let state = inner.state;
        let anchor = match state {
            GestureState::PointerDown { anchor } if anchor == day => return,
            GestureState::PointerDown { anchor } => {
                // A drag supersedes any click feedback still waiting.
                self.cancel_debounce(&mut inner);
                inner.state = GestureState::Dragging { anchor };
                debug!(%anchor, "drag started");
                anchor
            }
            GestureState::Dragging { anchor } => anchor,
            GestureState::Idle | GestureState::Settled => return,
        };
        inner.selection.replace_with_arc(anchor, day);
        trace!(%anchor, hovered = %day, days = inner.selection.len(), "drag fill");
        self.shared.immediate_check(&inner.selection);
    }

    /// Release the pointer, settling whichever gesture is open.
    pub fn pointer_up(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        let state = inner.state;
        match state {
            GestureState::PointerDown { anchor } => self.settle_click(&mut inner, anchor),
            GestureState::Dragging { anchor } => self.settle_drag(&mut inner, anchor),
            GestureState::Idle | GestureState::Settled => {
                trace!("pointer up without an open gesture");
            }
        }
    }

    /// Clear the selection and drop any pending deferred validation.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        self.cancel_debounce(&mut inner);
        inner.selection.clear();
        inner.state = GestureState::Idle;
        debug!("selection reset");
        self.shared.emit_selection(&inner.selection);
    }

    /// Replace the selection from an external day list (e.g. restored from a URL).
    pub fn restore(&self, days: &[Day]) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        self.cancel_debounce(&mut inner);
        inner.selection = Selection::from_days(days.iter().copied());
        inner.state = GestureState::Settled;
        debug!(days = inner.selection.len(), "selection restored");
        self.shared.emit_selection(&inner.selection);
        self.shared.immediate_check(&inner.selection);
    }

    /// Cancel pending work. No callback fires after this returns.
    pub fn dispose(&self) {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return;
        }
        self.cancel_debounce(&mut inner);
        inner.disposed = true;
        inner.state = GestureState::Idle;
        debug!("controller disposed");
    }

    fn settle_click(&self, inner: &mut Inner, day: Day) {
        let now_selected = inner.selection.toggle(day);
        inner.state = GestureState::Settled;
        trace!(%day, now_selected, "click toggle");

        self.shared.emit_selection(&inner.selection);
        self.shared.immediate_check(&inner.selection);
        self.schedule_validation(inner);
    }

    fn settle_drag(&self, inner: &mut Inner, anchor: Day) {
        inner.state = GestureState::Settled;
        let result = validate_with(&inner.selection, &self.shared.config);
        if !result.is_valid() {
            debug!(%anchor, days = inner.selection.len(), "drag rejected; clearing selection");
            metrics::counter!(observability::DRAG_RESETS_TOTAL).increment(1);
            inner.selection.clear();
        }
        self.shared.emit_selection(&inner.selection);
        self.shared.report(&result, "drag");
    }

    fn schedule_validation(&self, inner: &mut Inner) {
        inner.debounce_generation += 1;
        let generation = inner.debounce_generation;
        let shared = Arc::downgrade(&self.shared);
        self.debouncer.schedule(self.shared.config.debounce(), move || {
            run_deferred_validation(shared, generation);
        });
    }

    fn cancel_debounce(&self, inner: &mut Inner) {
        inner.debounce_generation += 1;
        if self.debouncer.cancel() {
            trace!("pending validation cancelled");
        }
    }
}

impl Drop for SelectionController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Body of the debounce timer: validate whatever is selected when it fires.
fn run_deferred_validation(shared: Weak<Shared>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let inner = shared.lock();
    if inner.disposed || inner.debounce_generation != generation {
        return;
    }
    let result = validate_with(&inner.selection, &shared.config);
    trace!(valid = result.is_valid(), "deferred validation");
    shared.report(&result, "debounced");
}

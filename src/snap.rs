//! Fade-and-shrink dismissal effect
//!
//! Drives a target's opacity and scale from 1 to 0 over a fixed duration
//! with a frame loop. A fallback timer runs alongside it: if the loop has
//! not finished by `duration + fallback_grace`, the fallback resets the
//! target's styles and fires the completion callback itself. Both paths
//! may reset the target; the callback runs at most once.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};

/// Styles applied on one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapFrame {
    pub offset_ms: u64,
    pub opacity: f64,
    pub scale: f64,
}

/// Something the effect can be played on.
pub trait SnapTarget: Send + Sync + 'static {
    fn apply(&self, frame: SnapFrame);

    /// Restore the element's original styles. Must be safe to call twice.
    fn reset(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapConfig {
    pub duration: Duration,
    pub frame_interval: Duration,
    pub fallback_grace: Duration,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(800),
            frame_interval: Duration::from_millis(16),
            fallback_grace: Duration::from_millis(200),
        }
    }
}

impl SnapConfig {
    /// Styles `elapsed` into the effect, clamped at the end state.
    pub fn frame_at(&self, elapsed: Duration) -> SnapFrame {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_nanos() as f64 / self.duration.as_nanos() as f64).min(1.0)
        };
        let offset = elapsed.min(self.duration);
        SnapFrame {
            offset_ms: offset.as_millis() as u64,
            opacity: 1.0 - progress,
            scale: 1.0 - progress,
        }
    }

    /// Every frame the loop would apply, first to last.
    pub fn keyframes(&self) -> Vec<SnapFrame> {
        let step = self.frame_interval.max(Duration::from_millis(1));
        let mut frames = Vec::new();
        let mut t = Duration::ZERO;
        while t < self.duration {
            frames.push(self.frame_at(t));
            t += step;
        }
        frames.push(self.frame_at(self.duration));
        frames
    }
}

/// Which path finished the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapOutcome {
    Animated,
    ForcedByFallback,
}

struct Completion<F> {
    done: AtomicBool,
    callback: Mutex<Option<F>>,
    notify: Mutex<Option<oneshot::Sender<SnapOutcome>>>,
}

impl<F: FnOnce()> Completion<F> {
    fn finish(&self, outcome: SnapOutcome) {
        if self.done.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(callback) = self.callback.lock().take() {
            callback();
        }
        if let Some(tx) = self.notify.lock().take() {
            let _ = tx.send(outcome);
        }
    }

    fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }
}

/// Play the effect on `target`, calling `on_complete` once it is over.
pub async fn snap<T, F>(target: Arc<T>, config: SnapConfig, on_complete: F) -> SnapOutcome
where
    T: SnapTarget,
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let completion = Arc::new(Completion {
        done: AtomicBool::new(false),
        callback: Mutex::new(Some(on_complete)),
        notify: Mutex::new(Some(tx)),
    });

    // frame loop
    tokio::spawn({
        let target = target.clone();
        let completion = completion.clone();
        async move {
            let start = Instant::now();
            let mut ticks = interval(config.frame_interval.max(Duration::from_millis(1)));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if completion.is_done() {
                    return;
                }
                let elapsed = start.elapsed();
                target.apply(config.frame_at(elapsed));
                if elapsed >= config.duration {
                    target.reset();
                    completion.finish(SnapOutcome::Animated);
                    return;
                }
            }
        }
    });

    // fallback timer
    tokio::spawn({
        let completion = completion.clone();
        async move {
            sleep(config.duration + config.fallback_grace).await;
            if !completion.is_done() {
                tracing::debug!("Snap frame loop overran, forcing completion");
                target.reset();
                completion.finish(SnapOutcome::ForcedByFallback);
            }
        }
    });

    // The sender only drops without sending if both tasks were cancelled.
    rx.await.unwrap_or(SnapOutcome::ForcedByFallback)
}

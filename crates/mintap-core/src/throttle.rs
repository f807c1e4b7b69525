//! Rate limiting for streams of content updates.
//!
//! A throttled stream delivers the first value of a quiet period at once,
//! then buffers further values until its cooldown ends. Only the newest
//! buffered value survives, and it is delivered when the cooldown expires,
//! which starts the next cooldown. An interval of zero passes every value
//! straight through.
//!
//! Three layers are provided:
//! - [`ThrottleState`]: the pure state machine, driven by explicit timer
//!   callbacks.
//! - [`PolledThrottle`]: the state machine plus a deadline, for hosts that
//!   run their own frame or event loop and poll with the current time.
//! - [`Throttle`]: a tokio-driven pipeline that owns its cooldown timer and
//!   cancels it on teardown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Throttle state for one stream.
///
/// `emit` and `on_timer` return the value to deliver, if any. Whoever drives
/// the machine is responsible for running at most one cooldown timer: start
/// it when a call returns a value and [`is_cooling_down`](Self::is_cooling_down)
/// is true, and call `on_timer` when it fires.
#[derive(Debug, Clone)]
pub struct ThrottleState<T> {
    interval: Duration,
    current: Option<T>,
    pending: Option<T>,
    cooling_down: bool,
}

impl<T: Clone> ThrottleState<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            current: None,
            pending: None,
            cooling_down: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Last value released to the consumer.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooling_down
    }

    /// Offer a new value.
    ///
    /// Returns the value when it should be delivered now. During a cooldown
    /// the value replaces any pending one and the cooldown is left running.
    pub fn emit(&mut self, value: T) -> Option<T> {
        if self.interval.is_zero() {
            return Some(self.release(value));
        }
        if self.cooling_down {
            self.pending = Some(value);
            return None;
        }
        self.cooling_down = true;
        Some(self.release(value))
    }

    /// The cooldown timer fired.
    ///
    /// Returns the pending value, in which case a new cooldown has begun.
    /// Without a pending value the stream goes idle.
    pub fn on_timer(&mut self) -> Option<T> {
        if !self.cooling_down {
            return None;
        }
        match self.pending.take() {
            Some(value) => Some(self.release(value)),
            None => {
                self.cooling_down = false;
                None
            }
        }
    }

    /// Drop the pending value and end the cooldown.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.cooling_down = false;
    }

    fn release(&mut self, value: T) -> T {
        self.current = Some(value.clone());
        value
    }
}

/// Throttle for hosts that poll with their own clock.
///
/// Uses `web_time::Instant` so the same code runs in browsers.
#[derive(Debug, Clone)]
pub struct PolledThrottle<T> {
    state: ThrottleState<T>,
    deadline: Option<web_time::Instant>,
}

impl<T: Clone> PolledThrottle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: ThrottleState::new(interval),
            deadline: None,
        }
    }

    pub fn state(&self) -> &ThrottleState<T> {
        &self.state
    }

    /// When the running cooldown ends, if one is running.
    pub fn deadline(&self) -> Option<web_time::Instant> {
        self.deadline
    }

    pub fn emit(&mut self, value: T, now: web_time::Instant) -> Option<T> {
        let delivered = self.state.emit(value)?;
        self.rearm(now);
        Some(delivered)
    }

    /// Advance to `now`, returning a value if the cooldown expired with one
    /// pending.
    pub fn poll(&mut self, now: web_time::Instant) -> Option<T> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        // A delivery starts its cooldown when it actually goes out, so a late
        // poll cannot squeeze the next value in early.
        let delivered = self.state.on_timer();
        self.rearm(if delivered.is_some() { now } else { deadline });
        delivered
    }

    pub fn cancel(&mut self) {
        self.state.cancel();
        self.deadline = None;
    }

    fn rearm(&mut self, from: web_time::Instant) {
        self.deadline = self
            .state
            .is_cooling_down()
            .then(|| from + self.state.interval());
    }
}

type Consumer<T> = Box<dyn FnMut(T) + Send>;

struct Shared<T> {
    state: ThrottleState<T>,
    consumer: Consumer<T>,
    timer: Option<JoinHandle<()>>,
    closed: bool,
}

impl<T> Shared<T> {
    fn shutdown(&mut self) {
        self.closed = true;
        self.state.pending = None;
        self.state.cooling_down = false;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Tokio-driven throttled pipeline feeding a consumer callback.
///
/// The consumer runs while the pipeline's lock is held, so it must not call
/// back into the same `Throttle`. Dropping the pipeline (or calling
/// [`shutdown`](Self::shutdown)) cancels the cooldown timer; nothing is
/// delivered afterwards.
///
/// Must be used from within a tokio runtime.
pub struct Throttle<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> std::fmt::Debug for Throttle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = lock(&self.shared);
        f.debug_struct("Throttle")
            .field("interval", &shared.state.interval)
            .field("cooling_down", &shared.state.cooling_down)
            .field("has_pending", &shared.state.pending.is_some())
            .field("closed", &shared.closed)
            .finish()
    }
}

impl<T: Clone + Send + 'static> Throttle<T> {
    pub fn new(interval: Duration, consumer: impl FnMut(T) + Send + 'static) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: ThrottleState::new(interval),
                consumer: Box::new(consumer),
                timer: None,
                closed: false,
            })),
        }
    }

    pub fn interval(&self) -> Duration {
        lock(&self.shared).state.interval
    }

    /// Last value delivered to the consumer.
    pub fn current(&self) -> Option<T> {
        lock(&self.shared).state.current.clone()
    }

    pub fn is_cooling_down(&self) -> bool {
        lock(&self.shared).state.cooling_down
    }

    pub fn emit(&self, value: T) {
        let mut shared = lock(&self.shared);
        if shared.closed {
            tracing::trace!(target: "mintap::throttle", "emit after shutdown ignored");
            return;
        }
        let Some(value) = shared.state.emit(value) else {
            tracing::trace!(target: "mintap::throttle", "value buffered during cooldown");
            return;
        };
        (shared.consumer)(value);
        if shared.state.cooling_down && shared.timer.is_none() {
            let interval = shared.state.interval;
            shared.timer = Some(spawn_cooldown(Arc::downgrade(&self.shared), interval));
        }
    }

    /// Cancel the cooldown timer and stop delivering.
    pub fn shutdown(&self) {
        lock(&self.shared).shutdown();
        tracing::debug!(target: "mintap::throttle", "throttle shut down");
    }
}

impl<T> Drop for Throttle<T> {
    fn drop(&mut self) {
        lock(&self.shared).shutdown();
    }
}

fn lock<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One task per cooldown chain: it keeps sleeping while each expiry has a
/// pending value to deliver, and exits once the stream goes idle.
fn spawn_cooldown<T: Clone + Send + 'static>(
    shared: Weak<Mutex<Shared<T>>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let mut guard = lock(&shared);
            if guard.closed {
                return;
            }
            match guard.state.on_timer() {
                Some(value) => {
                    tracing::trace!(target: "mintap::throttle", "delivering pending value");
                    (guard.consumer)(value);
                }
                None => {
                    guard.timer = None;
                    return;
                }
            }
        }
    })
}

//! Quiescence-window debouncing of query input.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;

/// Coalesces an input stream into one emission per quiet window.
///
/// Time is supplied by the caller, which keeps the logic deterministic.
/// Each input replaces the pending value and pushes the deadline out to
/// `now + window`; nothing is ever emitted in bursts.
#[derive(Debug)]
pub struct Debouncer<T> {
	window: Duration,
	pending: Option<(Duration, T)>,
}

impl<T> Debouncer<T> {
	/// Debouncer with a fixed quiet window.
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			pending: None,
		}
	}

	/// Record an input event at `now`; returns the new deadline.
	pub fn input(&mut self, value: T, now: Duration) -> Duration {
		let deadline = now + self.window;
		self.pending = Some((deadline, value));
		deadline
	}

	/// Take the pending value once its deadline has passed.
	pub fn poll(&mut self, now: Duration) -> Option<T> {
		match self.pending {
			Some((deadline, _)) if deadline <= now => self.pending.take().map(|(_, v)| v),
			_ => None,
		}
	}

	/// Drop the pending value.
	pub fn cancel(&mut self) {
		self.pending = None;
	}

	/// Deadline of the pending value, if any.
	pub fn deadline(&self) -> Option<Duration> {
		self.pending.as_ref().map(|(d, _)| *d)
	}
}

/// Time source and one-shot timers driving a [`DebounceTimer`].
pub trait Clock {
	/// Armed timer. Dropping it cancels the timer.
	type Timer;

	/// Current time.
	fn now(&self) -> Duration;

	/// Run `fire` once, `after` from now.
	fn arm(&self, after: Duration, fire: Box<dyn FnOnce()>) -> Self::Timer;
}

/// Wall clock with `setTimeout` timers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
	type Timer = Timeout;

	fn now(&self) -> Duration {
		Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
	}

	fn arm(&self, after: Duration, fire: Box<dyn FnOnce()>) -> Timeout {
		let millis = u32::try_from(after.as_micros().div_ceil(1000)).unwrap_or(u32::MAX);
		Timeout::new(millis, fire)
	}
}

/// [`Debouncer`] driven by a timer.
///
/// Every `schedule` records the input at the clock's current time and arms a
/// timer for the returned deadline, replacing (and so cancelling) the
/// previous one. When the timer fires the debouncer is polled; a timer that
/// fires ahead of the deadline re-arms for the remainder.
pub struct DebounceTimer<T, C: Clock = BrowserClock> {
	shared: Rc<Shared<T, C>>,
}

struct Shared<T, C: Clock> {
	clock: C,
	debouncer: RefCell<Debouncer<T>>,
	emit: RefCell<Option<Box<dyn FnOnce(T)>>>,
	timer: RefCell<Option<C::Timer>>,
}

impl<T: 'static> DebounceTimer<T> {
	/// Browser timer with the given quiet window.
	pub fn new(window: Duration) -> Self {
		Self::with_clock(window, BrowserClock)
	}
}

impl<T: 'static, C: Clock + 'static> DebounceTimer<T, C> {
	/// Timer with the given quiet window on `clock`.
	pub fn with_clock(window: Duration, clock: C) -> Self {
		Self {
			shared: Rc::new(Shared {
				clock,
				debouncer: RefCell::new(Debouncer::new(window)),
				emit: RefCell::new(None),
				timer: RefCell::new(None),
			}),
		}
	}

	/// Feed an input; `emit` runs with the latest value once input is quiet.
	pub fn schedule(&mut self, value: T, emit: impl FnOnce(T) + 'static) {
		let now = self.shared.clock.now();
		let deadline = self.shared.debouncer.borrow_mut().input(value, now);
		*self.shared.emit.borrow_mut() = Some(Box::new(emit));
		arm(&self.shared, deadline.saturating_sub(now));
	}

	/// Cancel any pending emission.
	pub fn cancel(&mut self) {
		let timer = self.shared.timer.borrow_mut().take();
		drop(timer);
		self.shared.debouncer.borrow_mut().cancel();
		self.shared.emit.borrow_mut().take();
	}

	/// Deadline of the pending emission, if any.
	pub fn deadline(&self) -> Option<Duration> {
		self.shared.debouncer.borrow().deadline()
	}
}

fn arm<T: 'static, C: Clock + 'static>(shared: &Rc<Shared<T, C>>, after: Duration) {
	let weak = Rc::downgrade(shared);
	let timer = shared.clock.arm(
		after,
		Box::new(move || {
			if let Some(shared) = weak.upgrade() {
				fire(&shared);
			}
		}),
	);
	let previous = shared.timer.replace(Some(timer));
	drop(previous);
}

fn fire<T: 'static, C: Clock + 'static>(shared: &Rc<Shared<T, C>>) {
	let now = shared.clock.now();
	let ready = shared.debouncer.borrow_mut().poll(now);
	match ready {
		Some(value) => {
			let emit = shared.emit.borrow_mut().take();
			if let Some(emit) = emit {
				emit(value);
			}
		}
		None => {
			let deadline = shared.debouncer.borrow().deadline();
			if let Some(deadline) = deadline {
				arm(shared, deadline.saturating_sub(now));
			}
		}
	}
}

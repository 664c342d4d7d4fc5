//! Expiring response cache with an injectable clock.

use std::collections::HashMap;
use std::rc::Rc;

/// Source of wall-clock time in milliseconds.
pub trait Clock {
	fn now_ms(&self) -> f64;
}

/// `Date.now()` from the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
	fn now_ms(&self) -> f64 {
		js_sys::Date::now()
	}
}

struct Entry<V> {
	value: V,
	expires_at: f64,
}

/// Map from request key to response, each entry with its own expiry.
pub struct TtlCache<V> {
	entries: HashMap<String, Entry<V>>,
	clock: Rc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
	pub fn new(clock: Rc<dyn Clock>) -> Self {
		Self {
			entries: HashMap::new(),
			clock,
		}
	}

	/// Cached value for `key`; expired entries are evicted and count as a miss.
	pub fn get(&mut self, key: &str) -> Option<V> {
		let now = self.clock.now_ms();
		match self.entries.get(key) {
			Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
			Some(_) => {
				self.entries.remove(key);
				None
			}
			None => None,
		}
	}

	/// Stores `value` and drops every entry that has already expired.
	pub fn put(&mut self, key: impl Into<String>, value: V, max_age_ms: f64) {
		let now = self.clock.now_ms();
		self.entries.retain(|_, entry| entry.expires_at > now);
		let expires_at = now + max_age_ms;
		self.entries.insert(key.into(), Entry { value, expires_at });
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

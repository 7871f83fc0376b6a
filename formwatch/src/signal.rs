//! Push-based reactive cells.
//!
//! A [`Signal<T>`] holds a value and notifies its subscribers whenever a
//! *different* value is published. It is the explicit replacement for an
//! implicit observable registry: every observable in the form is a signal
//! owned by whoever publishes it.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, TryLockError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Unique identifier for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

/// Current value plus the version it was published at.
struct Cell<T> {
    value: T,
    version: u64,
}

struct SignalInner<T> {
    cell: RwLock<Cell<T>>,
    /// Insertion-ordered; ids are unique so a callback is never listed twice.
    subscribers: RwLock<Vec<(SubscriptionId, Callback<T>)>>,
    /// Set when the cell changed and subscribers have not seen it yet.
    pending: AtomicBool,
    /// Last value delivered to subscribers. Held while emitting.
    emitted: Mutex<T>,
}

/// Reactive value with ordered push notification.
///
/// `Signal<T>` uses `Arc` internally, so clones share the same value and
/// subscriber list.
///
/// Notification rules:
/// - subscribers fire in subscription order;
/// - publishing a value equal to the current one fires nothing;
/// - subscribers are not called on subscribe, only on later changes;
/// - a subscriber may publish to the signal it is observing. The nested
///   change is delivered after the current round finishes.
///
/// # Example
///
/// ```
/// use formwatch::signal::Signal;
///
/// let count = Signal::new(0);
/// let seen = Signal::new(Vec::new());
/// let log = seen.clone();
/// let sub = count.subscribe(move |v: &i32| {
///     log.update(|l| l.push(*v));
/// });
///
/// count.set(1);
/// count.set(1);
/// count.set(2);
/// sub.unsubscribe();
/// count.set(3);
///
/// assert_eq!(seen.get(), vec![1, 2]);
/// ```
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Signal<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                emitted: Mutex::new(value.clone()),
                cell: RwLock::new(Cell { value, version: 0 }),
                subscribers: RwLock::new(Vec::new()),
                pending: AtomicBool::new(false),
            }),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T {
        self.inner
            .cell
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().value.clone())
    }

    /// Version of the most recent versioned publication (0 if none).
    pub fn version(&self) -> u64 {
        self.inner
            .cell
            .read()
            .map(|guard| guard.version)
            .unwrap_or_else(|poisoned| poisoned.into_inner().version)
    }

    /// Publish a new value.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let changed = match self.inner.cell.write() {
            Ok(mut guard) => Self::replace(&mut guard.value, value),
            Err(_) => false,
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Update the value in place using a closure.
    ///
    /// `f` runs under the write lock, so concurrent updates never lose a
    /// write. It must not touch this signal. Returns `true` if the value
    /// changed.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let changed = match self.inner.cell.write() {
            Ok(mut guard) => {
                let before = guard.value.clone();
                f(&mut guard.value);
                guard.value != before
            }
            Err(_) => false,
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Publish `value` tagged with `version`.
    ///
    /// The write is rejected if a publication with a higher version has
    /// already landed, so an older producer finishing late can never
    /// overwrite a newer value. Returns `true` if the publication was
    /// accepted (even when the value itself was unchanged).
    pub fn publish_at(&self, version: u64, value: T) -> bool {
        let changed = match self.inner.cell.write() {
            Ok(mut guard) => {
                if version < guard.version {
                    return false;
                }
                guard.version = version;
                Self::replace(&mut guard.value, value)
            }
            Err(_) => return false,
        };
        if changed {
            self.notify();
        }
        true
    }

    /// Register a callback for future changes.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        if let Ok(mut guard) = self.inner.subscribers.write() {
            guard.push((id, Arc::new(f)));
        }
        let weak: Weak<SignalInner<T>> = Arc::downgrade(&self.inner);
        let source: Weak<dyn Detach> = weak;
        Subscription { id, source }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Create a signal whose value is always `f` applied to this one.
    ///
    /// The derived signal starts at `f(current)` and republishes on every
    /// change of the source. Equal derived values are deduplicated.
    pub fn map<U, F>(&self, f: F) -> Signal<U>
    where
        U: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let derived = Signal::new(f(&self.get()));
        let target = derived.clone();
        // Source keeps the derived signal alive; no back-reference exists.
        let _ = self.subscribe(move |value| {
            target.set(f(value));
        });
        derived
    }

    fn replace(slot: &mut T, value: T) -> bool {
        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    }

    /// Deliver pending changes.
    ///
    /// Only one caller emits at a time. Anyone arriving while an emission
    /// is running (including a subscriber publishing re-entrantly) just
    /// marks the signal pending; the emitter loops until nothing is left.
    /// Buffered changes collapse into a single delivery of the latest
    /// value.
    fn notify(&self) {
        self.inner.pending.store(true, Ordering::SeqCst);
        loop {
            let mut emitted = match self.inner.emitted.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => return,
            };
            if !self.inner.pending.swap(false, Ordering::SeqCst) {
                return;
            }

            let current = self.get();
            if current != *emitted {
                *emitted = current.clone();
                let subscribers: Vec<Callback<T>> = self
                    .inner
                    .subscribers
                    .read()
                    .map(|guard| guard.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                    .unwrap_or_default();
                for callback in subscribers {
                    callback(&current);
                }
            }
            drop(emitted);

            if !self.inner.pending.load(Ordering::SeqCst) {
                return;
            }
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Signal<T>
where
    T: Default + Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Signal");
        if let Ok(cell) = self.inner.cell.read() {
            dbg.field("value", &cell.value).field("version", &cell.version);
        }
        dbg.finish_non_exhaustive()
    }
}

/// Type-erased removal of a subscriber.
trait Detach: Send + Sync {
    fn detach(&self, id: SubscriptionId) -> bool;
    fn has(&self, id: SubscriptionId) -> bool;
}

impl<T: Send + Sync> Detach for SignalInner<T> {
    fn detach(&self, id: SubscriptionId) -> bool {
        match self.subscribers.write() {
            Ok(mut guard) => {
                let before = guard.len();
                guard.retain(|(sid, _)| *sid != id);
                guard.len() != before
            }
            Err(_) => false,
        }
    }

    fn has(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .read()
            .map(|guard| guard.iter().any(|(sid, _)| *sid == id))
            .unwrap_or(false)
    }
}

/// Handle returned by [`Signal::subscribe`].
///
/// Dropping the handle does **not** unsubscribe; call
/// [`Subscription::unsubscribe`] to stop receiving changes.
pub struct Subscription {
    id: SubscriptionId,
    source: Weak<dyn Detach>,
}

impl Subscription {
    /// The subscription's identifier.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Check if the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.source.upgrade().is_some_and(|source| source.has(self.id))
    }

    /// Remove the callback from its signal.
    ///
    /// Returns `false` if it was already removed or the signal is gone.
    pub fn unsubscribe(self) -> bool {
        self.source
            .upgrade()
            .is_some_and(|source| source.detach(self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T>(signal: &Signal<T>) -> (Arc<Mutex<Vec<T>>>, Subscription)
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let sub = signal.subscribe(move |v: &T| sink.lock().unwrap().push(v.clone()));
        (log, sub)
    }

    #[test]
    fn test_fires_once_per_distinct_change() {
        let signal = Signal::new("a".to_string());
        let (log, _sub) = recorder(&signal);

        assert!(!signal.set("a".to_string()));
        assert!(signal.set("b".to_string()));
        assert!(!signal.set("b".to_string()));
        assert!(signal.set("c".to_string()));

        assert_eq!(*log.lock().unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn test_subscribers_fire_in_order() {
        let signal = Signal::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            let _ = signal.subscribe(move |_| order.lock().unwrap().push(tag));
        }

        signal.set(1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let signal = Signal::new(0);
        let (log, sub) = recorder(&signal);

        signal.set(1);
        assert!(sub.is_active());
        assert!(sub.unsubscribe());
        signal.set(2);

        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_at_rejects_older_versions() {
        let signal = Signal::new(0);
        let (log, _sub) = recorder(&signal);

        assert!(signal.publish_at(2, 20));
        assert!(!signal.publish_at(1, 10));
        assert!(signal.publish_at(2, 20));
        assert!(signal.publish_at(3, 30));

        assert_eq!(signal.get(), 30);
        assert_eq!(signal.version(), 3);
        assert_eq!(*log.lock().unwrap(), vec![20, 30]);
    }

    #[test]
    fn test_reentrant_publish_is_delivered_after_current_round() {
        let signal = Signal::new(0);
        let feedback = signal.clone();
        let _ = signal.subscribe(move |v: &i32| {
            if *v == 1 {
                feedback.set(2);
            }
        });
        let (log, _sub) = recorder(&signal);

        signal.set(1);

        assert_eq!(signal.get(), 2);
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_map_derives_and_dedups() {
        let source = Signal::new(1);
        let parity = source.map(|v| v % 2 == 0);
        let (log, _sub) = recorder(&parity);

        assert!(!parity.get());
        source.set(3);
        source.set(4);
        source.set(6);
        source.set(7);

        assert_eq!(*log.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_concurrent_updates_keep_every_write() {
        let counter = Signal::new(0u32);
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.update(|n| *n += 1);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(counter.get(), 8000);
    }
}

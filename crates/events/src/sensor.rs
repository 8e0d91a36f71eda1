//! Threshold-gated temperature sensor with observer fan-out.
//!
//! [`TemperatureSensor`] does not own its subscribers: it keeps
//! [`Weak`] references, so dropping the last strong handle to a subscriber
//! is enough to stop it from being notified. Everything here is
//! single-threaded (`Rc`/`RefCell`); methods take `&self` so subscribers
//! can call back into the sensor while being notified.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use heatwatch_core::types::Celsius;

// ---------------------------------------------------------------------------
// TemperatureObserver
// ---------------------------------------------------------------------------

/// Capability implemented by anything that wants low-temperature readings.
pub trait TemperatureObserver {
    /// Called with a reading that fell below the sensor threshold.
    fn on_temperature(&self, temperature: Celsius);
}

// ---------------------------------------------------------------------------
// TemperatureSensor
// ---------------------------------------------------------------------------

/// Gates readings by a fixed threshold and notifies subscribers.
///
/// # Usage
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use heatwatch_events::{TemperatureObserver, TemperatureSensor};
///
/// struct Counter(Cell<u32>);
///
/// impl TemperatureObserver for Counter {
///     fn on_temperature(&self, _temperature: f64) {
///         self.0.set(self.0.get() + 1);
///     }
/// }
///
/// let sensor = TemperatureSensor::new(18.0);
/// let counter = Rc::new(Counter(Cell::new(0)));
/// sensor.attach(&counter);
///
/// sensor.update_temperature(20.0);
/// sensor.update_temperature(17.0);
/// assert_eq!(counter.0.get(), 1);
/// ```
pub struct TemperatureSensor {
    threshold: Celsius,
    /// Attach order is notification order. Duplicates are allowed.
    observers: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

/// One attach call. The id tells duplicate entries of the same observer
/// apart, so a detach mid-fan-out removes exactly one delivery.
struct Subscription {
    id: u64,
    observer: Weak<dyn TemperatureObserver>,
}

impl TemperatureSensor {
    /// Create a sensor with no subscribers.
    pub fn new(threshold: Celsius) -> Self {
        Self {
            threshold,
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn threshold(&self) -> Celsius {
        self.threshold
    }

    /// Append `observer` to the subscriber list.
    ///
    /// Attaching the same observer twice makes it receive every reading
    /// twice.
    pub fn attach<O: TemperatureObserver + 'static>(&self, observer: &Rc<O>) {
        let weak: Weak<O> = Rc::downgrade(observer);
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        self.observers.borrow_mut().push(Subscription {
            id,
            observer: weak,
        });
    }

    /// Remove the first entry referring to `observer`.
    ///
    /// Returns `false` (and changes nothing) when it was not attached.
    pub fn detach<O: TemperatureObserver + ?Sized>(&self, observer: &Rc<O>) -> bool {
        let target = Rc::as_ptr(observer).cast::<()>();
        let mut observers = self.observers.borrow_mut();

        match observers
            .iter()
            .position(|sub| sub.observer.as_ptr().cast::<()>() == target)
        {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Feed a new reading into the sensor.
    ///
    /// Readings strictly below the threshold are delivered to every
    /// subscriber in attach order; anything else (including the threshold
    /// itself and NaN) is ignored. Delivery iterates over a snapshot taken
    /// before the first call, so subscribers may attach or detach during
    /// fan-out. Entries detached during fan-out are skipped; entries
    /// attached during fan-out wait for the next reading. Returns the number
    /// of deliveries made.
    pub fn update_temperature(&self, temperature: Celsius) -> usize {
        if temperature < self.threshold {
            let snapshot = self.snapshot();

            tracing::debug!(
                temperature,
                threshold = self.threshold,
                subscribers = snapshot.len(),
                "Reading below threshold, notifying subscribers"
            );

            let mut delivered = 0;
            for (id, observer) in &snapshot {
                if !self.is_attached(*id) {
                    tracing::trace!(id, "Subscriber detached during fan-out, skipped");
                    continue;
                }
                observer.on_temperature(temperature);
                delivered += 1;
            }
            delivered
        } else {
            tracing::trace!(temperature, threshold = self.threshold, "Reading ignored");
            0
        }
    }

    /// Number of attached subscribers that are still alive.
    pub fn subscriber_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|sub| sub.observer.strong_count() > 0)
            .count()
    }

    fn is_attached(&self, id: u64) -> bool {
        self.observers.borrow().iter().any(|sub| sub.id == id)
    }

    /// Upgrade every live subscriber, pruning the ones that were dropped.
    fn snapshot(&self) -> Vec<(u64, Rc<dyn TemperatureObserver>)> {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|sub| sub.observer.strong_count() > 0);

        let pruned = before - observers.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped subscribers removed from sensor");
        }

        observers
            .iter()
            .filter_map(|sub| sub.observer.upgrade().map(|observer| (sub.id, observer)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    type Log = Rc<RefCell<Vec<(&'static str, Celsius)>>>;

    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Log) -> Rc<Self> {
            Rc::new(Self {
                label,
                log: Rc::clone(log),
            })
        }
    }

    impl TemperatureObserver for Recorder {
        fn on_temperature(&self, temperature: Celsius) {
            self.log.borrow_mut().push((self.label, temperature));
        }
    }

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn notifies_only_below_threshold() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        sensor.attach(&a);

        assert_eq!(sensor.update_temperature(20.0), 0);
        assert_eq!(sensor.update_temperature(18.0), 0);
        assert_eq!(sensor.update_temperature(17.9), 1);

        assert_eq!(*log.borrow(), vec![("a", 17.9)]);
    }

    #[test]
    fn nan_reading_is_ignored() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        sensor.attach(&a);

        assert_eq!(sensor.update_temperature(f64::NAN), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn notifies_in_attach_order() {
        let log = new_log();
        let sensor = TemperatureSensor::new(0.0);
        let a = Recorder::new("a", &log);
        let b = Recorder::new("b", &log);
        let c = Recorder::new("c", &log);
        sensor.attach(&b);
        sensor.attach(&a);
        sensor.attach(&c);

        sensor.update_temperature(-3.0);

        let labels: Vec<_> = log.borrow().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn detached_subscriber_is_not_notified() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        let b = Recorder::new("b", &log);
        sensor.attach(&a);
        sensor.attach(&b);

        assert!(sensor.detach(&a));
        sensor.update_temperature(10.0);

        assert_eq!(*log.borrow(), vec![("b", 10.0)]);
    }

    #[test]
    fn detaching_absent_subscriber_is_a_no_op() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        let stranger = Recorder::new("x", &log);
        sensor.attach(&a);

        assert!(!sensor.detach(&stranger));
        assert_eq!(sensor.subscriber_count(), 1);
    }

    #[test]
    fn duplicate_attach_notifies_twice_and_detach_removes_one() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        sensor.attach(&a);
        sensor.attach(&a);

        assert_eq!(sensor.update_temperature(5.0), 2);
        assert!(sensor.detach(&a));
        assert_eq!(sensor.update_temperature(6.0), 1);

        assert_eq!(*log.borrow(), vec![("a", 5.0), ("a", 5.0), ("a", 6.0)]);
    }

    #[test]
    fn detach_accepts_trait_object_handle() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        sensor.attach(&a);

        let as_dyn: Rc<dyn TemperatureObserver> = a.clone();
        assert!(sensor.detach(&as_dyn));
        assert_eq!(sensor.subscriber_count(), 0);
    }

    #[test]
    fn dropped_subscriber_is_skipped_and_pruned() {
        let log = new_log();
        let sensor = TemperatureSensor::new(18.0);
        let a = Recorder::new("a", &log);
        let b = Recorder::new("b", &log);
        sensor.attach(&a);
        sensor.attach(&b);

        drop(a);
        assert_eq!(sensor.subscriber_count(), 1);
        assert_eq!(sensor.update_temperature(1.0), 1);
        assert_eq!(*log.borrow(), vec![("b", 1.0)]);
    }

    // -- Re-entrant detach ---------------------------------------------------

    struct SelfDetacher {
        sensor: Rc<TemperatureSensor>,
        me: RefCell<Weak<SelfDetacher>>,
        log: Log,
    }

    impl TemperatureObserver for SelfDetacher {
        fn on_temperature(&self, temperature: Celsius) {
            self.log.borrow_mut().push(("self", temperature));
            if let Some(me) = self.me.borrow().upgrade() {
                self.sensor.detach(&me);
            }
        }
    }

    #[test]
    fn self_detach_during_fan_out_keeps_iteration_stable() {
        let log = new_log();
        let sensor = Rc::new(TemperatureSensor::new(18.0));
        let a = Recorder::new("a", &log);
        let detacher = Rc::new(SelfDetacher {
            sensor: Rc::clone(&sensor),
            me: RefCell::new(Weak::new()),
            log: Rc::clone(&log),
        });
        *detacher.me.borrow_mut() = Rc::downgrade(&detacher);
        let c = Recorder::new("c", &log);

        sensor.attach(&a);
        sensor.attach(&detacher);
        sensor.attach(&c);

        assert_eq!(sensor.update_temperature(12.0), 3);
        assert_eq!(sensor.update_temperature(11.0), 2);

        assert_eq!(
            *log.borrow(),
            vec![
                ("a", 12.0),
                ("self", 12.0),
                ("c", 12.0),
                ("a", 11.0),
                ("c", 11.0),
            ]
        );
    }

    // -- Cross detach ------------------------------------------------------

    /// Detaches `victim` from the sensor whenever it is notified.
    struct Evictor {
        sensor: Rc<TemperatureSensor>,
        victim: Rc<Recorder>,
        log: Log,
    }

    impl TemperatureObserver for Evictor {
        fn on_temperature(&self, temperature: Celsius) {
            self.log.borrow_mut().push(("evictor", temperature));
            self.sensor.detach(&self.victim);
        }
    }

    #[test]
    fn subscriber_detached_by_another_is_not_notified_mid_fan_out() {
        let log = new_log();
        let sensor = Rc::new(TemperatureSensor::new(18.0));
        let victim = Recorder::new("victim", &log);
        let evictor = Rc::new(Evictor {
            sensor: Rc::clone(&sensor),
            victim: Rc::clone(&victim),
            log: Rc::clone(&log),
        });
        let c = Recorder::new("c", &log);

        sensor.attach(&evictor);
        sensor.attach(&victim);
        sensor.attach(&c);

        assert_eq!(sensor.update_temperature(1.0), 2);
        assert_eq!(sensor.update_temperature(2.0), 2);

        assert_eq!(
            *log.borrow(),
            vec![("evictor", 1.0), ("c", 1.0), ("evictor", 2.0), ("c", 2.0)]
        );
    }

    #[test]
    fn detach_mid_fan_out_removes_one_of_duplicate_entries() {
        let log = new_log();
        let sensor = Rc::new(TemperatureSensor::new(18.0));
        let victim = Recorder::new("victim", &log);
        let evictor = Rc::new(Evictor {
            sensor: Rc::clone(&sensor),
            victim: Rc::clone(&victim),
            log: Rc::clone(&log),
        });

        sensor.attach(&evictor);
        sensor.attach(&victim);
        sensor.attach(&victim);

        // The first victim entry goes; the second is still attached.
        assert_eq!(sensor.update_temperature(3.0), 2);
        assert_eq!(*log.borrow(), vec![("evictor", 3.0), ("victim", 3.0)]);
    }

    #[test]
    fn subscriber_attached_mid_fan_out_waits_for_next_reading() {
        struct Recruiter {
            sensor: Rc<TemperatureSensor>,
            recruit: Rc<Recorder>,
        }

        impl TemperatureObserver for Recruiter {
            fn on_temperature(&self, _temperature: Celsius) {
                if self.sensor.subscriber_count() == 1 {
                    self.sensor.attach(&self.recruit);
                }
            }
        }

        let log = new_log();
        let sensor = Rc::new(TemperatureSensor::new(18.0));
        let recruiter = Rc::new(Recruiter {
            sensor: Rc::clone(&sensor),
            recruit: Recorder::new("recruit", &log),
        });
        sensor.attach(&recruiter);

        assert_eq!(sensor.update_temperature(4.0), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(sensor.update_temperature(5.0), 2);
        assert_eq!(*log.borrow(), vec![("recruit", 5.0)]);
    }
}

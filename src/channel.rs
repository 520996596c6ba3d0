//! Bounded snapshot channel between the fetch worker and the render loop.
//!
//! Built on `critical-section` and `heapless::Deque`. Unlike a plain queue the
//! sender never blocks and never fails: when the queue is full the oldest
//! message is evicted, so the receiver always ends up with the newest snapshot.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// A bounded channel that evicts the oldest message on overflow.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> Sender<'_, T, SIZE> {
        Sender { channel: self }
    }

    pub const fn receiver(&self) -> Receiver<'_, T, SIZE> {
        Receiver { channel: self }
    }

    /// Push a value, evicting the oldest queued value when full.
    ///
    /// Returns the evicted value, if any.
    pub fn send(&self, value: T) -> Option<T> {
        self.send_evicting(value, |_| false)
    }

    /// Push a value; when full, evict the oldest queued value matching
    /// `expendable`, or the oldest value if none matches.
    ///
    /// Queue order of the remaining values is preserved.
    pub fn send_evicting(&self, value: T, expendable: impl Fn(&T) -> bool) -> Option<T> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let evicted = if queue.is_full() {
                match queue.iter().position(|queued| expendable(queued)) {
                    Some(index) => remove_at(&mut queue, index),
                    None => queue.pop_front(),
                }
            } else {
                None
            };
            // Cannot fail: a slot was freed above when the queue was full
            let _ = queue.push_back(value);
            evicted
        })
    }

    /// Pop the oldest queued value.
    pub fn try_receive(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Drain the queue and hand every value, oldest first, to `f`.
    ///
    /// Returns the number of drained values.
    pub fn drain(&self, mut f: impl FnMut(T)) -> usize {
        let mut drained = 0;
        while let Some(value) = self.try_receive() {
            f(value);
            drained += 1;
        }
        drained
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remove the value at `index` by rotating the queue once
fn remove_at<T, const SIZE: usize>(queue: &mut Deque<T, SIZE>, index: usize) -> Option<T> {
    let mut removed = None;
    for position in 0..queue.len() {
        let Some(value) = queue.pop_front() else {
            break;
        };
        if position == index {
            removed = Some(value);
        } else {
            // Cannot fail: one slot was just popped
            let _ = queue.push_back(value);
        }
    }
    removed
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of a [`Channel`].
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Sender<'_, T, SIZE> {
    /// See [`Channel::send`].
    pub fn send(&self, value: T) -> Option<T> {
        self.channel.send(value)
    }

    /// See [`Channel::send_evicting`].
    pub fn send_evicting(&self, value: T, expendable: impl Fn(&T) -> bool) -> Option<T> {
        self.channel.send_evicting(value, expendable)
    }
}

/// Receiving half of a [`Channel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const SIZE: usize> {
    channel: &'a Channel<T, SIZE>,
}

impl<T, const SIZE: usize> Receiver<'_, T, SIZE> {
    pub fn try_receive(&self) -> Option<T> {
        self.channel.try_receive()
    }

    /// See [`Channel::drain`].
    pub fn drain(&self, f: impl FnMut(T)) -> usize {
        self.channel.drain(f)
    }
}

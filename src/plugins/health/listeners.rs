//! Ordered observer lists for lifecycle notifications.
//!
//! Each `Damageable` owns one list per transition. Subscribers are called
//! synchronously, in subscription order, at the moment of the transition.
//! A panicking listener is not caught here.

use std::fmt;

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Callback = Box<dyn FnMut() + Send + Sync + 'static>;

#[derive(Default)]
pub struct Listeners {
    next_id: u32,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub fn subscribe(&mut self, callback: impl FnMut() + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed (or already removed).
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        // `retain` keeps the remaining subscribers in order.
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify(&mut self) {
        for (_, callback) in &mut self.entries {
            callback();
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("subscribers", &self.entries.len())
            .finish()
    }
}

//! Scoped registration of document-level pointer listeners.
//!
//! A gesture owns one [`ListenerHost::Registration`] for exactly its
//! lifetime. Dropping the registration detaches the listeners, so every exit
//! path (pointer-up, cancel, leave, teardown, or the controller itself being
//! dropped) releases them without a matching manual call.

use std::cell::Cell;
use std::rc::Rc;

/// Attaches global move/up listeners for the duration of a gesture.
pub trait ListenerHost {
    /// Detaches the listeners when dropped.
    type Registration;

    fn attach(&mut self) -> Self::Registration;
}

/// For hosts that route move/up events themselves (native shells, tests).
impl ListenerHost for () {
    type Registration = ();

    fn attach(&mut self) {}
}

/// Counts live registrations. Useful for asserting that no gesture path
/// leaks a listener.
#[derive(Debug, Clone, Default)]
pub struct CountingHost {
    live: Rc<Cell<usize>>,
    attached_total: Rc<Cell<usize>>,
}

/// Registration handed out by [`CountingHost`].
#[derive(Debug)]
pub struct CountingRegistration {
    live: Rc<Cell<usize>>,
}

impl CountingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations currently held.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Registrations ever handed out.
    pub fn attached_total(&self) -> usize {
        self.attached_total.get()
    }
}

impl ListenerHost for CountingHost {
    type Registration = CountingRegistration;

    fn attach(&mut self) -> CountingRegistration {
        self.live.set(self.live.get() + 1);
        self.attached_total.set(self.attached_total.get() + 1);
        CountingRegistration {
            live: self.live.clone(),
        }
    }
}

impl Drop for CountingRegistration {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_releases_registration() {
        let mut host = CountingHost::new();
        let reg = host.attach();
        assert_eq!(host.live(), 1);
        drop(reg);
        assert_eq!(host.live(), 0);
        assert_eq!(host.attached_total(), 1);
    }
}

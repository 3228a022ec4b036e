use core::fmt;

/// Handle on a listener registered with a [`Provider`].
///
/// The listener is removed when the handle is cancelled or dropped.
///
/// [`Provider`]: crate::Provider
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    event: &'static str,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// `cancel` unregisters the listener of the given `event`
    pub fn new(event: &'static str, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            event,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// name of the provider event this subscription listens to
    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn cancel(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            tracing::trace!(event = self.event, "removing provider listener");
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

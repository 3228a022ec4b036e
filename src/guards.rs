use crate::error::ConnectError;
use std::cell::Cell;

/// mounted and in-flight flags of one [`Connector`](crate::Connector)
#[derive(Debug)]
pub(crate) struct LifecycleGuards {
    mounted: Cell<bool>,
    connecting: Cell<bool>,
}

/// Marks a connection attempt in flight. The flag is cleared when the guard
/// is dropped, whether the attempt succeeded, failed or was abandoned.
#[derive(Debug)]
pub(crate) struct Connecting<'a> {
    connecting: &'a Cell<bool>,
}

impl Default for LifecycleGuards {
    fn default() -> Self {
        Self {
            mounted: Cell::new(true),
            connecting: Cell::new(false),
        }
    }
}

impl LifecycleGuards {
    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub(crate) fn is_connecting(&self) -> bool {
        self.connecting.get()
    }

    /// there is no way back once unmounted
    pub(crate) fn unmount(&self) {
        self.mounted.set(false);
    }

    pub(crate) fn begin(&self) -> Result<Connecting<'_>, ConnectError> {
        if !self.is_mounted() {
            return Err(ConnectError::NotMounted);
        }
        if self.connecting.replace(true) {
            return Err(ConnectError::AlreadyConnecting);
        }

        Ok(Connecting {
            connecting: &self.connecting,
        })
    }
}

impl Drop for Connecting<'_> {
    fn drop(&mut self) {
        self.connecting.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_attempt_at_a_time() {
        let guards = LifecycleGuards::default();
        assert!(guards.is_mounted());
        assert!(!guards.is_connecting());

        let connecting = guards.begin().unwrap();
        assert!(guards.is_connecting());
        assert_eq!(guards.begin().unwrap_err(), ConnectError::AlreadyConnecting);
        // the failed attempt must not release the one in flight
        assert!(guards.is_connecting());

        drop(connecting);
        assert!(!guards.is_connecting());
        assert!(guards.begin().is_ok());
        assert!(!guards.is_connecting());
    }

    #[test]
    fn unmounted() {
        let guards = LifecycleGuards::default();
        guards.unmount();
        guards.unmount();

        assert!(!guards.is_mounted());
        assert_eq!(guards.begin().unwrap_err(), ConnectError::NotMounted);
        assert!(!guards.is_connecting());
    }

    #[test]
    fn unmounted_checked_before_connecting() {
        let guards = LifecycleGuards::default();
        let _connecting = guards.begin().unwrap();
        guards.unmount();

        assert_eq!(guards.begin().unwrap_err(), ConnectError::NotMounted);
    }
}

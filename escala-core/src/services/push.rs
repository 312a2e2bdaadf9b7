//! Push notification channel boundary
//!
//! The delivery mechanism (service worker, OS notifier, whatever the
//! embedding host provides) sits behind [`PushChannel`]. Delivery is
//! fire-and-forget: `show` has no failure channel, a dead channel is
//! detected up front via `permission` / `is_connected` and the caller
//! falls back to the in-app banner.

/// User-facing notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPermission {
    Default,
    Granted,
    Denied,
}

/// Capability object for push delivery.
pub trait PushChannel: Send + Sync {
    /// Current notification permission.
    fn permission(&self) -> PushPermission;

    /// Whether a delivery channel is actually reachable right now.
    fn is_connected(&self) -> bool;

    /// Fire-and-forget delivery.
    fn show(&self, title: &str, body: &str);
}

/// Channel stub for hosts without push support. Never connected, so
/// every reminder takes the banner path.
#[derive(Debug, Default)]
pub struct DisconnectedChannel;

impl PushChannel for DisconnectedChannel {
    fn permission(&self) -> PushPermission {
        PushPermission::Default
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn show(&self, _title: &str, _body: &str) {}
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Configurable channel recording everything shown through it.
    pub struct RecordingChannel {
        pub permission: PushPermission,
        pub connected: bool,
        pub shown: Mutex<Vec<(String, String)>>,
    }

    impl RecordingChannel {
        pub fn new(permission: PushPermission, connected: bool) -> Self {
            Self {
                permission,
                connected,
                shown: Mutex::new(Vec::new()),
            }
        }
    }

    impl PushChannel for RecordingChannel {
        fn permission(&self) -> PushPermission {
            self.permission
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn show(&self, title: &str, body: &str) {
            self.shown.lock().unwrap().push((title.into(), body.into()));
        }
    }
}

//! User notification port (interface).

/// Port for blocking, user-facing alerts.
///
/// Raised when scanning cannot start because the camera is unavailable.
pub trait UserNotifier: Send + Sync {
    /// Show `message` to the user.
    fn alert(&self, message: &str);
}

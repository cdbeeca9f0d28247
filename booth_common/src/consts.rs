//! Process exit codes and fixed appliance defaults.

/// Clean shutdown requested; the outer wrapper exits the appliance.
pub const EXIT_SHUTDOWN: i32 = 0;

/// Restart requested; the outer wrapper reloads configuration and
/// relaunches the whole process group.
pub const EXIT_RESTART: i32 = 123;

/// Unrecoverable fault; the appliance stops for operator attention.
pub const EXIT_FATAL: i32 = 70;

/// Pseudo-code used by the outer wrapper before the first launch.
pub const EXIT_INITIALIZING: i32 = 999;

/// Default shots per sitting.
pub const DEFAULT_NUM_SHOTS: u32 = 3;

/// Default seconds the greeter screen is shown.
pub const DEFAULT_GREETER_TIME_S: f64 = 3.0;

/// Default seconds of visible countdown before each shot.
pub const DEFAULT_COUNTDOWN_TIME_S: f64 = 5.0;

/// Default seconds the review screen is shown.
pub const DEFAULT_REVIEW_TIME_S: f64 = 10.0;

/// Returns true for exit codes that make the outer wrapper relaunch.
#[inline]
pub const fn is_relaunch_code(code: i32) -> bool {
    matches!(code, EXIT_RESTART | EXIT_INITIALIZING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaunch_codes() {
        assert!(is_relaunch_code(EXIT_RESTART));
        assert!(is_relaunch_code(EXIT_INITIALIZING));
        assert!(!is_relaunch_code(EXIT_SHUTDOWN));
        assert!(!is_relaunch_code(EXIT_FATAL));
        assert!(!is_relaunch_code(1));
    }
}

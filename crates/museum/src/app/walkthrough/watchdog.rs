use glam::Vec3;

use super::room::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecoveryReason {
    OutOfBounds,
    EmergencyReset,
}

impl RecoveryReason {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RecoveryReason::OutOfBounds => "out_of_bounds",
            RecoveryReason::EmergencyReset => "emergency_reset",
        }
    }
}

/// Decides whether this tick starts with a recovery.
///
/// Runs against the pose committed by the previous tick. The bounds check is
/// skipped while focused; the emergency reset is not.
pub(crate) fn check_recovery(
    room: &Room,
    committed_position: Vec3,
    is_focused: bool,
    emergency_reset: bool,
) -> Option<RecoveryReason> {
    if !is_focused && room.is_outside_watchdog_volume(committed_position) {
        Some(RecoveryReason::OutOfBounds)
    } else if emergency_reset {
        Some(RecoveryReason::EmergencyReset)
    } else {
        None
    }
}

use crate::infrastructure::serial::protocol::DriveCommand;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct HeldControl {
    command: DriveCommand,
    since: Instant,
    fired: bool,
}

/// Turns per-frame press state of the directional controls into drive commands.
///
/// A direction is sent once it has been held for the long-press duration.
/// Releasing a control always sends [`DriveCommand::Stop`], even after a tap.
#[derive(Debug)]
pub struct DrivePad {
    long_press: Duration,
    held: Option<HeldControl>,
}

impl DrivePad {
    pub fn new(long_press: Duration) -> Self {
        Self {
            long_press,
            held: None,
        }
    }

    pub fn set_long_press(&mut self, long_press: Duration) {
        self.long_press = long_press;
    }

    /// Direction currently held down, whether or not it has fired yet
    pub fn held(&self) -> Option<DriveCommand> {
        self.held.map(|h| h.command)
    }

    /// True once the held direction has been sent to the device
    pub fn is_driving(&self) -> bool {
        self.held.map_or(false, |h| h.fired)
    }

    /// Feed the control pressed this frame (`None` when nothing is pressed)
    pub fn update(&mut self, pressed: Option<DriveCommand>, now: Instant) -> Option<DriveCommand> {
        let pressed = pressed.filter(|c| *c != DriveCommand::Stop);

        match (self.held, pressed) {
            (None, None) => None,
            (Some(_), None) => {
                self.held = None;
                Some(DriveCommand::Stop)
            }
            (Some(held), Some(command)) if held.command != command => {
                self.held = Some(HeldControl {
                    command,
                    since: now,
                    fired: false,
                });
                Some(DriveCommand::Stop)
            }
            (None, Some(command)) => {
                self.held = Some(HeldControl {
                    command,
                    since: now,
                    fired: false,
                });
                self.fire_if_due(now)
            }
            (Some(_), Some(_)) => self.fire_if_due(now),
        }
    }

    fn fire_if_due(&mut self, now: Instant) -> Option<DriveCommand> {
        let held = self.held.as_mut()?;
        if !held.fired && now.saturating_duration_since(held.since) >= self.long_press {
            held.fired = true;
            return Some(held.command);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_PRESS: Duration = Duration::from_millis(500);

    #[test]
    fn test_sustained_press_sends_direction_once() {
        let mut pad = DrivePad::new(LONG_PRESS);
        let t0 = Instant::now();

        assert_eq!(pad.update(Some(DriveCommand::Forward), t0), None);
        assert_eq!(
            pad.update(Some(DriveCommand::Forward), t0 + Duration::from_millis(200)),
            None
        );
        assert_eq!(
            pad.update(Some(DriveCommand::Forward), t0 + LONG_PRESS),
            Some(DriveCommand::Forward)
        );
        assert!(pad.is_driving());
        assert_eq!(
            pad.update(Some(DriveCommand::Forward), t0 + Duration::from_secs(2)),
            None
        );
        assert_eq!(
            pad.update(None, t0 + Duration::from_secs(3)),
            Some(DriveCommand::Stop)
        );
        assert_eq!(pad.held(), None);
    }

    #[test]
    fn test_tap_sends_only_stop() {
        let mut pad = DrivePad::new(LONG_PRESS);
        let t0 = Instant::now();

        assert_eq!(pad.update(Some(DriveCommand::Left), t0), None);
        assert_eq!(
            pad.update(None, t0 + Duration::from_millis(80)),
            Some(DriveCommand::Stop)
        );
        assert_eq!(pad.update(None, t0 + Duration::from_millis(100)), None);
    }

    #[test]
    fn test_switching_controls_stops_first() {
        let mut pad = DrivePad::new(LONG_PRESS);
        let t0 = Instant::now();

        pad.update(Some(DriveCommand::Left), t0);
        assert_eq!(
            pad.update(Some(DriveCommand::Left), t0 + LONG_PRESS),
            Some(DriveCommand::Left)
        );

        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(
            pad.update(Some(DriveCommand::Right), t1),
            Some(DriveCommand::Stop)
        );
        assert_eq!(pad.held(), Some(DriveCommand::Right));
        assert_eq!(
            pad.update(Some(DriveCommand::Right), t1 + LONG_PRESS),
            Some(DriveCommand::Right)
        );
    }

    #[test]
    fn test_zero_long_press_fires_immediately() {
        let mut pad = DrivePad::new(Duration::ZERO);
        assert_eq!(
            pad.update(Some(DriveCommand::Back), Instant::now()),
            Some(DriveCommand::Back)
        );
    }

    #[test]
    fn test_stop_is_not_a_held_direction() {
        let mut pad = DrivePad::new(LONG_PRESS);
        assert_eq!(pad.update(Some(DriveCommand::Stop), Instant::now()), None);
        assert_eq!(pad.held(), None);
    }
}

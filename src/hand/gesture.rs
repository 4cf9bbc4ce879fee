// Gesture presets.
//
// Each gesture is a table of per-finger targets. Angles are in the
// ideal hand frame (calibration is applied later, at command time), and
// the thumb rows differ between left and right builds because the thumb
// linkage is the mirrored part.

use std::fmt;

use super::{Finger, Side};

/// Fastest commanded speed, used for snappy poses.
pub const MAX_SPEED: u16 = 7;

/// Slower speed for curling into a fist, which keeps the fingertips
/// from slapping the palm.
pub const CLOSE_SPEED: u16 = 3;

// Shared poses for one finger pair
const FLEXED: [f32; 2] = [90.0, -90.0];
const EXTENDED: [f32; 2] = [-35.0, 35.0];

/// Target pose for one finger: both servo angles and the speed to reach
/// them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerTarget {
    pub finger: Finger,
    pub angles: [f32; 2],
    pub speed: u16,
}

fn target(finger: Finger, angles: [f32; 2], speed: u16) -> FingerTarget {
    FingerTarget {
        finger,
        angles,
        speed,
    }
}

/// Named hand poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Open,
    Close,
    Point,
    Victory,
    Ok,
    Pinch,
}

impl Gesture {
    pub const ALL: [Gesture; 6] = [
        Gesture::Open,
        Gesture::Close,
        Gesture::Point,
        Gesture::Victory,
        Gesture::Ok,
        Gesture::Pinch,
    ];

    /// Finger targets for this gesture on the given side, in command
    /// order (index, middle, ring, thumb).
    pub fn targets(self, side: Side) -> [FingerTarget; 4] {
        use Finger::{Index, Middle, Ring, Thumb};

        match (self, side) {
            (Gesture::Open, _) => [
                target(Index, EXTENDED, MAX_SPEED),
                target(Middle, EXTENDED, MAX_SPEED),
                target(Ring, EXTENDED, MAX_SPEED),
                target(Thumb, EXTENDED, MAX_SPEED),
            ],
            (Gesture::Close, _) => [
                target(Index, FLEXED, CLOSE_SPEED),
                target(Middle, FLEXED, CLOSE_SPEED),
                target(Ring, FLEXED, CLOSE_SPEED),
                // The thumb travels further to wrap the fist
                target(Thumb, FLEXED, CLOSE_SPEED + 1),
            ],
            (Gesture::Point, _) => [
                target(Index, [-40.0, 40.0], MAX_SPEED),
                target(Middle, FLEXED, MAX_SPEED),
                target(Ring, FLEXED, MAX_SPEED),
                target(Thumb, FLEXED, MAX_SPEED),
            ],
            (Gesture::Victory, Side::Right) => [
                target(Index, [-15.0, 65.0], MAX_SPEED),
                target(Middle, [-65.0, 15.0], MAX_SPEED),
                target(Ring, FLEXED, MAX_SPEED),
                target(Thumb, FLEXED, MAX_SPEED),
            ],
            (Gesture::Victory, Side::Left) => [
                target(Index, [-65.0, 15.0], MAX_SPEED),
                target(Middle, [-15.0, 65.0], MAX_SPEED),
                target(Ring, FLEXED, MAX_SPEED),
                target(Thumb, FLEXED, MAX_SPEED),
            ],
            (Gesture::Ok, side) => [
                target(Index, [50.0, -50.0], MAX_SPEED),
                target(Middle, [0.0, 0.0], MAX_SPEED),
                target(Ring, [-20.0, 20.0], MAX_SPEED),
                match side {
                    Side::Right => target(Thumb, [65.0, 12.0], MAX_SPEED),
                    Side::Left => target(Thumb, [-12.0, -65.0], MAX_SPEED),
                },
            ],
            (Gesture::Pinch, side) => [
                target(Index, FLEXED, MAX_SPEED),
                target(Middle, FLEXED, MAX_SPEED),
                target(Ring, FLEXED, MAX_SPEED),
                match side {
                    Side::Right => target(Thumb, [0.0, -75.0], MAX_SPEED),
                    Side::Left => target(Thumb, [75.0, 5.0], MAX_SPEED),
                },
            ],
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gesture::Open => "open",
            Gesture::Close => "close",
            Gesture::Point => "point",
            Gesture::Victory => "victory",
            Gesture::Ok => "ok",
            Gesture::Pinch => "pinch",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_follow_command_order() {
        for gesture in Gesture::ALL {
            for side in [Side::Right, Side::Left] {
                let targets = gesture.targets(side);
                let fingers: Vec<Finger> = targets.iter().map(|t| t.finger).collect();
                assert_eq!(fingers, Finger::ALL.to_vec(), "{gesture} on {side:?}");
            }
        }
    }

    #[test]
    fn test_symmetric_gestures_ignore_side() {
        for gesture in [Gesture::Open, Gesture::Close, Gesture::Point] {
            assert_eq!(gesture.targets(Side::Right), gesture.targets(Side::Left));
        }
    }

    #[test]
    fn test_close_slows_every_finger() {
        let targets = Gesture::Close.targets(Side::Right);
        assert_eq!(targets[0].speed, CLOSE_SPEED);
        assert_eq!(targets[1].speed, CLOSE_SPEED);
        assert_eq!(targets[2].speed, CLOSE_SPEED);
        assert_eq!(targets[3].speed, CLOSE_SPEED + 1);
    }

    #[test]
    fn test_victory_mirrors_index_and_middle() {
        let right = Gesture::Victory.targets(Side::Right);
        let left = Gesture::Victory.targets(Side::Left);

        assert_eq!(right[0].angles, left[1].angles);
        assert_eq!(right[1].angles, left[0].angles);
        assert_eq!(right[2], left[2]);
        assert_eq!(right[3], left[3]);
    }

    #[test]
    fn test_thumb_rows_mirror_by_side() {
        let right = Gesture::Pinch.targets(Side::Right);
        let left = Gesture::Pinch.targets(Side::Left);
        assert_eq!(right[3].angles, [0.0, -75.0]);
        assert_eq!(left[3].angles, [75.0, 5.0]);

        let right = Gesture::Ok.targets(Side::Right);
        let left = Gesture::Ok.targets(Side::Left);
        assert_eq!(right[3].angles, [65.0, 12.0]);
        assert_eq!(left[3].angles, [-12.0, -65.0]);
    }
}

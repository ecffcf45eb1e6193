/*!
    Frame durations in stream time-base units.
*/

use std::time::Duration;

use crate::Rational;

/**
    A span of `ticks` in some stream's time base, as carried by a decoded
    frame. Zero or negative means the container did not say.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);

impl MediaDuration {
    pub fn is_unknown(self) -> bool {
        self.0 <= 0
    }

    pub fn to_duration(self, time_base: Rational) -> Duration {
        time_base.ticks_to_duration(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_at_25fps_in_mpeg_time_base() {
        let tb = Rational::new(1, 90000);
        assert_eq!(MediaDuration(3600).to_duration(tb), Duration::from_millis(40));
    }

    #[test]
    fn unknown_durations() {
        assert!(MediaDuration::default().is_unknown());
        assert!(MediaDuration(-1).is_unknown());
        assert!(!MediaDuration(1).is_unknown());
        assert_eq!(
            MediaDuration(-50).to_duration(Rational::new(1, 1000)),
            Duration::ZERO
        );
    }
}

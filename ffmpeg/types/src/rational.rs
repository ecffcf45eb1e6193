/*!
    Time bases and frame rates.
*/

use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/**
    A fraction as reported by a container: a stream time base such as
    `1/90000`, or an average frame rate such as `30000/1001`.

    The denominator is never zero.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    /**
        # Panics

        If `den` is zero. Use [`checked`](Self::checked) for values read
        from a file.
    */
    pub const fn new(num: i32, den: i32) -> Self {
        match Self::checked(num, den) {
            Some(r) => r,
            None => panic!("zero denominator"),
        }
    }

    /**
        Containers use `0/0` (or `n/0`) for "unknown"; those become `None`.
    */
    pub const fn checked(num: i32, den: i32) -> Option<Self> {
        if den == 0 {
            None
        } else {
            Some(Self { num, den })
        }
    }

    /**
        Time between consecutive frames when `self` is a frame rate,
        or `None` if the rate is not positive.
    */
    pub fn frame_interval(self) -> Option<Duration> {
        if self.num <= 0 || self.den <= 0 {
            return None;
        }
        Some(Duration::from_nanos(
            self.den as u64 * NANOS_PER_SEC / self.num as u64,
        ))
    }

    /**
        Wall-clock length of `ticks` units of this time base, saturating
        at zero for negative inputs.
    */
    pub fn ticks_to_duration(self, ticks: i64) -> Duration {
        if ticks <= 0 || self.num <= 0 || self.den <= 0 {
            return Duration::ZERO;
        }
        let nanos = ticks as i128 * self.num as i128 * NANOS_PER_SEC as i128 / self.den as i128;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "zero denominator")]
    fn new_rejects_zero_denominator() {
        Rational::new(30, 0);
    }

    #[test]
    fn unknown_rates_are_none() {
        assert_eq!(Rational::checked(0, 0), None);
        assert_eq!(Rational::checked(25, 0), None);
        assert_eq!(Rational::checked(25, 1), Some(Rational::new(25, 1)));
    }

    #[test]
    fn frame_interval() {
        assert_eq!(
            Rational::new(25, 1).frame_interval(),
            Some(Duration::from_millis(40))
        );
        // 29.97 fps
        let ntsc = Rational::new(30000, 1001).frame_interval().unwrap();
        assert_eq!(ntsc, Duration::from_nanos(33_366_666));

        assert_eq!(Rational::new(0, 1).frame_interval(), None);
        assert_eq!(Rational::new(-25, 1).frame_interval(), None);
    }

    #[test]
    fn ticks() {
        let mpeg = Rational::new(1, 90000);
        assert_eq!(mpeg.ticks_to_duration(90000), Duration::from_secs(1));
        assert_eq!(mpeg.ticks_to_duration(3600), Duration::from_millis(40));
        assert_eq!(mpeg.ticks_to_duration(-3600), Duration::ZERO);
        assert_eq!(Rational::new(1, 1000).ticks_to_duration(41), Duration::from_millis(41));
    }

    #[test]
    fn displays_as_fraction() {
        assert_eq!(Rational::new(30000, 1001).to_string(), "30000/1001");
    }
}

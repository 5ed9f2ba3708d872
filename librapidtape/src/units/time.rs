use std::fmt;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Wrapper structure for printing durations in human printable format.
///
/// Prints every non-zero component from days down to nanoseconds, e.g.
/// `1h2m3s500ms`. A zero duration prints as `0s`.
#[derive(Copy, Clone, Debug)]
pub struct HRDuration {
    inner: Duration
}

impl From<Duration> for HRDuration {
    fn from(duration: Duration) -> HRDuration {
        HRDuration {
            inner: duration
        }
    }
}

impl From<HRDuration> for Duration {
    fn from(duration: HRDuration) -> Duration {
        duration.inner
    }
}

const SECOND_UNITS : [(&str, u64); 4] = [("d", 24 * 60 * 60), ("h", 60 * 60), ("m", 60), ("s", 1)];
const NANO_UNITS : [(&str, u32); 3] = [("ms", 1000 * 1000), ("μs", 1000), ("ns", 1)];

impl Display for HRDuration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.inner == Duration::new(0, 0) {
            return write!(f, "0s");
        }

        let mut secs = self.inner.as_secs();
        for &(name, size) in SECOND_UNITS.iter() {
            if secs >= size {
                write!(f, "{}{}", secs / size, name)?;
                secs %= size;
            }
        }

        let mut nanos = self.inner.subsec_nanos();
        for &(name, size) in NANO_UNITS.iter() {
            if nanos >= size {
                write!(f, "{}{}", nanos / size, name)?;
                nanos %= size;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::units::HRDuration;
    use std::time::Duration;

    #[test]
    fn time_hours() {
        let my_time = Duration::new(12*60*60 + 30*60 + 14, 0);
        let fmtd = format!("{}", HRDuration::from(my_time));

        assert_eq!(fmtd, "12h30m14s");
    }

    #[test]
    fn time_days() {
        let my_time = Duration::new(14*24*60*60 + 12*60*60 + 14, 0);
        let fmtd = format!("{}", HRDuration::from(my_time));

        assert_eq!(fmtd, "14d12h14s");
    }

    #[test]
    fn time_millis() {
        let my_time = Duration::from_millis(2_750);
        let fmtd = format!("{}", HRDuration::from(my_time));

        assert_eq!(fmtd, "2s750ms");
    }

    #[test]
    fn time_nanos() {
        let my_time = Duration::new(30*60 + 14, 1_123);
        let fmtd = format!("{}", HRDuration::from(my_time));

        assert_eq!(fmtd, "30m14s1μs123ns");
    }

    #[test]
    fn time_zero() {
        assert_eq!(format!("{}", HRDuration::from(Duration::new(0, 0))), "0s");
    }
}

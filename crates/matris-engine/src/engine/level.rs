use std::time::Duration;

/// Lines that must be cleared to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

/// Highest reachable level.
pub const MAX_LEVEL: usize = 1000;

/// Returns the level reached after clearing `lines` lines.
///
/// Levels start at 1 and advance every [`LINES_PER_LEVEL`] lines, saturating
/// at [`MAX_LEVEL`].
///
/// ```
/// use matris_engine::level_for_lines;
///
/// assert_eq!(level_for_lines(0), 1);
/// assert_eq!(level_for_lines(9), 1);
/// assert_eq!(level_for_lines(25), 3);
/// ```
#[must_use]
pub const fn level_for_lines(lines: usize) -> usize {
    let level = lines / LINES_PER_LEVEL + 1;
    if level > MAX_LEVEL { MAX_LEVEL } else { level }
}

/// How the gravity interval shrinks as the level rises.
///
/// Every policy must return a positive interval that never grows with the
/// level; the built-in variants guarantee it.
#[derive(Debug, Clone, Copy)]
pub enum DropIntervalPolicy {
    /// `initial - (level - 1) * step`, clamped below at `floor`.
    Linear {
        initial: Duration,
        step: Duration,
        floor: Duration,
    },
    /// Same interval at every level.
    Fixed(Duration),
    /// Caller-supplied mapping from level to interval.
    Custom(fn(usize) -> Duration),
}

impl Default for DropIntervalPolicy {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl DropIntervalPolicy {
    /// 1000ms at level 1, 5ms faster per level, never below 100ms.
    pub const LINEAR: Self = Self::Linear {
        initial: Duration::from_millis(1000),
        step: Duration::from_millis(5),
        floor: Duration::from_millis(100),
    };

    /// Constant 1000ms.
    pub const FIXED: Self = Self::Fixed(Duration::from_millis(1000));

    /// Returns the gravity interval for `level`.
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use matris_engine::DropIntervalPolicy;
    ///
    /// let policy = DropIntervalPolicy::default();
    /// assert_eq!(policy.interval(1), Duration::from_millis(1000));
    /// assert_eq!(policy.interval(3), Duration::from_millis(990));
    /// assert_eq!(policy.interval(500), Duration::from_millis(100));
    /// ```
    #[must_use]
    pub fn interval(&self, level: usize) -> Duration {
        match *self {
            Self::Linear {
                initial,
                step,
                floor,
            } => {
                let steps = u32::try_from(level.saturating_sub(1)).unwrap_or(u32::MAX);
                initial
                    .saturating_sub(step.saturating_mul(steps))
                    .max(floor)
            }
            Self::Fixed(interval) => interval,
            Self::Custom(f) => f(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(19), 2);
        assert_eq!(level_for_lines(25), 3);
        assert_eq!(level_for_lines(9_989), 999);
        assert_eq!(level_for_lines(9_990), MAX_LEVEL);
        assert_eq!(level_for_lines(usize::MAX), MAX_LEVEL);
    }

    #[test]
    fn test_linear_interval_is_non_increasing_and_floored() {
        let policy = DropIntervalPolicy::LINEAR;
        let mut previous = policy.interval(1);
        for level in 2..=MAX_LEVEL {
            let interval = policy.interval(level);
            assert!(interval <= previous, "level {level}");
            assert!(interval >= Duration::from_millis(100), "level {level}");
            previous = interval;
        }
        assert_eq!(policy.interval(181), Duration::from_millis(100));
        assert_eq!(policy.interval(180), Duration::from_millis(105));
    }

    #[test]
    fn test_linear_interval_saturates_on_huge_levels() {
        let policy = DropIntervalPolicy::Linear {
            initial: Duration::from_secs(1),
            step: Duration::from_secs(1),
            floor: Duration::from_millis(50),
        };
        assert_eq!(policy.interval(usize::MAX), Duration::from_millis(50));
    }

    #[test]
    fn test_fixed_interval() {
        let policy = DropIntervalPolicy::FIXED;
        assert_eq!(policy.interval(1), Duration::from_millis(1000));
        assert_eq!(policy.interval(MAX_LEVEL), Duration::from_millis(1000));
    }

    #[test]
    fn test_custom_interval() {
        fn inverse(level: usize) -> Duration {
            Duration::from_millis(800) / u32::try_from(level).unwrap()
        }
        let policy = DropIntervalPolicy::Custom(inverse);
        assert_eq!(policy.interval(1), Duration::from_millis(800));
        assert_eq!(policy.interval(4), Duration::from_millis(200));
    }
}

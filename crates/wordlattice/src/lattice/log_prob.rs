//! # Log-Domain Probabilities

/// A probability in the log domain.
///
/// [`LogProb::Impossible`] is an explicit "unreachable" state;
/// it is never represented by IEEE `-inf`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum LogProb {
    /// Probability zero.
    #[default]
    Impossible,

    /// ``ln(p)`` for some `p > 0`.
    Ln(f64),
}

impl LogProb {
    /// Probability one.
    pub const ONE: LogProb = LogProb::Ln(0.0);

    /// Is this reachable?
    pub fn is_possible(self) -> bool {
        matches!(self, Self::Ln(_))
    }

    /// The log value, if possible.
    pub fn ln(self) -> Option<f64> {
        match self {
            Self::Impossible => None,
            Self::Ln(v) => Some(v),
        }
    }

    /// Probability product; ``ln(p) + ln(q)``.
    ///
    /// [`LogProb::Impossible`] absorbs.
    pub fn times(
        self,
        other: LogProb,
    ) -> LogProb {
        match (self, other) {
            (Self::Ln(a), Self::Ln(b)) => Self::Ln(a + b),
            _ => Self::Impossible,
        }
    }

    /// Multiply by a finite log-probability.
    pub fn times_ln(
        self,
        log_p: f64,
    ) -> LogProb {
        self.times(Self::Ln(log_p))
    }

    /// Probability sum; stable two-term log-sum-exp.
    ///
    /// If either side is [`LogProb::Impossible`], the other side is returned;
    /// so the result is impossible only when both are.
    pub fn plus(
        self,
        other: LogProb,
    ) -> LogProb {
        match (self, other) {
            (Self::Impossible, x) => x,
            (x, Self::Impossible) => x,
            (Self::Ln(a), Self::Ln(b)) => {
                let (hi, lo) = if a < b { (b, a) } else { (a, b) };
                Self::Ln(hi + (lo - hi).exp().ln_1p())
            }
        }
    }

    /// Back to the linear domain; impossible is `0.0`.
    pub fn exp(self) -> f64 {
        match self {
            Self::Impossible => 0.0,
            Self::Ln(v) => v.exp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(
        a: LogProb,
        b: f64,
    ) -> bool {
        (a.ln().unwrap() - b).abs() < 1e-12
    }

    #[test]
    fn test_plus() {
        let a = LogProb::Ln(0.2f64.ln());
        let b = LogProb::Ln(0.3f64.ln());
        assert!(close(a.plus(b), 0.5f64.ln()));
        assert!(close(b.plus(a), 0.5f64.ln()));

        assert_eq!(LogProb::Impossible.plus(a), a);
        assert_eq!(a.plus(LogProb::Impossible), a);
        assert_eq!(
            LogProb::Impossible.plus(LogProb::Impossible),
            LogProb::Impossible
        );
    }

    #[test]
    fn test_plus_is_stable() {
        // exp(-1000) underflows; the naive sum would be ln(0).
        let a = LogProb::Ln(-1000.0);
        let b = LogProb::Ln(-1000.0);
        assert!(close(a.plus(b), -1000.0 + 2f64.ln()));

        let big = LogProb::Ln(800.0);
        assert!(close(big.plus(big), 800.0 + 2f64.ln()));
    }

    #[test]
    fn test_times() {
        let a = LogProb::Ln(0.5f64.ln());
        assert!(close(a.times(a), 0.25f64.ln()));
        assert!(close(a.times_ln(0.5f64.ln()), 0.25f64.ln()));
        assert_eq!(a.times(LogProb::Impossible), LogProb::Impossible);
        assert_eq!(LogProb::Impossible.times_ln(0.0), LogProb::Impossible);
    }

    #[test]
    fn test_exp() {
        assert_eq!(LogProb::Impossible.exp(), 0.0);
        assert_eq!(LogProb::ONE.exp(), 1.0);
        assert!(LogProb::ONE.is_possible());
        assert!(!LogProb::default().is_possible());
        assert_eq!(LogProb::Impossible.ln(), None);
    }
}

use std::fmt;

/// A derived statistic that may be degenerate.
///
/// Zero denominators and diverging formulas are represented explicitly
/// instead of as `NaN` or infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Metric {
    /// A finite value
    Value(f64),
    /// Denominator was zero
    Undefined,
    /// Formula diverges; the value is at its maximum
    Saturated,
}

impl Metric {
    /// `numerator / denominator`, undefined for a zero denominator.
    pub fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Metric::Undefined
        } else {
            Metric::Value(numerator as f64 / denominator as f64)
        }
    }

    /// Finite value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Render with `precision` decimals; `NA` when undefined, `Inf` when saturated.
    pub fn display(self, precision: usize) -> MetricDisplay {
        MetricDisplay {
            metric: self,
            precision,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`Metric::display`].
#[derive(Debug, Clone, Copy)]
pub struct MetricDisplay {
    metric: Metric,
    precision: usize,
}

impl fmt::Display for MetricDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.metric {
            Metric::Value(v) => write!(f, "{:.*}", self.precision, v),
            Metric::Undefined => f.write_str("NA"),
            Metric::Saturated => f.write_str("Inf"),
        }
    }
}

/// Depth estimate from breadth of coverage over known sites.
///
/// Under Poisson sampling at mean depth λ a site is covered with probability
/// `1 - e^-λ`, so `λ = -ln(1 - covered/total)`.
pub fn effective_coverage(covered: u64, total: u64) -> Metric {
    if total == 0 {
        return Metric::Undefined;
    }
    if covered >= total {
        return Metric::Saturated;
    }
    let fraction = covered as f64 / total as f64;
    Metric::Value(-(-fraction).ln_1p())
}

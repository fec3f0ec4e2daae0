use std::fmt;

use super::Metric;

/// Inferred chromosomal sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Sex {
    /// XY
    Male,
    /// XX
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Male => "M",
            Sex::Female => "F",
        })
    }
}

/// Decision thresholds for [`call_sex`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SexThresholds {
    /// X/Y depth ratios below this are male
    pub male_ratio_below: f64,
    /// X/Y depth ratios above this are female
    pub female_ratio_above: f64,
    /// In between, a genome-to-chrY coverage quotient above this is female
    pub female_quotient_above: f64,
}

impl Default for SexThresholds {
    fn default() -> Self {
        Self {
            male_ratio_below: 2.0,
            female_ratio_above: 4.5,
            female_quotient_above: 10.0,
        }
    }
}

/// Sex call with the diagnostics it was made from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SexCall {
    /// The call
    pub sex: Sex,
    /// chrX depth / chrY depth
    pub xy_depth_ratio: Metric,
    /// Covered fraction of the restricted chrY window
    pub chr_y_coverage: f64,
}

/// X/Y depth ratio; saturated when chrY has no depth at all.
pub fn xy_depth_ratio(chr_x_depth: f64, chr_y_depth: f64) -> Metric {
    if chr_y_depth == 0.0 {
        Metric::Saturated
    } else {
        Metric::Value(chr_x_depth / chr_y_depth)
    }
}

/// Call sex from the X/Y depth ratio.
///
/// Ratios between the two thresholds are resolved by comparing genome-wide
/// breadth of coverage with breadth over the restricted chrY window: a
/// female sample has a near-empty chrY window even where reads mis-map.
pub fn call_sex(
    xy_ratio: Metric,
    overall_coverage: f64,
    chr_y_coverage: f64,
    thresholds: &SexThresholds,
) -> Sex {
    let ratio = match xy_ratio {
        Metric::Value(ratio) => ratio,
        Metric::Saturated | Metric::Undefined => return Sex::Female,
    };
    if ratio < thresholds.male_ratio_below {
        return Sex::Male;
    }
    if ratio > thresholds.female_ratio_above {
        return Sex::Female;
    }
    if chr_y_coverage <= 0.0 {
        return Sex::Female;
    }
    if overall_coverage / chr_y_coverage > thresholds.female_quotient_above {
        Sex::Female
    } else {
        Sex::Male
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        let t = SexThresholds::default();
        // Exactly on a threshold falls into the ambiguous zone.
        assert_eq!(call_sex(Metric::Value(2.0), 0.5, 0.25, &t), Sex::Male);
        assert_eq!(call_sex(Metric::Value(4.5), 0.5, 0.01, &t), Sex::Female);
    }

    #[test]
    fn empty_y_window_in_ambiguous_zone_is_female() {
        let t = SexThresholds::default();
        assert_eq!(call_sex(Metric::Value(3.0), 0.5, 0.0, &t), Sex::Female);
    }

    #[test]
    fn zero_y_depth_saturates_ratio() {
        assert_eq!(xy_depth_ratio(1.2, 0.0), Metric::Saturated);
        assert_eq!(xy_depth_ratio(1.2, 0.6), Metric::Value(2.0));
    }

    #[test]
    fn sex_renders_as_letter() {
        assert_eq!(Sex::Male.to_string(), "M");
        assert_eq!(Sex::Female.to_string(), "F");
    }
}

// ---------------------------------------------------------------------------
// Radius scale: total traffic → circle radius in screen points
// ---------------------------------------------------------------------------

/// Square-root scale from trip counts to circle radii, so circle *area*
/// tracks traffic. The output range widens when a time filter is active:
/// filtered data is sparse and would otherwise shrink into invisibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain_max: f64,
    range: (f32, f32),
}

/// Output range with no time filter selected.
const UNFILTERED_RANGE: (f32, f32) = (0.0, 25.0);
/// Output range while a concrete minute is selected.
const FILTERED_RANGE: (f32, f32) = (3.0, 50.0);

impl RadiusScale {
    pub fn unfiltered(domain_max: u32) -> Self {
        RadiusScale {
            domain_max: f64::from(domain_max),
            range: UNFILTERED_RANGE,
        }
    }

    pub fn filtered(domain_max: u32) -> Self {
        RadiusScale {
            domain_max: f64::from(domain_max),
            range: FILTERED_RANGE,
        }
    }

    /// Radius for a station's total traffic. A degenerate domain (max 0,
    /// i.e. no trips anywhere) maps everything to the range minimum.
    pub fn radius(&self, total_traffic: u32) -> f32 {
        let (lo, hi) = self.range;
        if self.domain_max <= 0.0 {
            return lo;
        }
        let t = (f64::from(total_traffic) / self.domain_max).clamp(0.0, 1.0);
        lo + (hi - lo) * t.sqrt() as f32
    }
}

// ---------------------------------------------------------------------------
// Quantize: [0, 1] → bucket index
// ---------------------------------------------------------------------------

/// Split the unit interval into `buckets` equal slices and return which one
/// `value` lands in. Out-of-range values clamp to the end buckets.
pub fn quantize(value: f64, buckets: usize) -> usize {
    debug_assert!(buckets > 0);
    let idx = (value * buckets as f64).floor() as isize;
    idx.clamp(0, buckets as isize - 1) as usize
}

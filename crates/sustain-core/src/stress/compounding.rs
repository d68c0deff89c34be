use crate::types::{Money, Percent};

/// `principal * (1 + rate/100)^periods`.
pub fn compounded_value(principal: Money, rate: Percent, periods: i32) -> Money {
    principal * (1.0 + rate / 100.0).powi(periods)
}

/// Round to cents, half away from zero. NaN and infinities pass through.
pub fn round_cents(value: Money) -> Money {
    (value * 100.0).round() / 100.0
}

/// Cumulative lost earnings per period: what each principal earns for one
/// period at `original_rate` minus what it earns at `reduced_rate`, both
/// rounded to cents, summed over the periods so far.
pub fn residual_effects(principals: &[Money], original_rate: Percent, reduced_rate: Percent) -> Vec<Money> {
    let mut cumulative = 0.0;
    principals
        .iter()
        .map(|&principal| {
            let at_original = round_cents(compounded_value(principal, original_rate, 1));
            let at_reduced = round_cents(compounded_value(principal, reduced_rate, 1));
            cumulative += at_original - at_reduced;
            cumulative
        })
        .collect()
}

pub struct Math {}
impl Math {
    pub fn round_float_to_n_decimals(number: f64, decimals: i32) -> f64 {
        let multiplier = 10.0_f64.powi(decimals);
        (number * multiplier).round() / multiplier
    }

    /// # minimum of optional values
    /// the smallest present value, or `None` when every value is missing
    pub fn min_present<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values
            .into_iter()
            .flatten()
            .fold(None, |acc: Option<f64>, value| match acc {
                Some(current) if current <= value => Some(current),
                _ => Some(value),
            })
    }

    /// percentage of `numerator / denominator`, rounded to 2 decimals
    pub fn percentage(numerator: f64, denominator: f64) -> f64 {
        Math::round_float_to_n_decimals(numerator / denominator * 100.0, 2)
    }
}

/// Settlement amount in the target currency: `amount` converted at `rate`.
///
/// Pure multiplication; overflow and NaN propagate as IEEE-754 dictates.
///
/// # Examples
///
/// ```
/// use fx_hedge::core::settlement::settle;
///
/// assert_eq!(settle(1000.0, 1.5), 1500.0);
/// ```
pub fn settle(amount: f64, rate: f64) -> f64 {
    amount * rate
}

use std::collections::HashMap;

pub struct Math {}
impl Math {
    pub fn round_float_to_n_decimals(number: f64, decimals: i32) -> f64 {
        let multiplier = 10.0_f64.powi(decimals);
        (number * multiplier).round() / multiplier
    }

    /// mean of the given numbers, `None` when there are none
    pub fn mean(nums: &[f64]) -> Option<f64> {
        if nums.is_empty() {
            return None;
        }
        let sum: f64 = nums.iter().sum();
        Some(sum / nums.len() as f64)
    }

    /// sample standard deviation (n - 1 in the denominator).
    /// needs at least two numbers
    pub fn standard_deviation(nums: &[f64]) -> Option<f64> {
        if nums.len() < 2 {
            return None;
        }

        let mean = Math::mean(nums)?;
        let mut sum = 0.0;
        for num in nums {
            sum += (num - mean).powi(2);
        }

        Some((sum / (nums.len() - 1) as f64).sqrt())
    }

    pub fn min(nums: &[f64]) -> Option<f64> {
        nums.iter().copied().reduce(f64::min)
    }

    pub fn max(nums: &[f64]) -> Option<f64> {
        nums.iter().copied().reduce(f64::max)
    }

    /// most frequent value. on a tie the alphabetically first value wins
    pub fn mode<'a, I>(values: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
            .map(|(value, _)| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(Math::round_float_to_n_decimals(0.876, 2), 0.88);
        assert_eq!(Math::round_float_to_n_decimals(1.0, 2), 1.0);
    }

    #[test]
    fn standard_deviation_is_sample_based() {
        let std = Math::standard_deviation(&[90.0, 92.0]).unwrap();
        assert!((std - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(Math::standard_deviation(&[90.0]), None);
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(Math::mean(&[]), None);
        assert_eq!(Math::mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn mode_prefers_most_frequent_then_alphabetical() {
        assert_eq!(Math::mode(["Ducati", "KTM", "Ducati"]), Some("Ducati".to_string()));
        assert_eq!(Math::mode(["KTM", "Ducati"]), Some("Ducati".to_string()));
        assert_eq!(Math::mode(Vec::<&str>::new()), None);
    }
}

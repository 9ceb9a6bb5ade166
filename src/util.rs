use std::time::Instant;

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Average of millisecond samples, rounded to the nearest millisecond
pub fn mean_ms(samples: &[u64]) -> Option<u64> {
    let as_f64: Vec<f64> = samples.iter().map(|&ms| ms as f64).collect();
    mean(&as_f64).map(|m| m.round() as u64)
}

/// Milliseconds from `since` to `now`; zero if `now` is earlier
pub fn elapsed_ms(since: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(since).as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[-10.0, 0.0, 10.0]), Some(0.0));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_ms_rounds() {
        assert_eq!(mean_ms(&[1000, 2001]), Some(1501));
        assert_eq!(mean_ms(&[800]), Some(800));
        assert_eq!(mean_ms(&[]), None);
    }

    #[test]
    fn test_elapsed_ms() {
        let start = Instant::now();
        let later = start + Duration::from_millis(1250);
        assert_eq!(elapsed_ms(start, later), 1250);
        assert_eq!(elapsed_ms(later, start), 0);
    }
}

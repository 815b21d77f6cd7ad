//! Simulated runtime.
//!
//! Real tools take a while; scheduling bugs in a workflow engine often only show up when jobs
//! overlap. A configured [`DelayRange`] makes each emulation sleep a random number of minutes
//! first. The RNG is seeded from the configuration when a seed is given, so runs are repeatable.

use anyhow::{Context, Result};
use log::info;
use rand::prelude::*;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min_mins: f64,
    pub max_mins: f64,
}

impl FromStr for DelayRange {
    type Err = String;

    /// `MIN` or `MIN:MAX`, in (fractional) minutes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s.split_once(':').unwrap_or((s, s));
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|m| m.is_finite() && *m >= 0.0)
                .ok_or_else(|| format!("invalid delay {v:?}: expected a non-negative number of minutes"))
        };
        let (min_mins, max_mins) = (parse(min)?, parse(max)?);
        if min_mins > max_mins {
            return Err(format!("delay minimum {min_mins} exceeds maximum {max_mins}"));
        }
        Ok(DelayRange { min_mins, max_mins })
    }
}

impl DelayRange {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let mins = if self.min_mins == self.max_mins {
            self.min_mins
        } else {
            rng.gen_range(self.min_mins..=self.max_mins)
        };
        Duration::from_secs_f64(mins * 60.0)
    }
}

/// Sleep for a random duration drawn from `range`.
pub fn pause(range: DelayRange, seed: Option<u64>) -> Result<Duration> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(thread_rng()).context("Failed to initialize RNG")?,
    };
    let wait = range.sample(&mut rng);
    info!("Sleeping for {:.5} minutes", wait.as_secs_f64() / 60.0);
    thread::sleep(wait);
    Ok(wait)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_value_and_range() {
        assert_eq!("2".parse::<DelayRange>().unwrap(), DelayRange { min_mins: 2.0, max_mins: 2.0 });
        assert_eq!("0.5:1.5".parse::<DelayRange>().unwrap(), DelayRange { min_mins: 0.5, max_mins: 1.5 });
        assert!("3:1".parse::<DelayRange>().is_err());
        assert!("-1".parse::<DelayRange>().is_err());
        assert!("soon".parse::<DelayRange>().is_err());
    }

    #[test]
    fn seeded_samples_are_repeatable_and_in_range() {
        let range = DelayRange { min_mins: 1.0, max_mins: 2.0 };
        let a = range.sample(&mut StdRng::seed_from_u64(7));
        let b = range.sample(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a >= Duration::from_secs(60) && a <= Duration::from_secs(120));
    }

    #[test]
    fn zero_delay_returns_immediately() {
        let wait = pause(DelayRange { min_mins: 0.0, max_mins: 0.0 }, Some(1)).unwrap();
        assert_eq!(wait, Duration::ZERO);
    }
}

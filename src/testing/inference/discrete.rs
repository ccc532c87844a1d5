//! Hypergeometric connectivity test.
//!
//! The right tail is accumulated in log space: the first non-zero term comes from
//! `ln_binomial`, and each following term is obtained from its predecessor through
//! the ratio
//!
//! ```text
//! T(i + 1) / T(i) = (s - i)(k - i) / ((i + 1)(N - s - k + i + 1))
//! ```
//!
//! so no factorial or binomial coefficient is ever evaluated directly.

use crate::error::{DiamondError, Result};
use crate::testing::TestResult;
use statrs::function::factorial::ln_binomial;

/// Terms more than this many nats below the running maximum are negligible in f64.
const NEGLIGIBLE_LN_RATIO: f64 = -40.0;

/// Right-tail hypergeometric probability `P(X >= observed)`.
///
/// `X` counts successes among `draws` items drawn without replacement from a
/// population of `population` items, `successes` of which are successes:
///
/// ```text
/// P(X >= x) = sum_{i=x}^{min(k, s)} C(s, i) C(N - s, k - i) / C(N, k)
/// ```
///
/// Returns exactly `1.0` when `observed == 0`. Terms that are combinatorially
/// impossible contribute zero; when none remain the tail is `0.0`.
///
/// # Errors
///
/// [`DiamondError::NumericInstability`] if `successes` or `draws` exceed
/// `population`, or if the accumulated tail is not a finite number.
pub fn hypergeometric_tail(
    population: usize,
    successes: usize,
    draws: usize,
    observed: usize,
) -> Result<f64> {
    if observed == 0 {
        return Ok(1.0);
    }

    let unstable = || DiamondError::NumericInstability {
        population,
        successes,
        draws,
        observed,
    };

    if successes > population || draws > population {
        return Err(unstable());
    }

    let failures = population - successes;
    let upper = draws.min(successes);
    let lower = observed.max(draws.saturating_sub(failures));
    if lower > upper {
        return Ok(0.0);
    }

    let mut ln_term = ln_binomial(successes as u64, lower as u64)
        + ln_binomial(failures as u64, (draws - lower) as u64)
        - ln_binomial(population as u64, draws as u64);

    // Online log-sum-exp: the tail equals exp(ln_max) * acc.
    let mut ln_max = ln_term;
    let mut acc = 1.0_f64;

    for i in lower..upper {
        let numerator = ((successes - i) as f64) * ((draws - i) as f64);
        let denominator = ((i + 1) as f64) * ((failures + i + 1 - draws) as f64);
        let next = ln_term + (numerator / denominator).ln();

        if next > ln_max {
            acc = acc * (ln_max - next).exp() + 1.0;
            ln_max = next;
        } else {
            acc += (next - ln_max).exp();
            // Past the mode the terms only shrink.
            if next < ln_term && next - ln_max < NEGLIGIBLE_LN_RATIO {
                break;
            }
        }
        ln_term = next;
    }

    let p = (ln_max + acc.ln()).exp();
    if !p.is_finite() {
        return Err(unstable());
    }
    Ok(p.min(1.0))
}

/// Significance of a candidate's connectivity to a module.
///
/// * `n` - total number of nodes in the network
/// * `module_size` - current module size, seeds included
/// * `degree` - the candidate's degree in the full network
/// * `connectivity` - edges from the candidate into the module
///
/// Every module member counts as a single connection; seeds carry no extra weight.
pub fn connectivity_p_value(
    n: usize,
    module_size: usize,
    degree: usize,
    connectivity: usize,
) -> Result<f64> {
    hypergeometric_tail(n, module_size, degree, connectivity)
}

/// Hypergeometric enrichment test with the observed count as statistic and the fold
/// enrichment over the expected count as effect size.
pub fn hypergeometric_test(
    population: usize,
    successes: usize,
    draws: usize,
    observed: usize,
) -> Result<TestResult<f64>> {
    let p_value = hypergeometric_tail(population, successes, draws, observed)?;

    let expected = if population == 0 {
        0.0
    } else {
        draws as f64 * successes as f64 / population as f64
    };
    let fold_enrichment = if expected > 0.0 {
        observed as f64 / expected
    } else {
        0.0
    };

    Ok(
        TestResult::with_effect_size(observed as f64, p_value, fold_enrichment)
            .with_metadata("expected", expected)
            .with_metadata("population", population as f64)
            .with_metadata("successes", successes as f64)
            .with_metadata("draws", draws as f64),
    )
}

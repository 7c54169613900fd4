//! Distance metrics and the hyperplane bounds used to prune the search.
use serde::Deserialize;
use std::fmt;

#[derive(Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    SquaredEuclidean,
    Euclidean,
    Manhattan,
    Chebyshev,
    /// Any user distance. Pruning is only exact if it is monotone in the absolute difference of
    /// every coordinate; a principal-component tree additionally needs it to be rotation invariant
    /// (Euclidean-like). Neither property is checked.
    #[serde(skip)]
    Custom(fn(&[f64], &[f64]) -> f64),
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::SquaredEuclidean => write!(f, "SquaredEuclidean"),
            Metric::Euclidean => write!(f, "Euclidean"),
            Metric::Manhattan => write!(f, "Manhattan"),
            Metric::Chebyshev => write!(f, "Chebyshev"),
            Metric::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl Metric {
    /// Distance between `a1` and `a2`. Components are paired up to the shorter of the two.
    #[inline(always)]
    pub fn dist(&self, a1: &[f64], a2: &[f64]) -> f64 {
        match self {
            Metric::SquaredEuclidean => a1
                .iter()
                .zip(a2.iter())
                .fold(0f64, |acc, (x, y)| acc + (x - y) * (x - y)),

            Metric::Euclidean => a1
                .iter()
                .zip(a2.iter())
                .fold(0f64, |acc, (x, y)| acc + (x - y) * (x - y))
                .sqrt(),

            Metric::Manhattan => a1
                .iter()
                .zip(a2.iter())
                .fold(0f64, |acc, (x, y)| acc + (x - y).abs()),

            Metric::Chebyshev => a1
                .iter()
                .zip(a2.iter())
                .fold(0f64, |acc, (x, y)| acc.max((x - y).abs())),

            Metric::Custom(func) => func(a1, a2),
        }
    }

    /// Lower bound on the distance from `point` to anything on the other side of the
    /// hyperplane `x[axis] == value`.
    #[inline(always)]
    pub fn axis_bound(&self, point: &[f64], axis: usize, value: f64) -> f64 {
        let gap = (point[axis] - value).abs();
        match self {
            Metric::SquaredEuclidean => gap * gap,
            Metric::Euclidean | Metric::Manhattan | Metric::Chebyshev => gap,
            Metric::Custom(func) => {
                let mut foot = point.to_vec();
                foot[axis] = value;
                func(point, &foot)
            }
        }
    }

    /// Lower bound on the distance from `point` to anything on the other side of an oblique
    /// hyperplane with unit normal `normal`, where `offset` is the signed distance from `point`
    /// to that hyperplane along `normal`.
    #[inline(always)]
    pub fn plane_bound(&self, point: &[f64], normal: &[f64], offset: f64) -> f64 {
        let gap = offset.abs();
        match self {
            Metric::SquaredEuclidean => gap * gap,
            Metric::Euclidean => gap,
            // Hölder: |<n, x - p>| <= ||n||_inf * ||x - p||_1
            Metric::Manhattan => {
                let n_max = normal.iter().fold(0f64, |acc, x| acc.max(x.abs()));
                if n_max > 0. {
                    gap / n_max
                } else {
                    0.
                }
            }
            // Hölder: |<n, x - p>| <= ||n||_1 * ||x - p||_inf
            Metric::Chebyshev => {
                let n_sum = normal.iter().fold(0f64, |acc, x| acc + x.abs());
                if n_sum > 0. {
                    gap / n_sum
                } else {
                    0.
                }
            }
            Metric::Custom(func) => {
                let foot = point
                    .iter()
                    .zip(normal.iter())
                    .map(|(p, n)| p - offset * n)
                    .collect::<Vec<_>>();
                func(point, &foot)
            }
        }
    }
}

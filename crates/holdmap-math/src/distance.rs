//! Vector distance helpers.

/// Squared Euclidean distance. Extra components of the longer slice are ignored.
#[must_use]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Euclidean distance.
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// L2 norm.
#[must_use]
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Scales `v` to unit length in place. Zero vectors are left unchanged.
pub fn normalize_in_place(v: &mut [f64]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Component-wise mean of equal-length vectors, or `None` if `vectors` is empty.
#[must_use]
pub fn mean_vector<'a, I>(vectors: I, dimension: usize) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut sum = vec![0.0; dimension];
    let mut count = 0usize;
    for v in vectors {
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    sum.iter_mut().for_each(|s| *s /= n);
    Some(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean() {
        assert_relative_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_relative_eq!(squared_euclidean(&[1.0], &[3.0]), 4.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize_in_place(&mut v);
        assert_relative_eq!(l2_norm(&v), 1.0);

        let mut z = vec![0.0, 0.0];
        normalize_in_place(&mut z);
        assert_eq!(z, vec![0.0, 0.0]);
    }

    #[test]
    fn test_mean_vector() {
        let a = [1.0, 2.0];
        let b = [3.0, 6.0];
        let m = mean_vector([&a[..], &b[..]], 2).unwrap();
        assert_relative_eq!(m[0], 2.0);
        assert_relative_eq!(m[1], 4.0);
        assert!(mean_vector(std::iter::empty::<&[f64]>(), 2).is_none());
    }
}

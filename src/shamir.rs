use crate::config::SplitMode;
use crate::error::{Result, ShamirError};
use crate::finite_field::{FiniteField, eval_polynomial, lagrange_basis};
use rand_core::RngCore;
use rayon::prelude::*;

/// Smallest threshold that still hides the secret from a single share
pub const MIN_THRESHOLD: usize = 2;
/// Largest number of shares (indices are 1..=255)
pub const MAX_SHARES: usize = 255;
/// Largest secret that fits the 16-bit envelope length field
pub const MAX_SECRET_LEN: usize = u16::MAX as usize;

/// A raw share in Shamir's Secret Sharing scheme
///
/// `data[i]` is the value of the polynomial for secret byte `i` evaluated at
/// `x = index`. A raw share carries no authentication; see
/// [`Envelope`](crate::Envelope) for the wrapped form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// Index of the share (x-coordinate in the polynomial)
    pub index: u8,
    /// The share data (y-coordinates for each byte of the secret)
    pub data: Vec<u8>,
}

/// Checks threshold and share count bounds
pub(crate) fn validate_share_parameters(threshold: usize, total_shares: usize) -> Result<()> {
    if !(MIN_THRESHOLD..=MAX_SHARES).contains(&threshold) {
        return Err(ShamirError::InvalidThreshold(threshold));
    }
    if total_shares > MAX_SHARES {
        return Err(ShamirError::InvalidShareCount(total_shares));
    }
    if threshold > total_shares {
        return Err(ShamirError::ThresholdTooLarge {
            threshold,
            total_shares,
        });
    }
    Ok(())
}

/// Checks split parameters
///
/// Threshold and count are checked before the secret length so that the
/// error names the first offending constraint.
pub(crate) fn validate_split_parameters(
    secret_len: usize,
    threshold: usize,
    total_shares: usize,
) -> Result<()> {
    validate_share_parameters(threshold, total_shares)?;
    if secret_len == 0 || secret_len > MAX_SECRET_LEN {
        return Err(ShamirError::InvalidSecretLength(secret_len));
    }
    Ok(())
}

/// Splits a secret into `total_shares` raw shares
///
/// One polynomial of degree `threshold - 1` is built per secret byte with the
/// byte as constant term. The `threshold - 1` random coefficients for every
/// byte are drawn from `rng` in one pass, row-major by byte position, so a
/// deterministic `rng` yields deterministic shares regardless of `mode`.
///
/// Shares are returned ordered by index, starting at 1.
///
/// # Example
/// ```
/// use shamir_vault::{CoefficientStream, SplitMode, split, reconstruct};
///
/// let mut rng = CoefficientStream::from_secret(b"secret");
/// let shares = split(b"secret", 2, 3, &mut rng, SplitMode::Sequential).unwrap();
/// assert_eq!(shares.len(), 3);
/// assert_eq!(reconstruct(&shares[1..], SplitMode::Sequential).unwrap(), b"secret");
/// ```
pub fn split<R: RngCore + ?Sized>(
    secret: &[u8],
    threshold: usize,
    total_shares: usize,
    rng: &mut R,
    mode: SplitMode,
) -> Result<Vec<Share>> {
    validate_split_parameters(secret.len(), threshold, total_shares)?;

    let degree = threshold - 1;

    // coefficients[idx * threshold] is the secret byte, followed by its random terms
    let mut random_data = vec![0u8; secret.len() * degree];
    rng.fill_bytes(&mut random_data);
    let coefficients: Vec<FiniteField> = secret
        .iter()
        .zip(random_data.chunks_exact(degree))
        .flat_map(|(&byte, random)| {
            std::iter::once(byte)
                .chain(random.iter().copied())
                .map(FiniteField::new)
        })
        .collect();

    let evaluate = |index: u8| {
        let x = FiniteField::new(index);
        let data = coefficients
            .chunks_exact(threshold)
            .map(|poly| eval_polynomial(poly, x).0)
            .collect();
        Share { index, data }
    };

    let indices = 1..=total_shares as u8;
    let shares = match mode {
        SplitMode::Sequential => indices.map(evaluate).collect(),
        SplitMode::Parallel => indices.into_par_iter().map(evaluate).collect(),
    };

    Ok(shares)
}

/// Computes the Lagrange weight of every share at x = 0
///
/// Weights depend only on the set of indices, so they are computed once per
/// reconstruction rather than once per byte.
fn compute_lagrange_coefficients(shares: &[Share]) -> Result<Vec<FiniteField>> {
    let xs: Vec<FiniteField> = shares
        .iter()
        .map(|share| FiniteField::new(share.index))
        .collect();

    let mut seen = [false; 256];
    for share in shares {
        if share.index == 0 {
            return Err(ShamirError::InvalidShareIndex(share.index));
        }
        if std::mem::replace(&mut seen[share.index as usize], true) {
            return Err(ShamirError::DuplicateShareIndex(share.index));
        }
    }

    // Indices are nonzero and distinct, so every denominator is invertible
    Ok((0..xs.len())
        .map(|i| lagrange_basis(i, &xs).expect("distinct nonzero share indices"))
        .collect())
}

/// Reconstructs the secret from raw shares using Lagrange interpolation
///
/// Any number of shares at or above the original threshold recovers the
/// secret. Interpolation cannot tell whether enough genuine points were
/// supplied: too few shares, or shares of different secrets, still produce a
/// value. Callers that need that guarantee authenticate the result, as
/// [`recover`](crate::recover) does.
///
/// # Errors
/// Returns `ShamirError` if:
/// - fewer than two shares are provided
/// - shares have inconsistent lengths
/// - an index is zero or appears twice
pub fn reconstruct(shares: &[Share], mode: SplitMode) -> Result<Vec<u8>> {
    if shares.len() < MIN_THRESHOLD {
        return Err(ShamirError::InsufficientShares {
            needed: MIN_THRESHOLD,
            got: shares.len(),
        });
    }

    let secret_len = shares[0].data.len();
    if !shares.iter().all(|s| s.data.len() == secret_len) {
        return Err(ShamirError::InconsistentShareLength);
    }

    let lagrange_coefficients = compute_lagrange_coefficients(shares)?;

    let interpolate = |byte_idx: usize| {
        shares
            .iter()
            .zip(&lagrange_coefficients)
            .fold(FiniteField::ZERO, |acc, (share, &coeff)| {
                acc + coeff * FiniteField::new(share.data[byte_idx])
            })
            .0
    };

    let reconstructed = match mode {
        SplitMode::Sequential => (0..secret_len).map(interpolate).collect(),
        SplitMode::Parallel => (0..secret_len).into_par_iter().map(interpolate).collect(),
    };

    Ok(reconstructed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::CoefficientStream;

    fn split_seq(secret: &[u8], threshold: usize, total: usize) -> Vec<Share> {
        let mut rng = CoefficientStream::from_secret(secret);
        split(secret, threshold, total, &mut rng, SplitMode::Sequential).unwrap()
    }

    #[test]
    fn test_split_and_reconstruct() {
        let secret = b"Hello, World!";
        let shares = split_seq(secret, 3, 5);
        assert_eq!(shares.len(), 5);
        assert!(shares.iter().all(|s| s.data.len() == secret.len()));

        // Reconstruct with exactly threshold shares
        let reconstructed = reconstruct(&shares[0..3], SplitMode::Sequential).unwrap();
        assert_eq!(&reconstructed, secret);

        // Reconstruct with more than threshold shares
        let reconstructed = reconstruct(&shares[1..5], SplitMode::Sequential).unwrap();
        assert_eq!(&reconstructed, secret);
    }

    #[test]
    fn test_share_indices_are_sequential() {
        let shares = split_seq(b"indices", 2, 6);
        let indices: Vec<u8> = shares.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_coefficients_drawn_row_major() {
        let secret = [0x10, 0x20];
        let threshold = 3;
        let shares = split_seq(&secret, threshold, 4);

        let mut rng = CoefficientStream::from_secret(&secret);
        let mut random = [0u8; 4];
        rng.fill_bytes(&mut random);
        let polys = [
            [secret[0], random[0], random[1]].map(FiniteField::new),
            [secret[1], random[2], random[3]].map(FiniteField::new),
        ];

        for share in &shares {
            let x = FiniteField::new(share.index);
            let expected: Vec<u8> = polys.iter().map(|p| eval_polynomial(p, x).0).collect();
            assert_eq!(share.data, expected);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let secret: Vec<u8> = (0..1000).map(|i| (i * 7 % 256) as u8).collect();
        let mut rng = CoefficientStream::from_secret(&secret);
        let sequential = split(&secret, 4, 9, &mut rng, SplitMode::Sequential).unwrap();
        let mut rng = CoefficientStream::from_secret(&secret);
        let parallel = split(&secret, 4, 9, &mut rng, SplitMode::Parallel).unwrap();
        assert_eq!(sequential, parallel);

        let reconstructed = reconstruct(&parallel[2..6], SplitMode::Parallel).unwrap();
        assert_eq!(reconstructed, secret);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut rng = CoefficientStream::new([0u8; 32]);
        let mode = SplitMode::Sequential;
        assert!(matches!(
            split(b"s", 1, 3, &mut rng, mode),
            Err(ShamirError::InvalidThreshold(1))
        ));
        assert!(matches!(
            split(b"s", 256, 256, &mut rng, mode),
            Err(ShamirError::InvalidThreshold(256))
        ));
        assert!(matches!(
            split(b"s", 3, 256, &mut rng, mode),
            Err(ShamirError::InvalidShareCount(256))
        ));
        assert!(matches!(
            split(b"s", 4, 3, &mut rng, mode),
            Err(ShamirError::ThresholdTooLarge { .. })
        ));
        assert!(matches!(
            split(b"", 2, 3, &mut rng, mode),
            Err(ShamirError::InvalidSecretLength(0))
        ));
        let too_long = vec![0u8; MAX_SECRET_LEN + 1];
        assert!(matches!(
            split(&too_long, 2, 3, &mut rng, mode),
            Err(ShamirError::InvalidSecretLength(_))
        ));
    }

    #[test]
    fn test_insufficient_shares() {
        let shares = split_seq(b"Test", 3, 5);
        assert!(matches!(
            reconstruct(&shares[0..1], SplitMode::Sequential),
            Err(ShamirError::InsufficientShares { needed: 2, got: 1 })
        ));

        // Two shares of a threshold-3 secret interpolate to a wrong value without error
        let wrong = reconstruct(&shares[0..2], SplitMode::Sequential).unwrap();
        assert_ne!(wrong, b"Test");
    }

    #[test]
    fn test_different_share_combinations() {
        let secret = b"Different combinations test";
        let shares = split_seq(secret, 3, 5);

        let combinations = vec![vec![0, 1, 2], vec![1, 2, 3], vec![2, 3, 4], vec![0, 2, 4]];

        for combo in combinations {
            let selected_shares: Vec<Share> = combo.iter().map(|&i| shares[i].clone()).collect();

            let reconstructed = reconstruct(&selected_shares, SplitMode::Sequential).unwrap();
            assert_eq!(&reconstructed, secret);
        }
    }

    #[test]
    fn test_max_shares() {
        let secret = b"Maximum shares test";
        let shares = split_seq(secret, 128, 255);
        assert_eq!(shares.len(), 255);

        let reconstructed = reconstruct(&shares[127..255], SplitMode::Sequential).unwrap();
        assert_eq!(reconstructed, secret);
    }

    #[test]
    fn test_duplicate_share_indices() {
        let shares = split_seq(b"test", 3, 5);

        let mut corrupted_shares = shares[0..3].to_vec();
        corrupted_shares[1].index = corrupted_shares[0].index;

        assert!(matches!(
            reconstruct(&corrupted_shares, SplitMode::Sequential),
            Err(ShamirError::DuplicateShareIndex(1))
        ));
    }

    #[test]
    fn test_zero_share_index() {
        let shares = split_seq(b"test", 2, 3);

        let mut corrupted_shares = shares[0..2].to_vec();
        corrupted_shares[0].index = 0;

        assert!(matches!(
            reconstruct(&corrupted_shares, SplitMode::Sequential),
            Err(ShamirError::InvalidShareIndex(0))
        ));
    }

    #[test]
    fn test_inconsistent_lengths() {
        let mut shares = split_seq(b"test", 2, 3);
        shares[1].data.pop();

        assert!(matches!(
            reconstruct(&shares, SplitMode::Sequential),
            Err(ShamirError::InconsistentShareLength)
        ));
    }
}

use once_cell::sync::Lazy;
use std::ops::{Add, Mul, Sub};

/// Reduction polynomial x⁸ + x⁴ + x³ + x² + 1
const REDUCTION_POLYNOMIAL: u16 = 0x11D;

/// Number of non-zero field elements, i.e. the order of the generator
const ORDER: usize = 255;

/// Discrete log / exponent tables for generator 2
///
/// `exp` stores the cycle twice so that `log[a] + log[b]` (at most 508) can
/// index it without a modulo.
struct Tables {
    exp: [u8; ORDER * 2],
    log: [u8; 256],
}

impl Tables {
    fn build() -> Self {
        let mut exp = [0u8; ORDER * 2];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..ORDER {
            exp[i] = x as u8;
            exp[i + ORDER] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= REDUCTION_POLYNOMIAL;
            }
        }
        // log[0] stays 0; zero operands never reach a table lookup
        Self { exp, log }
    }
}

static TABLES: Lazy<Tables> = Lazy::new(Tables::build);

/// Galois Field (GF(256)) arithmetic implementation
///
/// Represents elements in GF(2⁸) using irreducible polynomial
/// x⁸ + x⁴ + x³ + x² + 1 (0x11D) with generator 2. Multiplication and
/// division go through log/exp tables built once per process.
///
/// # Example
/// ```
/// use shamir_vault::FiniteField;
///
/// let a = FiniteField::new(0x53);
/// let b = FiniteField::new(0xCA);
/// let sum = a + b;  // XOR operation
/// let product = a * b;  // Table multiplication
/// assert_eq!(sum, FiniteField::new(0x99));
/// assert_eq!(product, FiniteField::new(0x8F));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FiniteField(pub u8);

impl FiniteField {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Creates a new finite field element
    #[inline]
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    /// Performs multiplication in GF(256)
    ///
    /// # Example
    /// ```
    /// use shamir_vault::FiniteField;
    ///
    /// // 2 * 0x80 overflows into the reduction polynomial
    /// assert_eq!(FiniteField::new(0x02).multiply(FiniteField::new(0x80)), FiniteField::new(0x1D));
    /// ```
    #[inline]
    pub fn multiply(self, other: Self) -> Self {
        if self.0 == 0 || other.0 == 0 {
            return Self::ZERO;
        }
        let tables = &*TABLES;
        let sum = tables.log[self.0 as usize] as usize + tables.log[other.0 as usize] as usize;
        Self(tables.exp[sum])
    }

    /// Divides `self` by `other`
    ///
    /// Returns `None` when `other` is zero.
    #[inline]
    pub fn div(self, other: Self) -> Option<Self> {
        if other.0 == 0 {
            return None;
        }
        if self.0 == 0 {
            return Some(Self::ZERO);
        }
        let tables = &*TABLES;
        let diff = (tables.log[self.0 as usize] as usize + ORDER
            - tables.log[other.0 as usize] as usize)
            % ORDER;
        Some(Self(tables.exp[diff]))
    }

    /// Computes the multiplicative inverse
    ///
    /// Returns None for zero (which has no inverse)
    ///
    /// # Example
    /// ```
    /// use shamir_vault::FiniteField;
    ///
    /// let a = FiniteField::new(0x53);
    /// let inv = a.inverse().unwrap();
    /// assert_eq!(a * inv, FiniteField::new(0x01));
    /// ```
    #[inline]
    pub fn inverse(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        let tables = &*TABLES;
        Some(Self(tables.exp[ORDER - tables.log[self.0 as usize] as usize]))
    }

    /// Computes exponentiation in GF(256) using square-and-multiply
    #[inline]
    pub fn pow(self, mut exp: u32) -> Self {
        let mut result = Self::ONE;
        let mut base = self;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }
        result
    }
}

/// Evaluates a polynomial at `x` using Horner's method
///
/// `coefficients[0]` is the constant term.
///
/// # Example
/// ```
/// use shamir_vault::{FiniteField, eval_polynomial};
///
/// let poly = [FiniteField::new(42), FiniteField::new(7)];
/// assert_eq!(eval_polynomial(&poly, FiniteField::new(0)), FiniteField::new(42));
/// ```
pub fn eval_polynomial(coefficients: &[FiniteField], x: FiniteField) -> FiniteField {
    coefficients
        .iter()
        .rev()
        .fold(FiniteField::ZERO, |acc, &coeff| acc * x + coeff)
}

/// Lagrange basis weight of `indices[i]` evaluated at x = 0
///
/// Computes ∏_{j≠i} x_j / (x_i ⊕ x_j). Returns `None` if `i` is out of range
/// or `indices[i]` appears more than once. Collisions between other indices
/// do not touch the denominator and go unnoticed; callers interpolating a
/// full point set must reject duplicates first.
pub fn lagrange_basis(i: usize, indices: &[FiniteField]) -> Option<FiniteField> {
    let x_i = *indices.get(i)?;
    let (numerator, denominator) = indices
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .fold((FiniteField::ONE, FiniteField::ONE), |(num, den), (_, &x_j)| {
            (num * x_j, den * (x_i - x_j))
        });
    numerator.div(denominator)
}

/// Implements addition as XOR in GF(2⁸)
impl Add for FiniteField {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        #[allow(clippy::suspicious_arithmetic_impl)]
        let result = self.0 ^ other.0;
        Self(result)
    }
}

impl Mul for FiniteField {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        self.multiply(other)
    }
}

impl Sub for FiniteField {
    type Output = Self;

    // Characteristic 2: subtraction is addition
    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, other: Self) -> Self {
        self + other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addition() {
        let a = FiniteField::new(0x53);
        let b = FiniteField::new(0xCA);
        assert_eq!((a + b).0, 0x99);
        assert_eq!(a - b, a + b);
    }

    #[test]
    fn test_subtraction() {
        for v in 0..=255u8 {
            let x = FiniteField::new(v);
            assert_eq!(x - x, FiniteField::ZERO);
            assert_eq!(x - FiniteField::ZERO, x);
            assert_eq!((x - FiniteField::ONE).0, v ^ 1);
        }
    }

    #[test]
    fn test_multiplication() {
        let a = FiniteField::new(0x53);
        let b = FiniteField::new(0xCA);
        assert_eq!((a * b).0, 0x8F);
        assert_eq!((FiniteField::new(0x12) * FiniteField::new(0x34)).0, 0x0F);
        assert_eq!((FiniteField::new(0x02) * FiniteField::new(0x80)).0, 0x1D);
    }

    #[test]
    fn test_multiplication_by_zero() {
        for i in 0..=255 {
            assert_eq!(FiniteField::new(i) * FiniteField::ZERO, FiniteField::ZERO);
            assert_eq!(FiniteField::ZERO * FiniteField::new(i), FiniteField::ZERO);
        }
    }

    #[test]
    fn test_tables_cycle() {
        let tables = &*TABLES;
        assert_eq!(tables.exp[0], 1);
        assert_eq!(tables.exp[8], 0x1D);
        assert_eq!(tables.log[0x1D], 8);
        assert_eq!(tables.log[0], 0);
        for i in 0..ORDER {
            assert_eq!(tables.exp[i], tables.exp[i + ORDER]);
        }
    }

    #[test]
    fn test_generator_covers_field() {
        let mut seen = [false; 256];
        for &value in &TABLES.exp[..ORDER] {
            assert!(!seen[value as usize], "generator cycle repeats {value:#04x}");
            seen[value as usize] = true;
        }
        assert!(!seen[0]);
    }

    #[test]
    fn test_matches_bitwise_multiplication() {
        fn slow_mul(mut a: u8, mut b: u8) -> u8 {
            let mut p = 0u8;
            while b != 0 {
                if b & 1 != 0 {
                    p ^= a;
                }
                let carry = a & 0x80;
                a <<= 1;
                if carry != 0 {
                    a ^= (REDUCTION_POLYNOMIAL & 0xFF) as u8;
                }
                b >>= 1;
            }
            p
        }

        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!((FiniteField::new(a) * FiniteField::new(b)).0, slow_mul(a, b));
            }
        }
    }

    #[test]
    fn test_inverse() {
        let a = FiniteField::new(0x53);
        let inv = a.inverse().unwrap();
        assert_eq!((a * inv).0, 0x01);
    }

    #[test]
    fn test_zero_inverse() {
        assert_eq!(FiniteField::ZERO.inverse(), None);
    }

    #[test]
    fn test_all_inverses() {
        for i in 1..=255 {
            let a = FiniteField::new(i);
            let inv = a.inverse().unwrap();
            assert_eq!((a * inv).0, 0x01);
        }
    }

    #[test]
    fn test_specific_inverses() {
        let test_values = [(0x02, 0x8E), (0x03, 0xF4), (0x53, 0x8C), (0x80, 0x1B), (0xFF, 0xFD)];

        for &(a, expected_inv) in &test_values {
            let field_a = FiniteField::new(a);
            let inv = field_a.inverse().unwrap();
            assert_eq!(inv.0, expected_inv, "Inverse mismatch for 0x{:02X}", a);
        }
    }

    #[test]
    fn test_division() {
        let a = FiniteField::new(0x53);
        let b = FiniteField::new(0xCA);
        assert_eq!(a.div(b), Some(FiniteField::new(0x6D)));
        assert_eq!(FiniteField::ZERO.div(b), Some(FiniteField::ZERO));
        assert_eq!(a.div(FiniteField::ZERO), None);

        for x in 1..=255 {
            for y in 1..=255 {
                let (x, y) = (FiniteField::new(x), FiniteField::new(y));
                assert_eq!(x.div(y).unwrap() * y, x);
            }
        }
    }

    #[test]
    fn test_pow() {
        let base = FiniteField::new(0x03);
        assert_eq!(base.pow(3), base * base * base);
        assert_eq!(base.pow(5).0, 0x33);
        assert_eq!(base.pow(0), FiniteField::ONE);
        assert_eq!(FiniteField::new(0x02).pow(255), FiniteField::ONE);
    }

    #[test]
    fn test_multiplication_associativity() {
        let a = FiniteField::new(0x53);
        let b = FiniteField::new(0xCA);
        let c = FiniteField::new(0x7B);
        assert_eq!((a * b) * c, a * (b * c));
    }

    #[test]
    fn test_distributivity() {
        let a = FiniteField::new(0x12);
        let b = FiniteField::new(0x34);
        let c = FiniteField::new(0x56);
        assert_eq!(a * (b + c), (a * b) + (a * c));
    }

    #[test]
    fn test_eval_polynomial() {
        let poly = [1, 2, 3].map(FiniteField::new);
        assert_eq!(eval_polynomial(&poly, FiniteField::new(4)).0, 0x39);
        assert_eq!(eval_polynomial(&poly, FiniteField::ZERO).0, 1);
        assert_eq!(eval_polynomial(&[], FiniteField::new(9)), FiniteField::ZERO);
    }

    #[test]
    fn test_lagrange_basis() {
        let indices = [1, 3, 5].map(FiniteField::new);
        let weights: Vec<u8> = (0..3)
            .map(|i| lagrange_basis(i, &indices).unwrap().0)
            .collect();
        assert_eq!(weights, vec![0x65, 0xC9, 0xAD]);

        // Weights of any point set sum to one (interpolating the constant 1)
        let total = weights
            .iter()
            .fold(FiniteField::ZERO, |acc, &w| acc + FiniteField::new(w));
        assert_eq!(total, FiniteField::ONE);
    }

    #[test]
    fn test_lagrange_basis_duplicate_index() {
        let indices = [1, 2, 2].map(FiniteField::new);
        assert_eq!(lagrange_basis(1, &indices), None);
        assert_eq!(lagrange_basis(2, &indices), None);
        assert_eq!(lagrange_basis(3, &indices), None);

        // Only the weight's own index enters the denominator
        assert!(lagrange_basis(0, &indices).is_some());
    }

    #[test]
    fn test_concurrent_first_use() {
        let handles: Vec<_> = (0..8u8)
            .map(|t| {
                std::thread::spawn(move || {
                    (1..=255u8)
                        .map(|i| (FiniteField::new(i) * FiniteField::new(t + 1)).0 as u32)
                        .sum::<u32>()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap() > 0);
        }
    }
}

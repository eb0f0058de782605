//! Table-driven arithmetic in the binary extension field \(GF(2^k)\), \(2 \le k \le 8\).
//!
//! Elements are `u8` values whose bits are the coefficients of a polynomial over GF(2).
//! Addition is XOR. Multiplication and division go through exponent / discrete-log
//! tables built from a fixed primitive polynomial, so both are O(1) additions modulo
//! \(2^k - 1\).

use rand::Rng;

use crate::error::{Error, InvariantViolation, Result};

// ============================================================================
// Constants
// ============================================================================

/// Smallest supported field degree.
pub const MIN_DEGREE: u32 = 2;

/// Largest supported field degree (elements must fit in a `u8`).
pub const MAX_DEGREE: u32 = 8;

/// Primitive polynomials over GF(2), indexed by `k - 2`.
///
/// Bit `i` is the coefficient of \(x^i\). Each polynomial is primitive, so \(x\)
/// generates the whole multiplicative group.
pub const PRIMITIVE_POLYS: [u16; 7] = [
    0b111,         // x^2 + x + 1
    0b1011,        // x^3 + x + 1
    0b1_0011,      // x^4 + x + 1
    0b10_0101,     // x^5 + x^2 + 1
    0b100_0011,    // x^6 + x + 1
    0b1000_0011,   // x^7 + x + 1
    0b1_0001_1101, // x^8 + x^4 + x^3 + x^2 + 1
];

/// Sentinel stored at `log[0]`; the logarithm of zero is never taken.
const LOG_UNDEFINED: u16 = u16::MAX;

// ============================================================================
// GaloisField
// ============================================================================

/// Exponent and discrete-log tables for \(GF(2^k)\).
///
/// `pow[i]` is \(x^i\) for `i` in `0..2^k - 1`; `pow[2^k - 1]` wraps back to `1`.
/// `log[a]` is the exponent with `pow[log[a]] == a` for every non-zero `a`.
#[derive(Clone, Debug)]
pub struct GaloisField {
    k: u32,
    /// Number of non-zero elements, \(2^k - 1\).
    group_order: usize,
    pow: [u8; 256],
    log: [u16; 256],
}

impl GaloisField {
    /// Builds the tables for \(GF(2^k)\).
    ///
    /// # Errors
    /// Returns [`Error::InvalidFieldDegree`] if `k` is outside `[2, 8]`.
    pub fn new(k: u32) -> Result<Self> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&k) {
            return Err(Error::InvalidFieldDegree { k });
        }

        let poly = PRIMITIVE_POLYS[(k - MIN_DEGREE) as usize];
        let order = 1usize << k;
        let mut pow = [0u8; 256];
        let mut log = [LOG_UNDEFINED; 256];

        pow[0] = 1;
        log[1] = 0;
        for i in 1..order - 1 {
            let mut x = u16::from(pow[i - 1]) << 1;
            if x & (1 << k) != 0 {
                x ^= poly;
            }
            pow[i] = x as u8;
            log[x as usize] = i as u16;
        }
        pow[order - 1] = 1;

        Ok(Self {
            k,
            group_order: order - 1,
            pow,
            log,
        })
    }

    /// Picks the smallest degree `k` with \(2^k > c \cdot n\) and builds that field.
    ///
    /// # Errors
    /// Returns [`Error::FieldTooSmall`] if no supported degree is large enough.
    pub fn for_vertex_count(n: usize, factor: usize) -> Result<Self> {
        let k = degree_for(n, factor).ok_or(Error::FieldTooSmall { n, factor })?;
        Self::new(k)
    }

    /// Field degree `k`.
    #[inline(always)]
    pub fn degree(&self) -> u32 {
        self.k
    }

    /// Number of field elements, \(2^k\).
    #[inline(always)]
    pub fn order(&self) -> usize {
        self.group_order + 1
    }

    /// Exponent table `pow[0..2^k - 1]` (without the wrap entry).
    pub fn pow_table(&self) -> &[u8] {
        &self.pow[..self.group_order]
    }

    /// Discrete logarithm of a non-zero element, or `None` for zero.
    pub fn log(&self, a: u8) -> Option<usize> {
        match self.log[a as usize] {
            LOG_UNDEFINED => None,
            e => Some(e as usize),
        }
    }

    /// Field addition (and subtraction): XOR.
    #[inline(always)]
    pub fn add(a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// Field multiplication.
    #[inline(always)]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        debug_assert!((a as usize) < self.order() && (b as usize) < self.order());
        let mut r = self.log[a as usize] as usize + self.log[b as usize] as usize;
        if r >= self.group_order {
            r -= self.group_order;
        }
        self.pow[r]
    }

    /// Field division `a / b`.
    ///
    /// # Errors
    /// Returns [`InvariantViolation::DivisionByZero`] when `b == 0`.
    #[inline(always)]
    pub fn div(&self, a: u8, b: u8) -> Result<u8> {
        if b == 0 {
            return Err(Error::Invariant(InvariantViolation::DivisionByZero));
        }
        if a == 0 {
            return Ok(0);
        }
        debug_assert!((a as usize) < self.order() && (b as usize) < self.order());
        let la = self.log[a as usize] as usize;
        let lb = self.log[b as usize] as usize;
        let r = if la >= lb {
            la - lb
        } else {
            la + self.group_order - lb
        };
        Ok(self.pow[r])
    }

    /// Draws uniformly from `[0, 2^k)` by rejection until the value is not in `excluded`.
    ///
    /// `excluded` must leave at least one element available.
    pub fn random_excluding<R: Rng + ?Sized>(&self, rng: &mut R, excluded: &[u8]) -> u8 {
        debug_assert!(excluded.len() < self.order());
        loop {
            let r = rng.random_range(0..self.order()) as u8;
            if !excluded.contains(&r) {
                return r;
            }
        }
    }

    /// Draws a uniformly random non-zero element.
    #[inline]
    pub fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        self.random_excluding(rng, &[0])
    }
}

/// Smallest `k` in `[2, 8]` with \(2^k > c \cdot n\), if one exists.
pub fn degree_for(n: usize, factor: usize) -> Option<u32> {
    let bound = n.checked_mul(factor)?;
    (MIN_DEGREE..=MAX_DEGREE).find(|&k| (1usize << k) > bound)
}

// ============================================================================
// Tests
// ============================================================================

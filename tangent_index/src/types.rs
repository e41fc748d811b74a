// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 3D.
///
/// Planar (2D) inputs use a zero-extent `z` range; such boxes still intersect
/// each other along `z`, so they behave exactly like 2D boxes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<T> {
    /// Minimum corner.
    pub min: [T; 3],
    /// Maximum corner.
    pub max: [T; 3],
}

impl<T> Aabb<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min: [T; 3], max: [T; 3]) -> Self {
        Self { min, max }
    }
}

impl<T: Copy + PartialOrd> Aabb<T> {
    /// A degenerate box containing exactly one point.
    pub const fn from_point(p: [T; 3]) -> Self {
        Self { min: p, max: p }
    }

    /// Whether this AABB contains the point.
    pub fn contains_point(&self, p: [T; 3]) -> bool {
        (0..3).all(|a| le(self.min[a], p[a]) && le(p[a], self.max[a]))
    }

    /// Whether the two closed boxes share at least one point on every axis.
    ///
    /// Touching boxes (`self.max == other.min` on some axis) intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|a| le(self.min[a], other.max[a]) && le(other.min[a], self.max[a]))
    }

    /// The smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    /// Grow this box to also contain `p`.
    pub fn expand_to_point(&mut self, p: [T; 3]) {
        for a in 0..3 {
            self.min[a] = min_t(self.min[a], p[a]);
            self.max[a] = max_t(self.max[a], p[a]);
        }
    }

    /// Return true if the AABB is inverted on any axis. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        (0..3).any(|a| lt(self.max[a], self.min[a]))
    }
}

impl<T: Scalar> Aabb<T> {
    /// Pad every face of the box outward by `radius`.
    pub fn inflated(&self, radius: T) -> Self {
        let mut out = *self;
        for a in 0..3 {
            out.min[a] = T::sub(self.min[a], radius);
            out.max[a] = T::add(self.max[a], radius);
        }
        out
    }

    /// Side length along `axis`, clamped at zero.
    #[inline]
    pub fn extent(&self, axis: usize) -> T {
        T::max_zero(T::sub(self.max[axis], self.min[axis]))
    }

    /// Midpoint along `axis`.
    #[inline]
    pub fn center(&self, axis: usize) -> T {
        T::mid(self.min[axis], self.max[axis])
    }
}

/// Numeric scalar abstraction for AABBs used by backends.
///
/// This trait provides a minimal set of operations required for SAH metrics,
/// centroid computations and grid binning, and an associated widened accumulator
/// type for surface areas (f32→f64).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b (used for centroid ordering).
    fn mid(a: Self, b: Self) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for SAH weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;

    /// Convert to `f64` for grid cell arithmetic.
    fn to_f64(v: Self) -> f64;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as f64
    }

    #[inline]
    fn to_f64(v: Self) -> f64 {
        v as f64
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as Self::Acc
    }

    #[inline]
    fn to_f64(v: Self) -> f64 {
        v
    }
}

/// Half the surface area of an AABB (`wh + hd + dw`) in the widened accumulator type.
#[inline]
pub fn half_area<T: Scalar>(a: &Aabb<T>) -> T::Acc {
    let w = T::widen(a.extent(0));
    let h = T::widen(a.extent(1));
    let d = T::widen(a.extent(2));
    w * h + h * d + d * w
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

/// Inflate every box by `radius`, returning a fresh vector.
pub(crate) fn inflate_all<T: Scalar>(boxes: &[Aabb<T>], radius: T) -> Vec<Aabb<T>> {
    debug_assert!(
        le(T::zero(), radius),
        "inflation radius must be non-negative, got {radius:?}"
    );
    boxes.iter().map(|b| b.inflated(radius)).collect()
}

/// Sort overlap pairs so every backend reports them in the same order.
pub(crate) fn sort_pairs(pairs: &mut [(usize, usize)]) {
    pairs.sort_unstable();
}

pub(crate) fn cmp_t<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb<T>, b: Aabb<T>) -> Aabb<T> {
    let mut out = a;
    for axis in 0..3 {
        out.min[axis] = min_t(a.min[axis], b.min[axis]);
        out.max[axis] = max_t(a.max[axis], b.max[axis]);
    }
    out
}

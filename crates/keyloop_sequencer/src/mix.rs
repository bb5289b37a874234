// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pairwise value blending.
//!
//! Every blendable type declares a [`BlendCategory`]. [`mix`] is the single
//! entry point for all of them: the endpoints are pinned exactly, then the
//! category decides between a linear blend and a hard switch at the midpoint.

use serde::{Deserialize, Serialize};

/// How a value type behaves between two keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendCategory {
    /// Has intermediate values (numbers, numeric vectors)
    Continuous,
    /// Has no intermediate value (booleans, text, enumerations)
    Discrete,
}

/// A value that can be blended with another value of the same type
pub trait Mix: Clone {
    /// Blend category of this type
    const CATEGORY: BlendCategory;

    /// Linear blend toward `other`.
    ///
    /// Only called for continuous types, with `t` strictly inside `(0, 1)`.
    /// Discrete types keep the default, which switches at the midpoint.
    fn lerp(&self, other: &Self, t: f32) -> Self {
        switch(self, other, t)
    }
}

fn switch<T: Clone>(a: &T, b: &T, t: f32) -> T {
    if t < 0.5 {
        a.clone()
    } else {
        b.clone()
    }
}

/// Blend `a` toward `b` by the factor `t`.
///
/// `t <= 0` (or NaN) returns `a` and `t >= 1` returns `b`, untouched.
pub fn mix<T: Mix>(a: &T, b: &T, t: f32) -> T {
    if t.is_nan() || t <= 0.0 {
        return a.clone();
    }
    if t >= 1.0 {
        return b.clone();
    }

    match T::CATEGORY {
        BlendCategory::Continuous => a.lerp(b, t),
        BlendCategory::Discrete => switch(a, b, t),
    }
}

impl Mix for f32 {
    const CATEGORY: BlendCategory = BlendCategory::Continuous;

    fn lerp(&self, other: &Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl Mix for f64 {
    const CATEGORY: BlendCategory = BlendCategory::Continuous;

    fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = f64::from(t);
        self * (1.0 - t) + other * t
    }
}

// Integers blend in f64 and truncate toward zero.
macro_rules! impl_mix_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Mix for $ty {
                const CATEGORY: BlendCategory = BlendCategory::Continuous;

                #[allow(clippy::cast_lossless, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
                fn lerp(&self, other: &Self, t: f32) -> Self {
                    let t = f64::from(t);
                    (*self as f64 * (1.0 - t) + *other as f64 * t) as $ty
                }
            }
        )*
    };
}

impl_mix_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_mix_discrete {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Mix for $ty {
                const CATEGORY: BlendCategory = BlendCategory::Discrete;
            }
        )*
    };
}

impl_mix_discrete!(bool, char, String);

impl Mix for &str {
    const CATEGORY: BlendCategory = BlendCategory::Discrete;
}

/// Fixed-size arrays blend component-wise and inherit the element category.
impl<T: Mix, const N: usize> Mix for [T; N] {
    const CATEGORY: BlendCategory = T::CATEGORY;

    fn lerp(&self, other: &Self, t: f32) -> Self {
        std::array::from_fn(|i| self[i].lerp(&other[i], t))
    }
}

/// Error raised when two dynamic values cannot be blended
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MixError {
    /// The two values carry different types
    #[error("Type mismatch: cannot mix {left} with {right}")]
    TypeMismatch {
        /// Type of the left-hand value
        left: &'static str,
        /// Type of the right-hand value
        right: &'static str,
    },
}

/// Dynamically typed keyframe payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Float value
    Float(f32),
    /// 2D vector
    Vec2([f32; 2]),
    /// 3D vector
    Vec3([f32; 3]),
    /// 4D vector
    Vec4([f32; 4]),
    /// Boolean
    Bool(bool),
    /// Text
    Text(String),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Float(_) => "Float",
            Value::Vec2(_) => "Vec2",
            Value::Vec3(_) => "Vec3",
            Value::Vec4(_) => "Vec4",
            Value::Bool(_) => "Bool",
            Value::Text(_) => "Text",
        }
    }

    /// Get the blend category of this value
    pub fn category(&self) -> BlendCategory {
        match self {
            Value::Float(_) | Value::Vec2(_) | Value::Vec3(_) | Value::Vec4(_) => {
                BlendCategory::Continuous
            }
            Value::Bool(_) | Value::Text(_) => BlendCategory::Discrete,
        }
    }

    /// Blend with another value of the same type.
    ///
    /// Values of different types are rejected before any blending happens.
    pub fn try_mix(&self, other: &Value, t: f32) -> Result<Value, MixError> {
        let mixed = match (self, other) {
            (Value::Float(a), Value::Float(b)) => Value::Float(mix(a, b, t)),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(mix(a, b, t)),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(mix(a, b, t)),
            (Value::Vec4(a), Value::Vec4(b)) => Value::Vec4(mix(a, b, t)),
            (Value::Bool(a), Value::Bool(b)) => Value::Bool(mix(a, b, t)),
            (Value::Text(a), Value::Text(b)) => Value::Text(mix(a, b, t)),
            _ => {
                return Err(MixError::TypeMismatch {
                    left: self.type_name(),
                    right: other.type_name(),
                })
            }
        };
        Ok(mixed)
    }

    /// Get as float if possible
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as text if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        assert_eq!(mix(&-100.0f64, &0.0, 0.0), -100.0);
        assert_eq!(mix(&-100.0f64, &0.0, 1.0), 0.0);
        assert_eq!(mix(&"hello", &"world", 0.0), "hello");
        assert_eq!(mix(&"hello", &"world", 1.0), "world");
        assert!(!mix(&false, &true, 0.0));
        assert!(mix(&false, &true, 1.0));
    }

    #[test]
    fn test_out_of_range_factor_is_clamped() {
        assert_eq!(mix(&1.0f32, &3.0, -2.0), 1.0);
        assert_eq!(mix(&1.0f32, &3.0, 7.5), 3.0);
        assert_eq!(mix(&1.0f32, &3.0, f32::NAN), 1.0);
        assert_eq!(mix(&'a', &'b', 40.0), 'b');
    }

    #[test]
    fn test_discrete_switches_at_midpoint() {
        for t in [0.2, 0.25, 0.33, 0.49] {
            assert!(!mix(&false, &true, t), "t = {t}");
        }
        for t in [0.5, 0.66, 0.75, 0.8] {
            assert!(mix(&false, &true, t), "t = {t}");
        }
        assert_eq!(
            mix(&String::from("hello"), &String::from("world"), 0.5),
            "world"
        );
    }

    #[test]
    fn test_continuous_is_linear() {
        let (a, b) = (-100.0f32, 40.0f32);
        for t in [0.1f32, 0.25, 0.5, 0.9] {
            assert_eq!(mix(&a, &b, t), a * (1.0 - t) + b * t);
        }
        assert_eq!(mix(&-100.0f64, &0.0, 0.5), -50.0);
    }

    #[test]
    fn test_integers_truncate() {
        assert_eq!(mix(&0usize, &75, 0.5), 37);
        assert_eq!(mix(&10i32, &20, 0.5), 15);
        assert_eq!(mix(&10i32, &20, 0.25), 12);
        assert_eq!(mix(&20i32, &10, 0.5), 15);
    }

    #[test]
    fn test_arrays_blend_component_wise() {
        let mixed = mix(&[0.0f32, 10.0], &[10.0, 20.0], 0.5);
        assert_eq!(mixed, [5.0, 15.0]);
        assert_eq!(<[bool; 3] as Mix>::CATEGORY, BlendCategory::Discrete);
        assert_eq!(mix(&[true, false], &[false, true], 0.4), [true, false]);
    }

    #[test]
    fn test_value_mismatch_is_rejected() {
        let err = Value::Float(1.0)
            .try_mix(&Value::Text("a".into()), 0.5)
            .unwrap_err();
        assert_eq!(
            err,
            MixError::TypeMismatch {
                left: "Float",
                right: "Text"
            }
        );
    }

    #[test]
    fn test_value_mix_follows_category() {
        let mixed = Value::Vec2([0.0, 2.0])
            .try_mix(&Value::Vec2([2.0, 4.0]), 0.5)
            .unwrap();
        assert_eq!(mixed, Value::Vec2([1.0, 3.0]));
        assert_eq!(mixed.as_float(), None);

        let float = Value::Float(-1.0).try_mix(&Value::Float(3.0), 0.25).unwrap();
        assert_eq!(float.as_float(), Some(0.0));
        assert_eq!(float.as_text(), None);

        let text = Value::Text("on".into())
            .try_mix(&Value::Text("off".into()), 0.3)
            .unwrap();
        assert_eq!(text.as_text(), Some("on"));
        assert_eq!(text.category(), BlendCategory::Discrete);
    }
}

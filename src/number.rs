use core::ops;

/// A scalar that is either a concrete `f32` or not resolvable yet.
///
/// Sizes and bases flow through the solver as `Number`s: a percentage
/// against an indefinite basis, an `auto` width, or a missing constraint
/// all surface as [`Number::Undefined`] and only collapse to `0.0` at the
/// points where the algorithm explicitly says so.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Defined(f32),
    Undefined,
}

impl Default for Number {
    fn default() -> Number {
        Number::Undefined
    }
}

pub trait OrElse<T> {
    fn or_else(self, other: T) -> T;
}

impl OrElse<f32> for Number {
    fn or_else(self, other: f32) -> f32 {
        match self {
            Number::Defined(val) => val,
            Number::Undefined => other,
        }
    }
}

impl OrElse<Number> for Number {
    fn or_else(self, other: Number) -> Number {
        match self {
            Number::Defined(_) => self,
            Number::Undefined => other,
        }
    }
}

impl Number {
    pub fn is_defined(self) -> bool {
        match self {
            Number::Defined(_) => true,
            Number::Undefined => false,
        }
    }

    pub fn is_undefined(self) -> bool {
        !self.is_defined()
    }

    /// Treats an indefinite value as zero.
    pub fn or_zero(self) -> f32 {
        self.or_else(0.0)
    }
}

pub trait MinMax<In, Out> {
    fn maybe_min(self, rhs: In) -> Out;
    fn maybe_max(self, rhs: In) -> Out;
}

impl MinMax<Number, Number> for Number {
    fn maybe_min(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Defined(val), Number::Defined(other)) => Number::Defined(val.min(other)),
            (Number::Defined(_), Number::Undefined) => self,
            (Number::Undefined, _) => Number::Undefined,
        }
    }

    fn maybe_max(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Defined(val), Number::Defined(other)) => Number::Defined(val.max(other)),
            (Number::Defined(_), Number::Undefined) => self,
            (Number::Undefined, _) => Number::Undefined,
        }
    }
}

impl MinMax<Number, f32> for f32 {
    fn maybe_min(self, rhs: Number) -> f32 {
        match rhs {
            Number::Defined(val) => self.min(val),
            Number::Undefined => self,
        }
    }

    fn maybe_max(self, rhs: Number) -> f32 {
        match rhs {
            Number::Defined(val) => self.max(val),
            Number::Undefined => self,
        }
    }
}

pub trait ToNumber {
    fn to_number(self) -> Number;
}

impl ToNumber for f32 {
    fn to_number(self) -> Number {
        Number::Defined(self)
    }
}

impl ops::Add<f32> for Number {
    type Output = Number;

    fn add(self, rhs: f32) -> Number {
        match self {
            Number::Defined(val) => Number::Defined(val + rhs),
            Number::Undefined => Number::Undefined,
        }
    }
}

impl ops::Sub<f32> for Number {
    type Output = Number;

    fn sub(self, rhs: f32) -> Number {
        match self {
            Number::Defined(val) => Number::Defined(val - rhs),
            Number::Undefined => Number::Undefined,
        }
    }
}

impl ops::Sub<Number> for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Defined(val), Number::Defined(other)) => Number::Defined(val - other),
            (Number::Defined(_), Number::Undefined) => self,
            (Number::Undefined, _) => Number::Undefined,
        }
    }
}

impl ops::Mul<f32> for Number {
    type Output = Number;

    fn mul(self, rhs: f32) -> Number {
        match self {
            Number::Defined(val) => Number::Defined(val * rhs),
            Number::Undefined => Number::Undefined,
        }
    }
}

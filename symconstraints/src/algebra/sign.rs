//! Sign sets and sign analysis under symbol assumptions

use crate::semantic::{Expr, Function};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

/// Set of signs an expression may take, as a `{-, 0, +}` bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sign(u8);

impl Sign {
    pub const EMPTY: Sign = Sign(0b000);
    pub const NEGATIVE: Sign = Sign(0b001);
    pub const ZERO: Sign = Sign(0b010);
    pub const POSITIVE: Sign = Sign(0b100);
    pub const NONPOSITIVE: Sign = Sign(0b011);
    pub const NONNEGATIVE: Sign = Sign(0b110);
    pub const NONZERO: Sign = Sign(0b101);
    pub const ANY: Sign = Sign(0b111);

    pub fn of_rational(value: &BigRational) -> Self {
        if value.is_zero() {
            Sign::ZERO
        } else if value.is_positive() {
            Sign::POSITIVE
        } else {
            Sign::NEGATIVE
        }
    }

    pub fn union(self, other: Sign) -> Sign {
        Sign(self.0 | other.0)
    }

    pub fn intersect(self, other: Sign) -> Sign {
        Sign(self.0 & other.0)
    }

    /// True when every sign in `self` is also in `other`
    pub fn is_within(self, other: Sign) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn can_be_negative(self) -> bool {
        self.0 & Self::NEGATIVE.0 != 0
    }

    pub fn can_be_zero(self) -> bool {
        self.0 & Self::ZERO.0 != 0
    }

    pub fn can_be_positive(self) -> bool {
        self.0 & Self::POSITIVE.0 != 0
    }

    pub fn is_positive(self) -> bool {
        !self.is_empty() && self.is_within(Sign::POSITIVE)
    }

    pub fn is_negative(self) -> bool {
        !self.is_empty() && self.is_within(Sign::NEGATIVE)
    }

    pub fn is_nonnegative(self) -> bool {
        !self.is_empty() && self.is_within(Sign::NONNEGATIVE)
    }

    pub fn is_nonpositive(self) -> bool {
        !self.is_empty() && self.is_within(Sign::NONPOSITIVE)
    }

    pub fn negate(self) -> Sign {
        let mut bits = self.0 & Self::ZERO.0;
        if self.can_be_negative() {
            bits |= Self::POSITIVE.0;
        }
        if self.can_be_positive() {
            bits |= Self::NEGATIVE.0;
        }
        Sign(bits)
    }

    pub fn mul(self, other: Sign) -> Sign {
        let mut result = Sign::EMPTY;
        for a in self.members() {
            for b in other.members() {
                let product = if a == Sign::ZERO || b == Sign::ZERO {
                    Sign::ZERO
                } else if a == b {
                    Sign::POSITIVE
                } else {
                    Sign::NEGATIVE
                };
                result = result.union(product);
            }
        }
        result
    }

    pub fn add(self, other: Sign) -> Sign {
        if self.is_empty() || other.is_empty() {
            return Sign::EMPTY;
        }
        if self == Sign::ZERO {
            return other;
        }
        if other == Sign::ZERO {
            return self;
        }
        if self.is_nonnegative() && other.is_nonnegative() {
            return if self.is_positive() || other.is_positive() {
                Sign::POSITIVE
            } else {
                Sign::NONNEGATIVE
            };
        }
        if self.is_nonpositive() && other.is_nonpositive() {
            return if self.is_negative() || other.is_negative() {
                Sign::NEGATIVE
            } else {
                Sign::NONPOSITIVE
            };
        }
        Sign::ANY
    }

    fn members(self) -> impl Iterator<Item = Sign> {
        [Sign::NEGATIVE, Sign::ZERO, Sign::POSITIVE]
            .into_iter()
            .filter(move |s| s.is_within(self))
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Sign::EMPTY => "empty",
            Sign::NEGATIVE => "negative",
            Sign::ZERO => "zero",
            Sign::POSITIVE => "positive",
            Sign::NONPOSITIVE => "nonpositive",
            Sign::NONNEGATIVE => "nonnegative",
            Sign::NONZERO => "nonzero",
            _ => "real",
        };
        write!(f, "{}", name)
    }
}

/// Possible signs of `expr` given the assumptions carried by its symbols.
///
/// Symbols are real valued; a result of `Sign::ANY` means nothing could be proven.
pub fn sign_of(expr: &Expr) -> Sign {
    match expr {
        Expr::Num(value) => Sign::of_rational(value),
        Expr::Sym(symbol) => symbol.assumptions().sign(),
        Expr::Add(terms) => terms
            .iter()
            .map(sign_of)
            .reduce(Sign::add)
            .unwrap_or(Sign::ZERO),
        Expr::Mul(factors) => factors
            .iter()
            .map(sign_of)
            .reduce(Sign::mul)
            .unwrap_or(Sign::POSITIVE),
        Expr::Pow(base, exponent) => power_sign(sign_of(base), exponent),
        Expr::Func(function, arg) => {
            let inner = sign_of(arg);
            match function {
                Function::Abs => {
                    if inner.can_be_zero() {
                        Sign::NONNEGATIVE
                    } else {
                        Sign::POSITIVE
                    }
                }
                Function::Exp => Sign::POSITIVE,
                Function::Log => match arg.as_number() {
                    // log(v) has the sign of v - 1
                    Some(value) if value.is_positive() => {
                        Sign::of_rational(&(value - BigRational::one()))
                    }
                    _ => Sign::ANY,
                },
            }
        }
    }
}

fn power_sign(base: Sign, exponent: &BigRational) -> Sign {
    if exponent.is_zero() {
        return Sign::POSITIVE;
    }
    let numer_even = (exponent.numer() % 2u32).is_zero();
    let denom_even = (exponent.denom() % 2u32).is_zero();
    let negative_exponent = exponent.is_negative();

    // A zero base with a negative exponent is undefined, never zero.
    let strip_zero = |sign: Sign| {
        if negative_exponent {
            sign.intersect(Sign::NONZERO)
        } else {
            sign
        }
    };

    if denom_even {
        // Even roots are only real for nonnegative bases and are nonnegative.
        let real_part = base.intersect(Sign::NONNEGATIVE);
        return strip_zero(if real_part.can_be_zero() {
            Sign::NONNEGATIVE
        } else {
            Sign::POSITIVE
        });
    }
    if numer_even {
        return strip_zero(if base.can_be_zero() {
            Sign::NONNEGATIVE
        } else {
            Sign::POSITIVE
        });
    }
    strip_zero(base)
}

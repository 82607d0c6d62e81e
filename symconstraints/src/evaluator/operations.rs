//! Decimal arithmetic on concrete values
//!
//! Every operation is checked: overflow, division by zero and values outside
//! the real domain become a [`Veto::Undefined`] instead of a panic.

use crate::operation_result::{undefined, OperationResult, Veto};
use crate::semantic::Function;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Exact rational constant as a decimal, rounded to decimal precision
pub fn rational_to_decimal(value: &BigRational) -> OperationResult {
    let numer = integer_to_decimal(value.numer())?;
    let denom = integer_to_decimal(value.denom())?;
    divide(numer, denom)
}

pub fn integer_to_decimal(value: &BigInt) -> OperationResult {
    Decimal::from_str(&value.to_string())
        .map_err(|_| undefined(format!("constant {} is out of range", value)))
}

pub fn add(left: Decimal, right: Decimal) -> OperationResult {
    left.checked_add(right)
        .ok_or_else(|| undefined("addition overflow"))
}

pub fn multiply(left: Decimal, right: Decimal) -> OperationResult {
    left.checked_mul(right)
        .ok_or_else(|| undefined("multiplication overflow"))
}

pub fn divide(left: Decimal, right: Decimal) -> OperationResult {
    if right.is_zero() {
        return Err(undefined("division by zero"));
    }
    left.checked_div(right)
        .ok_or_else(|| undefined("division overflow"))
}

/// `base ** exponent` over the reals.
///
/// Integer exponents are computed exactly by repeated squaring. Other
/// exponents go through `f64`: odd roots of negative bases are real, even
/// roots of negative bases are undefined.
pub fn power(base: Decimal, exponent: &BigRational) -> OperationResult {
    if exponent.is_integer() {
        let n = exponent
            .to_integer()
            .to_i64()
            .ok_or_else(|| undefined("exponent out of range"))?;
        return integer_power(base, n);
    }

    if base.is_zero() {
        return if exponent.is_positive() {
            Ok(Decimal::ZERO)
        } else {
            Err(undefined("zero raised to a negative power"))
        };
    }

    let magnitude = float_power(base.abs(), exponent)?;
    if base.is_sign_negative() {
        if (exponent.denom() % 2u32).is_zero() {
            return Err(undefined(format!("even root of negative value {}", base)));
        }
        if !(exponent.numer() % 2u32).is_zero() {
            return Ok(-magnitude);
        }
    }
    Ok(magnitude)
}

fn integer_power(base: Decimal, exponent: i64) -> OperationResult {
    if exponent < 0 {
        let positive = integer_power(base, exponent.checked_neg().ok_or_else(|| {
            undefined("exponent out of range")
        })?)?;
        return divide(Decimal::ONE, positive);
    }

    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exponent;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = multiply(result, square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = multiply(square, square)?;
        }
    }
    Ok(result)
}

fn float_power(base: Decimal, exponent: &BigRational) -> OperationResult {
    let base = to_float(base)?;
    let exp = exponent
        .numer()
        .to_f64()
        .zip(exponent.denom().to_f64())
        .map(|(numer, denom)| numer / denom)
        .ok_or_else(|| undefined("cannot convert exponent to float"))?;
    from_float(base.powf(exp))
}

/// Apply a unary function
pub fn apply(function: Function, arg: Decimal) -> OperationResult {
    match function {
        Function::Abs => Ok(arg.abs()),
        Function::Exp => from_float(to_float(arg)?.exp()),
        Function::Log => {
            if arg <= Decimal::ZERO {
                return Err(undefined(format!("log of non-positive value {}", arg)));
            }
            from_float(to_float(arg)?.ln())
        }
    }
}

fn to_float(value: Decimal) -> Result<f64, Veto> {
    value
        .to_f64()
        .ok_or_else(|| undefined("cannot convert value to float"))
}

fn from_float(value: f64) -> OperationResult {
    if !value.is_finite() {
        return Err(undefined("result is not finite"));
    }
    Decimal::from_f64(value).ok_or_else(|| undefined("result cannot be represented"))
}

//! Lazy number view.
//!
//! The text of a number is not touched until a caller converts it. The
//! parse walks the digits once, accumulating into machine integers, and
//! widens only when forced: fixed-width integer, then arbitrary-precision
//! integer, then the platform float parser, then arbitrary-precision
//! float. `-0` with no fraction or exponent is caught before widening and
//! becomes the negative-zero float, keeping it distinct from integer `0`.

use std::borrow::Cow;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::error::{Error, Result, SyntaxKind};
use crate::scan;
use crate::source::Source;

pub struct Number<'a, S: Source> {
    source: &'a S,
    offset: usize,
}

impl<'a, S: Source> Clone for Number<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Source> Copy for Number<'a, S> {}

impl<'a, S: Source> std::fmt::Debug for Number<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Number")
            .field("offset", &self.offset)
            .finish()
    }
}

/// Result of parsing a number's text, tagged by the narrowest
/// representation that holds it exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Num {
    Int(i64),
    Float(f64),
    BigInt(BigInt),
    BigFloat(BigDecimal),
}

impl<'a, S: Source> Number<'a, S> {
    pub(crate) fn new(source: &'a S, offset: usize) -> Self {
        Number { source, offset }
    }

    /// Offset of the first byte (`-` or a digit) in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Verbatim numeric text.
    pub fn as_text(&self) -> Result<Cow<'a, [u8]>> {
        let end = scan::end_of_number(self.source, self.offset)?;
        Ok(self.source.slice(self.offset, end + 1))
    }

    /// Parses the text into the narrowest exact representation.
    pub fn parse(&self) -> Result<Num> {
        let src = self.source;
        let start = self.offset;
        let end = scan::end_of_number(src, start)?;

        let mut i = start;
        let neg = src.byte_at(i) == b'-';
        if neg {
            i = src.advance(i);
        }

        let int_start = i;
        let mut acc: i64 = 0;
        let mut int_overflow = false;
        let mut int_digits = 0usize;
        let mut nonzero_mantissa = false;
        while i <= end && src.byte_at(i).is_ascii_digit() {
            let d = i64::from(src.byte_at(i) - b'0');
            if d != 0 {
                nonzero_mantissa = true;
            }
            match acc.checked_mul(10).and_then(|a| a.checked_add(d)) {
                Some(a) => acc = a,
                None => int_overflow = true,
            }
            int_digits += 1;
            i = src.advance(i);
        }
        if int_digits == 0 {
            return Err(Error::syntax(start, SyntaxKind::UnterminatedNumber));
        }
        let leading_zero = int_digits > 1 && src.byte_at(int_start) == b'0';

        let mut has_frac = false;
        let mut frac_digits = 0usize;
        let mut frac_overflow = false;
        if i <= end && src.byte_at(i) == b'.' {
            has_frac = true;
            i = src.advance(i);
            let mut frac_acc: i64 = 0;
            while i <= end && src.byte_at(i).is_ascii_digit() {
                let d = i64::from(src.byte_at(i) - b'0');
                if d != 0 {
                    nonzero_mantissa = true;
                }
                match frac_acc.checked_mul(10).and_then(|a| a.checked_add(d)) {
                    Some(a) => frac_acc = a,
                    None => frac_overflow = true,
                }
                frac_digits += 1;
                i = src.advance(i);
            }
            if frac_digits == 0 {
                return Err(Error::syntax(i, SyntaxKind::UnterminatedNumber));
            }
        }

        let mut has_exp = false;
        if i <= end && matches!(src.byte_at(i), b'e' | b'E') {
            has_exp = true;
            i = src.advance(i);
            if i <= end && matches!(src.byte_at(i), b'+' | b'-') {
                i = src.advance(i);
            }
            let mut exp_digits = 0;
            while i <= end && src.byte_at(i).is_ascii_digit() {
                exp_digits += 1;
                i = src.advance(i);
            }
            if exp_digits == 0 {
                return Err(Error::syntax(i, SyntaxKind::UnterminatedNumber));
            }
        }

        if i != end + 1 {
            return Err(Error::syntax(
                i,
                SyntaxKind::UnexpectedByte(src.byte_at(i)),
            ));
        }

        let text = || String::from_utf8_lossy(&src.slice(start, end + 1)).into_owned();

        // Negative zero stays a float; widening it through the integer
        // ladder would collapse it onto integer 0.
        if neg && !has_frac && !has_exp && int_digits == 1 && acc == 0 {
            return Ok(Num::Float(-0.0));
        }

        if !has_frac && !has_exp {
            if leading_zero || int_overflow {
                let t = text();
                let big = BigInt::parse_bytes(t.as_bytes(), 10)
                    .ok_or_else(|| Error::syntax(start, SyntaxKind::UnterminatedNumber))?;
                return Ok(match big.to_i64() {
                    Some(v) => Num::Int(v),
                    None => Num::BigInt(big),
                });
            }
            return Ok(Num::Int(if neg { -acc } else { acc }));
        }

        if !has_exp {
            if int_overflow || frac_overflow || frac_digits > 17 {
                return big_float(start, &text());
            }
            let t = text();
            let f: f64 = t
                .parse()
                .map_err(|_| Error::syntax(start, SyntaxKind::UnterminatedNumber))?;
            return Ok(Num::Float(f));
        }

        // With an exponent the platform parser decides; magnitudes it
        // collapses to infinity or to zero (of a nonzero mantissa) go to
        // the arbitrary-precision form instead.
        let t = text();
        match t.parse::<f64>() {
            Ok(f) if f.is_finite() && !(f == 0.0 && nonzero_mantissa) => Ok(Num::Float(f)),
            _ => big_float(start, &t),
        }
    }

    /// The value as an `i64`, when it is one.
    pub fn to_i64(&self) -> Result<i64> {
        let inexact = || Error::InexactConversion {
            target: "i64",
            text: self.text_lossy(),
        };
        match self.parse()? {
            Num::Int(v) => Ok(v),
            Num::Float(f) => {
                // The upper bound is exclusive: 2^63 itself saturates the
                // cast and would otherwise slip through a round-trip check.
                if f.fract() == 0.0
                    && f >= -9_223_372_036_854_775_808.0
                    && f < 9_223_372_036_854_775_808.0
                {
                    Ok(f as i64)
                } else {
                    Err(inexact())
                }
            }
            Num::BigInt(b) => b.to_i64().ok_or_else(inexact),
            Num::BigFloat(d) => {
                if d.is_integer() {
                    d.to_i64().ok_or_else(inexact)
                } else {
                    Err(inexact())
                }
            }
        }
    }

    /// The value as an `f64`. Fails when the magnitude falls outside the
    /// finite range (or collapses a nonzero value to zero).
    pub fn to_f64(&self) -> Result<f64> {
        let inexact = || Error::InexactConversion {
            target: "f64",
            text: self.text_lossy(),
        };
        match self.parse()? {
            Num::Int(v) => Ok(v as f64),
            Num::Float(f) => Ok(f),
            Num::BigInt(b) => {
                let f = b.to_f64().ok_or_else(inexact)?;
                if f.is_finite() { Ok(f) } else { Err(inexact()) }
            }
            Num::BigFloat(d) => {
                let f = d.to_f64().ok_or_else(inexact)?;
                if !f.is_finite() || (f == 0.0 && !d.is_zero()) {
                    Err(inexact())
                } else {
                    Ok(f)
                }
            }
        }
    }

    /// The value as an arbitrary-precision decimal; always exact.
    pub fn to_big(&self) -> Result<BigDecimal> {
        Ok(match self.parse()? {
            Num::Int(v) => BigDecimal::from(v),
            Num::Float(f) => BigDecimal::try_from(f).map_err(|_| Error::InexactConversion {
                target: "BigDecimal",
                text: self.text_lossy(),
            })?,
            Num::BigInt(b) => BigDecimal::from(b),
            Num::BigFloat(d) => d,
        })
    }

    fn text_lossy(&self) -> String {
        self.as_text()
            .map(|t| String::from_utf8_lossy(&t).into_owned())
            .unwrap_or_default()
    }
}

fn big_float(offset: usize, text: &str) -> Result<Num> {
    BigDecimal::from_str(text)
        .map(Num::BigFloat)
        .map_err(|_| Error::syntax(offset, SyntaxKind::UnterminatedNumber))
}

impl Num {
    pub fn is_integer(&self) -> bool {
        match self {
            Num::Int(_) | Num::BigInt(_) => true,
            Num::Float(f) => f.fract() == 0.0,
            Num::BigFloat(d) => d.is_integer(),
        }
    }

    fn to_bigdecimal(&self) -> BigDecimal {
        match self {
            Num::Int(v) => BigDecimal::from(*v),
            // JSON numbers are finite, so the conversion cannot fail.
            Num::Float(f) => BigDecimal::try_from(*f).unwrap_or_else(|_| BigDecimal::zero()),
            Num::BigInt(b) => BigDecimal::from(b.clone()),
            Num::BigFloat(d) => d.clone(),
        }
    }

    fn to_f64_lossy(&self) -> f64 {
        match self {
            Num::Int(v) => *v as f64,
            Num::Float(f) => *f,
            Num::BigInt(b) => b.to_f64().unwrap_or(f64::NAN),
            Num::BigFloat(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    fn binop(
        self,
        rhs: Num,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
        big_int_op: fn(BigInt, BigInt) -> BigInt,
        big_op: fn(BigDecimal, BigDecimal) -> BigDecimal,
    ) -> Num {
        use Num::*;
        match (self, rhs) {
            (Int(a), Int(b)) => match int_op(a, b) {
                Some(v) => Int(v),
                None => Num::BigInt(big_int_op(a.into(), b.into())),
            },
            (Int(a), BigInt(b)) => Num::BigInt(big_int_op(a.into(), b)),
            (BigInt(a), Int(b)) => Num::BigInt(big_int_op(a, b.into())),
            (BigInt(a), BigInt(b)) => Num::BigInt(big_int_op(a, b)),
            (Float(a), Float(b)) => Float(float_op(a, b)),
            (Float(a), Int(b)) => Float(float_op(a, b as f64)),
            (Int(a), Float(b)) => Float(float_op(a as f64, b)),
            (a, b) => BigFloat(big_op(a.to_bigdecimal(), b.to_bigdecimal())),
        }
    }
}

impl std::ops::Add for Num {
    type Output = Num;

    fn add(self, rhs: Num) -> Num {
        self.binop(rhs, i64::checked_add, |a, b| a + b, |a, b| a + b, |a, b| a + b)
    }
}

impl std::ops::Sub for Num {
    type Output = Num;

    fn sub(self, rhs: Num) -> Num {
        self.binop(rhs, i64::checked_sub, |a, b| a - b, |a, b| a - b, |a, b| a - b)
    }
}

impl std::ops::Mul for Num {
    type Output = Num;

    fn mul(self, rhs: Num) -> Num {
        self.binop(rhs, i64::checked_mul, |a, b| a * b, |a, b| a * b, |a, b| a * b)
    }
}

impl std::ops::Div for Num {
    type Output = Num;

    /// Division is numeric, not integral: integer operands divide as
    /// floats, arbitrary-precision operands divide as decimals.
    fn div(self, rhs: Num) -> Num {
        use Num::*;
        match (&self, &rhs) {
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                Float(self.to_f64_lossy() / rhs.to_f64_lossy())
            }
            _ => BigFloat(self.to_bigdecimal() / rhs.to_bigdecimal()),
        }
    }
}

impl std::ops::Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        match self {
            Num::Int(v) => match v.checked_neg() {
                Some(n) => Num::Int(n),
                None => Num::BigInt(-BigInt::from(v)),
            },
            Num::Float(f) => Num::Float(-f),
            Num::BigInt(b) => Num::BigInt(-b),
            Num::BigFloat(d) => Num::BigFloat(-d),
        }
    }
}

impl std::fmt::Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Num::Int(v) => write!(f, "{v}"),
            Num::Float(x) => {
                if *x == 0.0 && x.is_sign_negative() {
                    write!(f, "-0.0")
                } else {
                    write!(f, "{x}")
                }
            }
            Num::BigInt(b) => write!(f, "{b}"),
            Num::BigFloat(d) => write!(f, "{d}"),
        }
    }
}

impl PartialEq<i64> for Num {
    fn eq(&self, other: &i64) -> bool {
        match self {
            Num::Int(v) => v == other,
            Num::Float(f) => *f == *other as f64,
            Num::BigInt(b) => b.to_i64().is_some_and(|v| v == *other),
            Num::BigFloat(d) => d.is_integer() && d.to_i64().is_some_and(|v| v == *other),
        }
    }
}

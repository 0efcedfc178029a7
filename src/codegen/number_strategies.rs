// Number literal strategies
//
// Strategies turn an integer into a single row of Befunge commands that leaves
// the value on the stack when executed left to right. Every cell they produce
// is direction independent, so the dispatcher can mirror the result for a
// cursor travelling left.

use crate::codegen::command::{Command, CommandKind};
use crate::codegen::error::CodeGenError;
use crate::codegen::fragment::GridFragment;

pub trait NumberStrategy {
    fn encode(&self, value: i64) -> Result<GridFragment, CodeGenError>;
}

/// Lay out a command sequence on row 0
pub(crate) fn row_fragment(commands: &[Command]) -> Result<GridFragment, CodeGenError> {
    let mut fragment = GridFragment::new();
    for (x, command) in commands.iter().enumerate() {
        fragment.set(x as i32, 0, *command)?;
    }
    Ok(fragment)
}

/// `0 <magnitude> -` around a positive expansion
fn with_sign(
    value: i64,
    expand: impl Fn(u64, &mut Vec<Command>) -> Result<(), CodeGenError>,
) -> Result<GridFragment, CodeGenError> {
    let mut commands = Vec::new();
    if value < 0 {
        commands.push(Command::digit(0)?);
        expand(value.unsigned_abs(), &mut commands)?;
        commands.push(Command::new(CommandKind::Sub));
    } else {
        expand(value as u64, &mut commands)?;
    }
    row_fragment(&commands)
}

/// Horner form in base 9: `d0 9* d1+ 9* d2+ ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct Base9Expansion;

impl Base9Expansion {
    fn expand(n: u64, out: &mut Vec<Command>) -> Result<(), CodeGenError> {
        let mut digits = Vec::new();
        let mut rest = n;
        loop {
            digits.push((rest % 9) as u8);
            rest /= 9;
            if rest == 0 {
                break;
            }
        }
        digits.reverse();

        out.push(Command::digit(digits[0])?);
        for &digit in &digits[1..] {
            out.push(Command::digit(9)?);
            out.push(Command::new(CommandKind::Mul));
            if digit != 0 {
                out.push(Command::digit(digit)?);
                out.push(Command::new(CommandKind::Add));
            }
        }
        Ok(())
    }
}

impl NumberStrategy for Base9Expansion {
    fn encode(&self, value: i64) -> Result<GridFragment, CodeGenError> {
        with_sign(value, Self::expand)
    }
}

/// Recursive factorization: `a b *` for composites, `(n-1) 1 +` for primes.
///
/// Magnitudes above [`FACTORIZATION_LIMIT`] use the base-9 expansion instead,
/// which keeps trial division at no more than 2^16 candidates per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorizationExpansion;

pub const FACTORIZATION_LIMIT: u64 = 1 << 32;

impl FactorizationExpansion {
    /// Largest factor in [2, sqrt(n)], giving the most balanced split
    fn balanced_factor(n: u64) -> Option<u64> {
        let mut candidate = (n as f64).sqrt() as u64;
        while candidate.saturating_mul(candidate) > n {
            candidate -= 1;
        }
        while (candidate + 1).saturating_mul(candidate + 1) <= n {
            candidate += 1;
        }
        (2..=candidate).rev().find(|f| n % f == 0)
    }

    fn expand(n: u64, out: &mut Vec<Command>) -> Result<(), CodeGenError> {
        if n <= 9 {
            out.push(Command::digit(n as u8)?);
            return Ok(());
        }
        match Self::balanced_factor(n) {
            Some(factor) => {
                Self::expand(factor, out)?;
                Self::expand(n / factor, out)?;
                out.push(Command::new(CommandKind::Mul));
            }
            None => {
                Self::expand(n - 1, out)?;
                out.push(Command::digit(1)?);
                out.push(Command::new(CommandKind::Add));
            }
        }
        Ok(())
    }
}

impl NumberStrategy for FactorizationExpansion {
    fn encode(&self, value: i64) -> Result<GridFragment, CodeGenError> {
        if value.unsigned_abs() > FACTORIZATION_LIMIT {
            log::debug!(
                "literal {} is too large to factorize, using base-9 expansion",
                value
            );
            return Base9Expansion.encode(value);
        }
        with_sign(value, Self::expand)
    }
}

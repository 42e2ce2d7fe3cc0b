//! Shared types for solana-wallet-manager
//!
//! Unit conversions and amount parsing used across the CLI and pipelines.

/// Number of lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert lamports to SOL (for display)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Convert a SOL amount to lamports
///
/// Returns `None` for NaN, infinite, negative, or out-of-range values.
/// Sub-lamport fractions are rounded to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> Option<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return None;
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    if lamports > u64::MAX as f64 {
        return None;
    }
    Some(lamports as u64)
}

/// Format lamports as a SOL string, e.g. "1.5 SOL"
pub fn format_sol(lamports: u64) -> String {
    format!("{} SOL", lamports_to_sol(lamports))
}

/// Result of interpreting an operator-supplied SOL amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountInput {
    /// A positive, well-formed amount in lamports
    Valid(u64),

    /// The argument was not a positive number
    Invalid,
}

impl AmountInput {
    /// Parse a SOL amount string such as "0.25" or "2"
    pub fn parse_sol(raw: &str) -> Self {
        match raw.trim().parse::<f64>().ok().and_then(sol_to_lamports) {
            Some(lamports) if lamports > 0 => AmountInput::Valid(lamports),
            _ => AmountInput::Invalid,
        }
    }
}

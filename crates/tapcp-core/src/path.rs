//! Transfer filename parsing
//!
//! A TAPCP filename is `<command>[/<param>]*`. The command is the first
//! component; the remaining components are positional parameters whose
//! meaning depends on the command. Filenames come straight from the network
//! and are treated as untrusted.

use alloc::vec::Vec;

use crate::error::{ParseFailure, Result};

/// A split transfer filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath<'a> {
    /// Command token, as sent by the client
    pub command: &'a str,
    /// Positional parameters following the command
    pub params: Vec<&'a str>,
}

impl<'a> ParsedPath<'a> {
    /// Get a positional parameter
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }

    /// Get an optional hex parameter
    pub fn hex_param(&self, index: usize) -> Result<Option<u32>> {
        self.param(index).map(parse_hex).transpose()
    }

    /// Fail if more than `max` parameters were given
    pub fn check_max_params(&self, max: usize) -> Result<()> {
        if self.params.len() > max {
            return Err(ParseFailure::TooManyParameters.into());
        }
        Ok(())
    }
}

/// Split a transfer filename into command and parameters
pub fn parse_path(filename: &str) -> Result<ParsedPath<'_>> {
    if filename.is_empty() {
        return Err(ParseFailure::EmptyPath.into());
    }

    let mut parts = filename.split('/');
    let command = parts.next().unwrap_or_default();
    if command.is_empty() {
        return Err(ParseFailure::EmptyCommand.into());
    }

    let params: Vec<&str> = parts.collect();
    if params.iter().any(|p| p.is_empty()) {
        return Err(ParseFailure::EmptyParameter.into());
    }

    Ok(ParsedPath { command, params })
}

/// Parse a hexadecimal number with an optional `0x` prefix
pub fn parse_hex(token: &str) -> Result<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    // from_str_radix accepts a leading '+', hex tokens must not
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseFailure::InvalidHex.into());
    }

    u32::from_str_radix(digits, 16).map_err(|_| ParseFailure::InvalidHex.into())
}

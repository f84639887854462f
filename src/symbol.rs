use std::{fmt, str::FromStr};

use fxhash::FxBuildHasher;
use indexmap::IndexMap;

type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Symbol table of label -> memory address, kept in order of definition.
///
/// Rebuilt from scratch on every assembly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable(FxMap<String, u8>);

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `label` at `address`.
    ///
    /// Returns the address the label was already bound to, leaving the table unchanged.
    pub fn insert(&mut self, label: &str, address: u8) -> Result<(), u8> {
        if let Some(existing) = self.0.get(label) {
            return Err(*existing);
        }
        self.0.insert(label.to_string(), address);
        Ok(())
    }

    /// Look up a label, ignoring one trailing colon.
    pub fn get(&self, label: &str) -> Option<u8> {
        self.0.get(strip_colon(label)).copied()
    }

    /// First label bound to `address`, if any.
    pub fn label_at(&self, address: u8) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, addr)| **addr == address)
            .map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(label, addr)| (label.as_str(), *addr))
    }
}

/// Labels may be written with a trailing colon, which is not part of the name.
pub fn strip_colon(token: &str) -> &str {
    token.strip_suffix(':').unwrap_or(token)
}

/// Signed decimal literal: optional `+`/`-`, then digits only.
pub fn is_int_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a token already known to be an integer literal.
///
/// Literals too large for `i64` saturate, which keeps them out of any address range.
pub fn parse_int_literal(token: &str) -> i64 {
    token.parse::<i64>().unwrap_or(if token.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// The eleven mnemonics understood by the assembler.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Add,
    Sub,
    Sta,
    Lda,
    Bra,
    Brz,
    Brp,
    In,
    Out,
    Hlt,
    /// Raw data word, not an instruction.
    Dat,
}

impl Mnemonic {
    pub const ALL: [Mnemonic; 11] = [
        Mnemonic::Add,
        Mnemonic::Sub,
        Mnemonic::Sta,
        Mnemonic::Lda,
        Mnemonic::Bra,
        Mnemonic::Brz,
        Mnemonic::Brp,
        Mnemonic::In,
        Mnemonic::Out,
        Mnemonic::Hlt,
        Mnemonic::Dat,
    ];

    /// Word emitted for this mnemonic before the address operand is added.
    pub fn base(self) -> u16 {
        match self {
            Mnemonic::Add => 100,
            Mnemonic::Sub => 200,
            Mnemonic::Sta => 300,
            Mnemonic::Lda => 500,
            Mnemonic::Bra => 600,
            Mnemonic::Brz => 700,
            Mnemonic::Brp => 800,
            Mnemonic::In => 901,
            Mnemonic::Out => 902,
            Mnemonic::Hlt | Mnemonic::Dat => 0,
        }
    }

    /// Whether the operand is a memory address added onto [`Mnemonic::base`].
    pub fn takes_address(self) -> bool {
        matches!(
            self,
            Mnemonic::Add
                | Mnemonic::Sub
                | Mnemonic::Sta
                | Mnemonic::Lda
                | Mnemonic::Bra
                | Mnemonic::Brz
                | Mnemonic::Brp
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Add => "ADD",
            Mnemonic::Sub => "SUB",
            Mnemonic::Sta => "STA",
            Mnemonic::Lda => "LDA",
            Mnemonic::Bra => "BRA",
            Mnemonic::Brz => "BRZ",
            Mnemonic::Brp => "BRP",
            Mnemonic::In => "IN",
            Mnemonic::Out => "OUT",
            Mnemonic::Hlt => "HLT",
            Mnemonic::Dat => "DAT",
        }
    }
}

impl FromStr for Mnemonic {
    type Err = ();

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mnemonic::ALL
            .into_iter()
            .find(|mnemonic| mnemonic.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics_ignore_case() {
        assert_eq!("lda".parse::<Mnemonic>(), Ok(Mnemonic::Lda));
        assert_eq!("Out".parse::<Mnemonic>(), Ok(Mnemonic::Out));
        assert_eq!("dat".parse::<Mnemonic>(), Ok(Mnemonic::Dat));
        assert_eq!("LOAD".parse::<Mnemonic>(), Err(()));
    }

    #[test]
    fn int_literals() {
        assert!(is_int_literal("42"));
        assert!(is_int_literal("-7"));
        assert!(is_int_literal("+007"));
        assert!(!is_int_literal("-"));
        assert!(!is_int_literal("4x"));
        assert!(!is_int_literal("1.5"));
        assert_eq!(parse_int_literal("+12"), 12);
        assert_eq!(parse_int_literal("99999999999999999999"), i64::MAX);
        assert_eq!(parse_int_literal("-99999999999999999999"), i64::MIN);
    }

    #[test]
    fn symbol_table_rejects_redefinition() {
        let mut table = SymbolTable::new();
        assert_eq!(table.insert("LOOP", 3), Ok(()));
        assert_eq!(table.insert("loop", 4), Ok(()));
        assert_eq!(table.insert("LOOP", 9), Err(3));
        assert_eq!(table.get("LOOP"), Some(3));
        assert_eq!(table.get("LOOP:"), Some(3));
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.label_at(4), Some("loop"));
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![("LOOP", 3), ("loop", 4)]
        );
    }
}

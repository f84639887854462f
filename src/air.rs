use std::str::FromStr;

use crate::{
    error::AsmError,
    lexer::Field,
    span::Span,
    symbol::{is_int_literal, parse_int_literal, Mnemonic, SymbolTable},
    word::{normalize, MEMORY_SIZE},
};

/// Assembly intermediate representation: one statement per memory address, plus the labels
/// collected while building it.
#[derive(Debug, Default)]
pub struct Air<'a> {
    ast: Vec<AirStmt<'a>>,
    symbols: SymbolTable,
}

/// Single LMC statement, with mnemonic and operand still unresolved.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AirStmt<'a> {
    pub label: Option<Field<'a>>,
    pub mnemonic: Option<Field<'a>>,
    pub operand: Option<Field<'a>>,
    /// Whole line as written
    pub span: Span,
}

impl<'a> Air<'a> {
    pub fn new() -> Self {
        Air::default()
    }

    /// Add a statement at the next address, recording its label.
    pub fn add_stmt(&mut self, stmt: AirStmt<'a>) -> Result<(), AsmError> {
        let address = self.ast.len();
        if let Some(label) = stmt.label {
            // Address always fits, length is checked below before it can grow past memory
            if let Err(first) = self.symbols.insert(label.text, address as u8) {
                return Err(AsmError::DuplicateLabel {
                    label: label.text.to_string(),
                    first: self.ast[first as usize].label.map(|l| l.span.into()),
                    span: label.span.into(),
                });
            }
        }
        self.ast.push(stmt);
        if self.ast.len() > MEMORY_SIZE {
            return Err(AsmError::ProgramTooLong {
                span: stmt.span.into(),
            });
        }
        Ok(())
    }

    /// Encode every statement into a word, resolving labels against the symbol table.
    pub fn emit(&self) -> Result<Vec<u16>, AsmError> {
        self.ast
            .iter()
            .map(|stmt| stmt.emit(&self.symbols))
            .collect()
    }

    pub fn get(&self, idx: usize) -> Option<&AirStmt<'a>> {
        self.ast.get(idx)
    }

    pub fn len(&self) -> usize {
        self.ast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ast.is_empty()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Line spans in address order, for listings and the debugger.
    pub fn spans(&self) -> Vec<Span> {
        self.ast.iter().map(|stmt| stmt.span).collect()
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }
}

impl<'a> IntoIterator for &'a Air<'a> {
    type Item = &'a AirStmt<'a>;
    type IntoIter = std::slice::Iter<'a, AirStmt<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ast.iter()
    }
}

impl AirStmt<'_> {
    pub fn emit(&self, symbols: &SymbolTable) -> Result<u16, AsmError> {
        // A lone label still occupies a cell
        let Some(mnemonic) = self.mnemonic else {
            return Ok(0);
        };
        let kind = Mnemonic::from_str(mnemonic.text).map_err(|_| AsmError::UnknownMnemonic {
            mnemonic: mnemonic.text.to_string(),
            span: mnemonic.span.into(),
        })?;

        match kind {
            Mnemonic::Dat => {
                let value = self.resolve_operand(symbols)?;
                Ok(normalize(value))
            }
            Mnemonic::In | Mnemonic::Out | Mnemonic::Hlt => Ok(kind.base()),
            _ => {
                debug_assert!(kind.takes_address());
                let address = self.resolve_operand(symbols)?;
                if !(0..MEMORY_SIZE as i64).contains(&address) {
                    return Err(AsmError::AddressOutOfRange {
                        value: address,
                        span: self.operand.map_or(mnemonic.span, |op| op.span).into(),
                    });
                }
                Ok(kind.base() + address as u16)
            }
        }
    }

    /// Literal or label value of the operand. A missing operand is 0.
    fn resolve_operand(&self, symbols: &SymbolTable) -> Result<i64, AsmError> {
        let Some(operand) = self.operand else {
            return Ok(0);
        };
        if is_int_literal(operand.text) {
            return Ok(parse_int_literal(operand.text));
        }
        symbols
            .get(operand.text)
            .map(i64::from)
            .ok_or_else(|| AsmError::UndefinedLabel {
                label: operand.text.to_string(),
                span: operand.span.into(),
            })
    }
}

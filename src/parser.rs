use std::vec::IntoIter;

use crate::{
    air::{Air, AirStmt},
    error::AsmError,
    lexer::{self, SourceLine},
};

/// Transforms source lines into AIR, collecting labels along the way.
pub struct AsmParser<'a> {
    /// Reference to the source file
    src: &'a str,
    /// Lines which occupy an address, in source order
    lines: IntoIter<SourceLine>,
    /// Assembly intermediate representation
    air: Air<'a>,
}

impl<'a> AsmParser<'a> {
    pub fn new(src: &'a str) -> Self {
        AsmParser {
            src,
            lines: lexer::lines(src).into_iter(),
            air: Air::new(),
        }
    }

    /// First pass: assign each line an address and record where every label points.
    ///
    /// Mnemonics and operands are left unresolved until [`Air::emit`].
    pub fn parse(mut self) -> Result<Air<'a>, AsmError> {
        for line in self.lines.by_ref() {
            let fields = line.fields(self.src);
            self.air.add_stmt(AirStmt {
                label: fields.label,
                mnemonic: fields.mnemonic,
                operand: fields.operand,
                span: line.span(),
            })?;
        }
        Ok(self.air)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_point_at_line_addresses() {
        let src = "; counts down\nSTART LDA N\n\n  BRZ END ; done?\nEND: HLT\nN DAT 3\n";
        let air = AsmParser::new(src).parse().unwrap();
        assert_eq!(air.len(), 4);
        let symbols = air.symbols();
        assert_eq!(symbols.get("START"), Some(0));
        assert_eq!(symbols.get("END"), Some(2));
        assert_eq!(symbols.get("N"), Some(3));
        assert_eq!(air.get(1).unwrap().mnemonic.unwrap().text, "BRZ");
    }

    #[test]
    fn label_only_line_takes_an_address() {
        let air = AsmParser::new("HERE\nOUT").parse().unwrap();
        assert_eq!(air.len(), 2);
        assert_eq!(air.symbols().get("HERE"), Some(0));
        assert_eq!(air.emit().unwrap(), vec![0, 902]);
    }

    #[test]
    fn duplicate_label() {
        let err = AsmParser::new("A DAT 1\nA DAT 2").parse().unwrap_err();
        assert!(
            matches!(&err, AsmError::DuplicateLabel { label, first: Some(_), .. } if label == "A"),
            "{err:?}"
        );
    }

    #[test]
    fn labels_are_case_sensitive() {
        let air = AsmParser::new("a DAT 1\nA DAT 2").parse().unwrap();
        assert_eq!(air.symbols().len(), 2);
    }

    #[test]
    fn hundred_lines_fit_but_not_more() {
        let src = "DAT 1\n".repeat(100);
        assert_eq!(AsmParser::new(&src).parse().unwrap().len(), 100);

        let src = src + "HLT\n";
        let err = AsmParser::new(&src).parse().unwrap_err();
        assert!(matches!(err, AsmError::ProgramTooLong { .. }), "{err:?}");
    }

    #[test]
    fn first_pass_ignores_unknown_mnemonics() {
        // Reported by the second pass instead
        let air = AsmParser::new("X FOO 1\nY BAR").parse().unwrap();
        assert_eq!(air.symbols().get("Y"), Some(1));
        assert!(matches!(
            air.emit(),
            Err(AsmError::UnknownMnemonic { ref mnemonic, .. }) if mnemonic == "FOO"
        ));
    }
}

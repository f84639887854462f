use std::fmt;

use crate::symbol::Mnemonic;

/// A memory word decoded as an instruction.
///
/// Every word decodes to something: the leading digit is the opcode and the trailing two digits
/// are the address, whether or not the instruction uses one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Op {
    /// `000`, also any data word below 100
    Hlt,
    Add(u8),
    Sub(u8),
    Sta(u8),
    Lda(u8),
    Bra(u8),
    Brz(u8),
    Brp(u8),
    /// `901`
    In,
    /// `902`
    Out,
    /// Any other `9xx`; executes as a no-op
    ReservedIo(u16),
    /// Opcode `4`, which halts the machine
    Invalid(u16),
}

impl Op {
    pub fn decode(word: u16) -> Self {
        let opcode = word / 100;
        let address = (word % 100) as u8;
        match opcode {
            0 => Op::Hlt,
            1 => Op::Add(address),
            2 => Op::Sub(address),
            3 => Op::Sta(address),
            5 => Op::Lda(address),
            6 => Op::Bra(address),
            7 => Op::Brz(address),
            8 => Op::Brp(address),
            9 => match word {
                901 => Op::In,
                902 => Op::Out,
                _ => Op::ReservedIo(word),
            },
            _ => Op::Invalid(word),
        }
    }

    pub fn mnemonic(&self) -> Option<Mnemonic> {
        Some(match self {
            Op::Hlt => Mnemonic::Hlt,
            Op::Add(_) => Mnemonic::Add,
            Op::Sub(_) => Mnemonic::Sub,
            Op::Sta(_) => Mnemonic::Sta,
            Op::Lda(_) => Mnemonic::Lda,
            Op::Bra(_) => Mnemonic::Bra,
            Op::Brz(_) => Mnemonic::Brz,
            Op::Brp(_) => Mnemonic::Brp,
            Op::In => Mnemonic::In,
            Op::Out => Mnemonic::Out,
            Op::ReservedIo(_) | Op::Invalid(_) => return None,
        })
    }

    pub fn address(&self) -> Option<u8> {
        match self {
            Op::Add(addr)
            | Op::Sub(addr)
            | Op::Sta(addr)
            | Op::Lda(addr)
            | Op::Bra(addr)
            | Op::Brz(addr)
            | Op::Brp(addr) => Some(*addr),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mnemonic(), self.address()) {
            (Some(mnemonic), Some(address)) => write!(f, "{} {:02}", mnemonic, address),
            (Some(mnemonic), None) => write!(f, "{}", mnemonic),
            (None, _) => write!(f, "???"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_opcode() {
        assert_eq!(Op::decode(0), Op::Hlt);
        assert_eq!(Op::decode(42), Op::Hlt);
        assert_eq!(Op::decode(199), Op::Add(99));
        assert_eq!(Op::decode(207), Op::Sub(7));
        assert_eq!(Op::decode(310), Op::Sta(10));
        assert_eq!(Op::decode(450), Op::Invalid(450));
        assert_eq!(Op::decode(502), Op::Lda(2));
        assert_eq!(Op::decode(600), Op::Bra(0));
        assert_eq!(Op::decode(711), Op::Brz(11));
        assert_eq!(Op::decode(812), Op::Brp(12));
        assert_eq!(Op::decode(901), Op::In);
        assert_eq!(Op::decode(902), Op::Out);
        assert_eq!(Op::decode(903), Op::ReservedIo(903));
        assert_eq!(Op::decode(900), Op::ReservedIo(900));
    }

    #[test]
    fn disassembles() {
        assert_eq!(Op::decode(502).to_string(), "LDA 02");
        assert_eq!(Op::decode(902).to_string(), "OUT");
        assert_eq!(Op::decode(0).to_string(), "HLT");
        assert_eq!(Op::decode(404).to_string(), "???");
    }
}

//! Crate for mapping sequence symbols to and from compact numeric codes
#![deny(missing_docs)]

use std::fmt;

/// Marks a byte that has no code in an alphabet's lookup table.
const NO_CODE: u8 = u8::MAX;

/// Errors raised while translating between symbols and codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// A symbol in the input text is not part of the alphabet.
    #[error("symbol {symbol:?} at position {position} is not in the {alphabet} alphabet")]
    InvalidSymbol {
        /// The offending symbol.
        symbol: char,
        /// Byte offset of the symbol in the encoded text.
        position: usize,
        /// Name of the alphabet.
        alphabet: &'static str,
    },
    /// A code does not correspond to any symbol of the alphabet.
    #[error("code {code} has no symbol in the {alphabet} alphabet")]
    InvalidCode {
        /// The offending code.
        code: u8,
        /// Name of the alphabet.
        alphabet: &'static str,
    },
}

/// Capability for encoding literal text into symbol codes and back.
///
/// Implementations must be pure: the same input always produces the same codes.
pub trait Alphabet {
    /// Short human readable name, used in error messages.
    fn name(&self) -> &'static str;

    /// Encode a literal string into symbol codes.
    fn encode(&self, text: &[u8]) -> Result<Vec<u8>, EncodingError>;

    /// Return the canonical symbol for a code.
    fn decode(&self, code: u8) -> Result<u8, EncodingError>;

    /// A symbol that is guaranteed to encode in this alphabet. Used to fill
    /// wildcard positions of a pattern before encoding it; the value itself is
    /// never compared against.
    fn placeholder_symbol(&self) -> Result<u8, EncodingError> {
        self.decode(0)
    }
}

/// A small alphabet backed by a 256-entry lookup table. Lookups are case
/// insensitive: the lowercase variant of every letter maps to the same code.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AlphabetEncoding {
    name: &'static str,
    symbols: &'static [u8],
    lookup: [u8; 256],
}

const fn make_lookup(symbols: &[u8]) -> [u8; 256] {
    assert!(
        symbols.len() < NO_CODE as usize,
        "alphabet has too many symbols"
    );
    let mut lookup = [NO_CODE; 256];
    // for loops are not allowed in const contexts, while loops are.
    let mut i = 0;
    while i < symbols.len() {
        let s = symbols[i];
        assert!(lookup[s as usize] == NO_CODE, "duplicate alphabet symbol");
        lookup[s as usize] = i as u8;
        if s.is_ascii_uppercase() {
            lookup[s.to_ascii_lowercase() as usize] = i as u8;
        }
        i += 1;
    }
    lookup
}

impl AlphabetEncoding {
    /// Build an alphabet where `symbols[i]` is encoded as `i`.
    /// Panics (at compile time for constants) on duplicate symbols.
    pub const fn new(name: &'static str, symbols: &'static [u8]) -> Self {
        AlphabetEncoding {
            name,
            symbols,
            lookup: make_lookup(symbols),
        }
    }

    /// The symbols of this alphabet in code order.
    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Code for a single symbol, if it belongs to the alphabet.
    #[inline]
    pub fn code_of(&self, symbol: u8) -> Option<u8> {
        match self.lookup[symbol as usize] {
            NO_CODE => None,
            code => Some(code),
        }
    }

    /// Decode a whole code sequence back to text.
    pub fn decode_all(&self, codes: &[u8]) -> Result<Vec<u8>, EncodingError> {
        codes.iter().map(|&c| self.decode(c)).collect()
    }
}

impl Alphabet for AlphabetEncoding {
    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, text: &[u8]) -> Result<Vec<u8>, EncodingError> {
        text.iter()
            .enumerate()
            .map(|(position, &s)| {
                self.code_of(s).ok_or(EncodingError::InvalidSymbol {
                    symbol: s as char,
                    position,
                    alphabet: self.name,
                })
            })
            .collect()
    }

    fn decode(&self, code: u8) -> Result<u8, EncodingError> {
        self.symbols
            .get(code as usize)
            .copied()
            .ok_or(EncodingError::InvalidCode {
                code,
                alphabet: self.name,
            })
    }
}

impl<A: Alphabet + ?Sized> Alphabet for &A {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn encode(&self, text: &[u8]) -> Result<Vec<u8>, EncodingError> {
        (**self).encode(text)
    }
    fn decode(&self, code: u8) -> Result<u8, EncodingError> {
        (**self).decode(code)
    }
    fn placeholder_symbol(&self) -> Result<u8, EncodingError> {
        (**self).placeholder_symbol()
    }
}

impl fmt::Debug for AlphabetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphabetEncoding")
            .field("name", &self.name)
            .field("symbols", &String::from_utf8_lossy(self.symbols))
            .finish()
    }
}

/// Unambiguous DNA bases.
pub const DNA: AlphabetEncoding = AlphabetEncoding::new("DNA", b"ACGT");

/// DNA bases plus N.
pub const ACGTN: AlphabetEncoding = AlphabetEncoding::new("ACGTN", b"ACGTN");

/// Unambiguous RNA bases.
pub const RNA: AlphabetEncoding = AlphabetEncoding::new("RNA", b"ACGU");

/// The twenty standard amino acids.
pub const AMINO_ACID: AlphabetEncoding =
    AlphabetEncoding::new("amino acid", b"ACDEFGHIKLMNPQRSTVWY");

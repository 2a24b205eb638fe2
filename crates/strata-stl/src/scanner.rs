//! Lexical scanner for ASCII STL token streams.

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Anything outside the grammar.
    Illegal,
    /// End of input.
    Eof,
    /// A run of whitespace.
    Whitespace,
    /// A floating-point literal.
    Number,
    /// `solid`
    Solid,
    /// `facet`
    Facet,
    /// `normal`
    Normal,
    /// `outer`
    Outer,
    /// `loop`
    Loop,
    /// `vertex`
    Vertex,
    /// `endloop`
    EndLoop,
    /// `endfacet`
    EndFacet,
    /// `endsolid`
    EndSolid,
}

/// A lexical scanner over a byte buffer.
///
/// Keywords are case-insensitive; whitespace runs collapse into a single
/// token. `e` can open a keyword but never a number literal, so matching
/// letters before numbers keeps exponents unambiguous.
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over a buffer.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn take_while(&mut self, pred: fn(u8) -> bool) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Return the next token and its literal text.
    pub fn scan(&mut self) -> (Token, String) {
        let Some(ch) = self.peek() else {
            return (Token::Eof, String::new());
        };

        if is_whitespace(ch) {
            return (Token::Whitespace, self.take_while(is_whitespace));
        }
        if is_letter(ch) {
            let lit = self.take_while(is_letter);
            return (keyword(&lit), lit);
        }
        if is_number(ch) {
            return (Token::Number, self.take_while(is_number));
        }

        self.pos += 1;
        (Token::Illegal, char::from(ch).to_string())
    }
}

fn keyword(lit: &str) -> Token {
    match lit.to_ascii_lowercase().as_str() {
        "solid" => Token::Solid,
        "facet" => Token::Facet,
        "normal" => Token::Normal,
        "outer" => Token::Outer,
        "loop" => Token::Loop,
        "vertex" => Token::Vertex,
        "endloop" => Token::EndLoop,
        "endfacet" => Token::EndFacet,
        "endsolid" => Token::EndSolid,
        _ => Token::Illegal,
    }
}

fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_number(ch: u8) -> bool {
    ch.is_ascii_digit() || matches!(ch, b'-' | b'+' | b'.' | b'e' | b'E')
}

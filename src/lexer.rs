// Hand-written lexer feeding `grammar.lalrpop` via lalrpop's external
// token convention: `Lexer` is a `Iterator<Item = Spanned<Tok, usize, LexError>>`
// the generated parser drives directly, so the grammar only ever sees
// already-classified tokens and keeps its own rules free of character
// classification.

use std::fmt;

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok<'input> {
    Ident(&'input str),
    Int(i64),
    Double(f64),
    HexColor(&'input str),

    KwSize,
    KwView,
    KwColor,
    KwPoints,
    KwPolygon,
    KwRule,
    KwStart,
    KwIf,
    KwCall,
    KwEscape,
    KwUntil,
    KwIterations,
    KwTransformation,
    KwTranslate,
    KwScale,
    KwRotate,
    KwShear,
    KwX,
    KwPixelX,
    KwPixelY,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    ColonEq,
    Pipe,
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for LexError {}

pub struct Lexer<'input> {
    input: &'input str,
    chars: std::str::CharIndices<'input>,
    lookahead: Option<(usize, char)>,
}

fn keyword<'a>(ident: &'a str) -> Option<Tok<'a>> {
    Some(match ident {
        "size" => Tok::KwSize,
        "view" => Tok::KwView,
        "color" => Tok::KwColor,
        "points" => Tok::KwPoints,
        "polygon" => Tok::KwPolygon,
        "rule" => Tok::KwRule,
        "start" => Tok::KwStart,
        "if" => Tok::KwIf,
        "call" => Tok::KwCall,
        "escape" => Tok::KwEscape,
        "until" => Tok::KwUntil,
        "iterations" => Tok::KwIterations,
        "transformation" => Tok::KwTransformation,
        "translate" => Tok::KwTranslate,
        "scale" => Tok::KwScale,
        "rotate" => Tok::KwRotate,
        "shear" => Tok::KwShear,
        "x" => Tok::KwX,
        "pixelX" => Tok::KwPixelX,
        "pixelY" => Tok::KwPixelY,
        _ => return None,
    })
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Lexer<'input> {
        let mut chars = input.char_indices();
        let lookahead = chars.next();
        Lexer { input, chars, lookahead }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let current = self.lookahead;
        self.lookahead = self.chars.next();
        current
    }

    fn line_col(&self, byte_offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for ch in self.input[..byte_offset].chars() {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    fn err(&self, offset: usize, message: impl Into<String>) -> LexError {
        let (line, column) = self.line_col(offset);
        LexError { line, column, message: message.into() }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.lookahead {
                Some((_, c)) if c.is_whitespace() => {
                    self.bump();
                }
                Some((_, '#')) if !self.next_looks_like_hex_color() => {
                    while let Some((_, c)) = self.lookahead {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// `#` starts a comment unless immediately followed by 6 hex
    /// digits, in which case it's a color literal.
    fn next_looks_like_hex_color(&self) -> bool {
        let rest = &self.input[self.lookahead.map(|(i, _)| i).unwrap_or(self.input.len())..];
        let digits: &str = rest.get(1..7).unwrap_or("");
        digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn take_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> (usize, &'input str) {
        let mut end = start;
        while let Some((i, c)) = self.lookahead {
            if !pred(c) {
                break;
            }
            end = i + c.len_utf8();
            self.bump();
        }
        (end, &self.input[start..end])
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Tok<'input>, usize, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_trivia();
        let (start, c) = self.bump()?;

        macro_rules! single {
            ($tok:expr) => {
                Some(Ok((start, $tok, start + 1)))
            };
        }

        match c {
            '(' => single!(Tok::LParen),
            ')' => single!(Tok::RParen),
            '{' => single!(Tok::LBrace),
            '}' => single!(Tok::RBrace),
            '[' => single!(Tok::LBracket),
            ']' => single!(Tok::RBracket),
            ',' => single!(Tok::Comma),
            ';' => single!(Tok::Semi),
            '|' => single!(Tok::Pipe),
            '+' => single!(Tok::Plus),
            '-' => single!(Tok::Minus),
            '*' => single!(Tok::Star),
            '/' => single!(Tok::Slash),
            '<' => single!(Tok::Lt),
            '>' => single!(Tok::Gt),
            ':' => {
                if self.lookahead == Some((start + 1, '=')) {
                    self.bump();
                    Some(Ok((start, Tok::ColonEq, start + 2)))
                } else {
                    Some(Err(self.err(start, "expected '=' after ':'")))
                }
            }
            '#' => {
                let (end, text) = self.take_while(start + 1, |c| c.is_ascii_hexdigit());
                if end - start - 1 != 6 {
                    Some(Err(self.err(start, "malformed color literal")))
                } else {
                    Some(Ok((start, Tok::HexColor(text), end)))
                }
            }
            c if c.is_ascii_digit() => {
                let (mut end, _) = self.take_while(start, |c| c.is_ascii_digit());
                let mut is_double = false;
                if self.lookahead == Some((end, '.')) {
                    is_double = true;
                    self.bump();
                    let (e2, _) = self.take_while(end + 1, |c| c.is_ascii_digit());
                    end = e2;
                }
                let text = &self.input[start..end];
                if is_double {
                    match text.parse::<f64>() {
                        Ok(v) => Some(Ok((start, Tok::Double(v), end))),
                        Err(_) => Some(Err(self.err(start, "malformed number"))),
                    }
                } else {
                    match text.parse::<i64>() {
                        Ok(v) => Some(Ok((start, Tok::Int(v), end))),
                        Err(_) => Some(Err(self.err(start, "malformed number"))),
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let (end, text) = self.take_while(start, |c| c.is_alphanumeric() || c == '_');
                let tok = keyword(text).unwrap_or(Tok::Ident(text));
                Some(Ok((start, tok, end)))
            }
            other => Some(Err(self.err(start, format!("unexpected character '{}'", other)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<Tok> {
        Lexer::new(input).map(|r| r.unwrap().1).collect()
    }

    #[test]
    fn keywords_and_punctuation() {
        assert_eq!(
            toks("rule Foo(n) { call Foo(n + 1); }"),
            vec![
                Tok::KwRule,
                Tok::Ident("Foo"),
                Tok::LParen,
                Tok::Ident("n"),
                Tok::RParen,
                Tok::LBrace,
                Tok::KwCall,
                Tok::Ident("Foo"),
                Tok::LParen,
                Tok::Ident("n"),
                Tok::Plus,
                Tok::Int(1),
                Tok::RParen,
                Tok::Semi,
                Tok::RBrace,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(toks("42 3.5 -1"), vec![Tok::Int(42), Tok::Double(3.5), Tok::Minus, Tok::Int(1)]);
    }

    #[test]
    fn hex_color_vs_comment() {
        assert_eq!(toks("#FF00AA"), vec![Tok::HexColor("FF00AA")]);
        assert_eq!(toks("# this is a comment\n42"), vec![Tok::Int(42)]);
    }

    #[test]
    fn pixel_coords_are_distinct_from_the_view_separator() {
        assert_eq!(toks("[-1,1] x [-1,1]")[3], Tok::KwX);
        assert_eq!(toks("pixelX + pixelY"), vec![Tok::KwPixelX, Tok::Plus, Tok::KwPixelY]);
    }

    #[test]
    fn walrus_operator() {
        assert_eq!(toks("z := 0"), vec![Tok::Ident("z"), Tok::ColonEq, Tok::Int(0)]);
    }

    #[test]
    fn reports_line_and_column_on_error() {
        let err = Lexer::new("size 1 1;\n@").find_map(|t| t.err()).unwrap();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 1);
    }
}

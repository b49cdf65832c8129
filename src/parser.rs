use regex::Regex;

use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::pattern::{Pattern, Section};

/// Parses a pattern string into its AST.
pub(crate) fn parse(input: &str) -> Result<Pattern, ParseError> {
    Parser {
        lexer: Lexer::new(input),
    }
    .parse()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    fn parse(mut self) -> Result<Pattern, ParseError> {
        let mut sections = Vec::new();
        loop {
            let token = self.lexer.next();
            match token.kind {
                TokenKind::End => break,
                TokenKind::Error => return Err(ParseError::Lex(token.text)),
                TokenKind::Slash => sections.push(Section::Slash),
                TokenKind::Path => sections.push(Section::Path {
                    value: token.text.to_ascii_lowercase(),
                }),
                TokenKind::OpenCurly => sections.push(self.parse_slot()?),
                kind => return Err(ParseError::UnexpectedToken(kind)),
            }
        }
        Ok(Pattern::new(sections))
    }

    fn parse_slot(&mut self) -> Result<Section, ParseError> {
        let key = self.expect(TokenKind::Slot)?.text;
        if self.accept(TokenKind::Question) {
            self.expect(TokenKind::CloseCurly)?;
            return Ok(Section::Optional { key });
        }
        if self.accept(TokenKind::Star) {
            self.expect(TokenKind::CloseCurly)?;
            if self.lexer.peek(1).kind != TokenKind::End {
                return Err(ParseError::TrailingWildcard);
            }
            return Ok(Section::Wildcard { key });
        }
        if self.accept(TokenKind::Pipe) {
            let source = self.expect(TokenKind::Regexp)?.text;
            let pattern = compile(&source)?;
            self.expect(TokenKind::CloseCurly)?;
            return Ok(Section::Regexp {
                key,
                source,
                pattern,
            });
        }
        self.expect(TokenKind::CloseCurly)?;
        Ok(Section::Required { key })
    }

    // advances over the token if it is next
    fn accept(&mut self, kind: TokenKind) -> bool {
        if self.lexer.peek(1).kind == kind {
            self.lexer.next();
            return true;
        }
        false
    }

    // errors unless the token is next
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let peeked = self.lexer.peek(1);
        if peeked.kind == TokenKind::Error {
            return Err(ParseError::Lex(peeked.text.clone()));
        }
        if peeked.kind != kind {
            return Err(ParseError::Expected {
                expected: kind,
                got: peeked.kind,
            });
        }
        Ok(self.lexer.next())
    }
}

// The slot constraint matches a prefix of the remaining path, so the
// stored program is anchored at the start; the written source is kept
// for rendering. The source is compiled bare first so the diagnostic
// reports exactly what the pattern says.
fn compile(source: &str) -> Result<Regex, ParseError> {
    Regex::new(source).map_err(|err| ParseError::Regex(err.to_string()))?;
    Regex::new(&format!("^(?:{})", source)).map_err(|err| ParseError::Regex(err.to_string()))
}

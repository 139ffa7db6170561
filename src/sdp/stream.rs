use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{dispatcher, Span};

use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Where tokens come from.
enum Source<'a> {
    /// A lexer on a producer thread, handing over one token at a time.
    Channel(Receiver<Token>),
    /// A lexer pulled on the calling thread.
    Inline(Lexer<'a>),
}

/// Reader side of the lexer with one token of pushback.
///
/// Reading past the end yields EOF tokens, never blocks.
pub(crate) struct TokenStream<'a> {
    source: Source<'a>,
    pushback: Option<Token>,
    /// Tokens read on the current line.
    line: Vec<Token>,
    /// Position just past the last token, where EOF is placed.
    end: (usize, usize),
    trace_tokens: bool,
}

impl<'a> TokenStream<'a> {
    fn new(source: Source<'a>, trace_tokens: bool) -> Self {
        TokenStream {
            source,
            pushback: None,
            line: vec![],
            end: (0, 1),
            trace_tokens,
        }
    }

    pub fn next(&mut self) -> Token {
        let token = match self.pushback.take() {
            Some(t) => t,
            None => self.pull(),
        };

        let new_line = self
            .line
            .last()
            .map(|t| t.is(TokenKind::Eol) || t.is(TokenKind::Error))
            .unwrap_or(false);
        if new_line {
            self.line.clear();
        }
        self.line.push(token.clone());

        token
    }

    /// Give back the token last returned by [`TokenStream::next`].
    ///
    /// Panics if a token is already pushed back.
    pub fn unread(&mut self, token: Token) {
        assert!(
            self.pushback.is_none(),
            "unread twice without a read in between"
        );
        self.line.pop();
        self.pushback = Some(token);
    }

    /// The tokens read so far on the current line.
    pub fn line_trace(&self) -> Vec<Token> {
        self.line.clone()
    }

    fn pull(&mut self) -> Token {
        let next = match &mut self.source {
            Source::Channel(rx) => rx.recv().ok(),
            Source::Inline(lexer) => lexer.next(),
        };

        let Some(token) = next else {
            let (start, line) = self.end;
            return Token::eof(start, line);
        };

        if self.trace_tokens {
            trace!("{}:{} {}", token.line, token.start, token);
        }

        self.end = match token.kind {
            // Error text is a diagnostic, not input.
            TokenKind::Error => (token.start, token.line),
            // The EOL run ends the line.
            TokenKind::Eol => (token.start + token.text.len(), token.line + 1),
            _ => (token.start + token.text.len(), token.line),
        };

        token
    }
}

/// Run `f` with a [`TokenStream`] over `input`.
///
/// With `concurrent` the lexer runs on a scoped producer thread, delivering
/// tokens through a zero capacity channel. The producer inherits the caller's
/// tracing dispatcher and span. When `f` returns, the receiver is dropped
/// which fails any pending send, so the producer exits before the scope joins.
pub(crate) fn with_token_stream<R>(
    input: &str,
    concurrent: bool,
    trace_tokens: bool,
    f: impl FnOnce(&mut TokenStream<'_>) -> R,
) -> R {
    if !concurrent {
        let mut stream = TokenStream::new(Source::Inline(Lexer::new(input)), trace_tokens);
        return f(&mut stream);
    }

    let dispatch = dispatcher::get_default(|d| d.clone());
    let span = Span::current();

    thread::scope(|s| {
        let (tx, rx) = mpsc::sync_channel(0);

        s.spawn(move || {
            dispatcher::with_default(&dispatch, || {
                let _entered = span.enter();
                for token in Lexer::new(input) {
                    if tx.send(token).is_err() {
                        debug!("Token reader closed, stop lexing");
                        break;
                    }
                }
            })
        });

        let mut stream = TokenStream::new(Source::Channel(rx), trace_tokens);
        let result = f(&mut stream);
        drop(stream);

        result
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use TokenKind::*;

    fn read_all(input: &str, concurrent: bool) -> Vec<Token> {
        with_token_stream(input, concurrent, false, |s| {
            let mut v = vec![];
            loop {
                let t = s.next();
                let eof = t.is(Eof);
                v.push(t);
                if eof {
                    break;
                }
            }
            v
        })
    }

    #[test]
    fn eof_after_last_token() {
        for concurrent in [true, false] {
            let tokens = read_all("v=0\r\n", concurrent);
            let k: Vec<_> = tokens.iter().map(|t| t.kind).collect();
            assert_eq!(k, vec![Field, AttrInt, Eol, Eof]);
            assert_eq!(tokens[3].start, 5);
            assert_eq!(tokens[3].line, 2);
        }
    }

    #[test]
    fn empty_input_is_eof() {
        let tokens = read_all("", true);
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is(Eof));
    }

    #[test]
    fn reading_past_end_keeps_giving_eof() {
        with_token_stream("v=0", true, false, |s| {
            s.next();
            s.next();
            assert!(s.next().is(Eof));
            assert!(s.next().is(Eof));
        });
    }

    #[test]
    fn unread_returns_same_token() {
        with_token_stream("v=0\n", false, false, |s| {
            let t = s.next();
            s.unread(t.clone());
            assert_eq!(s.next(), t);
        });
    }

    #[test]
    #[should_panic(expected = "unread twice")]
    fn double_unread_panics() {
        with_token_stream("v=0\n", false, false, |s| {
            let a = s.next();
            let b = s.next();
            s.unread(b);
            s.unread(a);
        });
    }

    #[test]
    fn line_trace_is_current_line() {
        with_token_stream("v=0\nt=1 2\n", false, false, |s| {
            for _ in 0..4 {
                s.next();
            }
            s.next();
            let trace = s.line_trace();
            assert_eq!(trace.len(), 2);
            assert_eq!(trace[0].text, "t");
            assert_eq!(trace[1].text, "1");

            let t = s.next();
            s.unread(t);
            assert_eq!(s.line_trace().len(), 2);
        });
    }

    #[test]
    fn early_stop_does_not_hang() {
        let input = "v=0\n".repeat(1000);
        let first = with_token_stream(&input, true, false, |s| s.next());
        assert!(first.is(Field));
    }
}

//! SDP lexer, parser, document and writer.

mod data;
pub use data::{Attribute, Bandwidth, Candidate, CandidateKind, Connection, Data};
pub use data::{Encryption, Fingerprint, IceCreds, Media, MediaType, Origin, Rtp};
pub use data::{SsrcGroup, Timing};

mod error;
pub use error::{ErrorKind, SdpError};

mod lexer;
pub use lexer::{lex, Lexer};

mod parser;
pub(crate) use parser::SdpParser;

mod stream;
pub(crate) use stream::with_token_stream;

mod token;
pub use token::{AttributeKind, FieldKind, Token, TokenKind};

mod writer;

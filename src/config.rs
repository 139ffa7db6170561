use tracing::{dispatcher, Dispatch};

use crate::sdp::{with_token_stream, Data, SdpError, SdpParser};

/// Customized config for parsing SDP.
///
/// ```
/// use sdpwire::SdpConfig;
///
/// let data = SdpConfig::new()
///     .set_concurrent_lexer(false)
///     .parse("v=0\r\ns=-\r\n")
///     .unwrap();
///
/// assert_eq!(data.name, "-");
/// ```
///
/// Configs implement [`Clone`] so the same settings can be used for many parses.
/// Every parse gets its own lexer and parser, nothing is shared between them.
#[derive(Debug, Clone)]
pub struct SdpConfig {
    concurrent_lexer: bool,
    trace_tokens: bool,
    dispatch: Option<Dispatch>,
}

impl SdpConfig {
    /// Creates a new default config.
    pub fn new() -> Self {
        SdpConfig::default()
    }

    /// Run the lexer on its own thread.
    ///
    /// The lexer hands over one token at a time through a zero capacity channel
    /// and waits for the parser to take it. When disabled, the parser pulls
    /// tokens from the lexer on the calling thread. The result is the same.
    pub fn set_concurrent_lexer(mut self, enabled: bool) -> Self {
        self.concurrent_lexer = enabled;
        self
    }

    /// Tells whether the lexer runs on its own thread.
    ///
    /// ```
    /// # use sdpwire::SdpConfig;
    /// let config = SdpConfig::new();
    ///
    /// // Defaults to true.
    /// assert_eq!(config.concurrent_lexer(), true);
    /// ```
    pub fn concurrent_lexer(&self) -> bool {
        self.concurrent_lexer
    }

    /// Log every token the parser reads at trace level.
    pub fn set_trace_tokens(mut self, enabled: bool) -> Self {
        self.trace_tokens = enabled;
        self
    }

    /// Tells whether tokens are logged.
    ///
    /// ```
    /// # use sdpwire::SdpConfig;
    /// let config = SdpConfig::new();
    ///
    /// // Defaults to false.
    /// assert_eq!(config.trace_tokens(), false);
    /// ```
    pub fn trace_tokens(&self) -> bool {
        self.trace_tokens
    }

    /// Send diagnostics to this subscriber instead of the default one.
    ///
    /// Applies to the lexer thread as well as the parser.
    pub fn set_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Parse one SDP document.
    ///
    /// Returns the document, or the first error that stopped the parse. Lines the
    /// lexer can't scan are logged and skipped, they never fail the parse.
    pub fn parse(&self, input: &str) -> Result<Data, SdpError> {
        match &self.dispatch {
            Some(d) => dispatcher::with_default(d, || self.do_parse(input)),
            None => self.do_parse(input),
        }
    }

    fn do_parse(&self, input: &str) -> Result<Data, SdpError> {
        let _span = debug_span!("sdp_parse", len = input.len()).entered();

        with_token_stream(input, self.concurrent_lexer, self.trace_tokens, |tokens| {
            SdpParser::new(tokens).parse()
        })
    }
}

impl Default for SdpConfig {
    fn default() -> Self {
        Self {
            concurrent_lexer: true,
            trace_tokens: false,
            dispatch: None,
        }
    }
}

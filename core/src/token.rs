//! Destructive token cursor over a command line.
//!
//! The stream owns the space-joined argument string and hands out one token
//! at a time: leading delimiter runs are skipped, a token runs to the next
//! delimiter, and one trailing delimiter is swallowed. Consumption advances
//! the cursor; re-reading requires an explicit [`rewind`](TokenStream::rewind)
//! to a previously captured [`position`](TokenStream::position).
//!
//! ASCII whitespace always delimits; the configurable set (default: the
//! double quote) delimits in addition, which lets string extraction read a
//! quoted span whole via [`next_quoted`](TokenStream::next_quoted).

/// Extra delimiter set used by [`TokenStream::next_token`].
pub const DEFAULT_DELIMITERS: &[char] = &['"'];

/// Ordered, mutable cursor over the concatenated argument string.
///
/// # Examples
///
/// ```
/// use optline_core::TokenStream;
///
/// let mut stream = TokenStream::from_line("add  2 \"3\"");
/// assert_eq!(stream.next_token(), Some("add"));
/// assert_eq!(stream.next_token(), Some("2"));
/// assert_eq!(stream.next_token(), Some("3"));
/// assert_eq!(stream.next_token(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TokenStream {
    buf: String,
    pos: usize,
}

impl TokenStream {
    /// Builds a stream by joining the given arguments with single spaces.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let buf = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(" ");
        Self { buf, pos: 0 }
    }

    /// Builds a stream over a raw command line.
    pub fn from_line(line: impl Into<String>) -> Self {
        Self {
            buf: line.into(),
            pos: 0,
        }
    }

    /// Current cursor position, usable with [`rewind`](Self::rewind).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back (or forward) to a position previously returned
    /// by [`position`](Self::position).
    pub fn rewind(&mut self, position: usize) {
        self.pos = position.min(self.buf.len());
    }

    /// Returns `true` once every character has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Returns the next whitespace/quote-delimited token, or `None` at end
    /// of stream.
    pub fn next_token(&mut self) -> Option<&str> {
        self.next_token_with(DEFAULT_DELIMITERS)
    }

    /// Returns the next token, delimited by ASCII whitespace plus `delims`.
    ///
    /// Skips any leading run of delimiter characters (so adjacent delimiters
    /// never yield empty tokens), consumes to the next delimiter, then
    /// swallows one trailing delimiter if present. A final token with no
    /// trailing delimiter is returned as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::TokenStream;
    ///
    /// let mut stream = TokenStream::from_line("a::b:c");
    /// assert_eq!(stream.next_token_with(&[':']), Some("a"));
    /// assert_eq!(stream.next_token_with(&[':']), Some("b"));
    /// assert_eq!(stream.next_token_with(&[':']), Some("c"));
    /// assert_eq!(stream.next_token_with(&[':']), None);
    /// ```
    pub fn next_token_with(&mut self, delims: &[char]) -> Option<&str> {
        let is_delim = |c: char| c.is_ascii_whitespace() || delims.contains(&c);

        while let Some(c) = self.peek() {
            if !is_delim(c) {
                break;
            }
            self.advance(c);
        }
        if self.is_exhausted() {
            return None;
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_delim(c) {
                break;
            }
            self.advance(c);
        }
        let end = self.pos;

        if let Some(c) = self.peek() {
            if is_delim(c) {
                self.advance(c);
            }
        }

        Some(&self.buf[start..end])
    }

    /// Returns the next string token, reading a `"`-delimited span whole.
    ///
    /// An unquoted token behaves exactly like [`next_token`](Self::next_token);
    /// a quoted span keeps embedded whitespace. Empty quoted spans are
    /// skipped like any other adjacent-delimiter run.
    ///
    /// # Examples
    ///
    /// ```
    /// use optline_core::TokenStream;
    ///
    /// let mut stream = TokenStream::from_line("plain \"two words\" tail");
    /// assert_eq!(stream.next_quoted(), Some("plain"));
    /// assert_eq!(stream.next_quoted(), Some("two words"));
    /// assert_eq!(stream.next_quoted(), Some("tail"));
    /// assert_eq!(stream.next_quoted(), None);
    /// ```
    pub fn next_quoted(&mut self) -> Option<&str> {
        while let Some(c) = self.peek() {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.advance(c);
        }

        match self.peek() {
            None => None,
            Some('"') => {
                self.advance('"');
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == '"' {
                        break;
                    }
                    self.advance(c);
                }
                let end = self.pos;
                if self.peek() == Some('"') {
                    self.advance('"');
                }
                if start == end {
                    // adjacent quotes span nothing; fall through to the
                    // next token
                    self.next_quoted()
                } else {
                    Some(&self.buf[start..end])
                }
            }
            Some(_) => self.next_token(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.buf[self.pos..].chars().next()
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
    }
}

//! Lexer - turns source lines into the token list
//!
//! The whole file is tokenized before parsing starts. Without automatic
//! semicolon insertion and with template literals kept flat, the only
//! context-dependent decision is whether a `/` starts a regular expression,
//! and that is estimated from the previous non-comment token.
//!
//! Besides tokens, the lexer reports line-level problems (tabs, trailing
//! spaces, long lines), literal problems (bad escapes, bad numbers, bad
//! regular expressions) and processes directive comments.

use crate::context::{Context, ModuleMode};
use crate::patterns::Pattern;
use crate::token::DirectiveKind;
use core_types::{Code, LintResult, OptionName};

/// Maximum line length before `too_long`
const MAX_LINE: usize = 80;

/// Characters that may follow a backslash in any string
const ESCAPEABLE: &str = "\\/`bfnrt";

/// What the leading characters of a line matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Whitespace,
    Identifier,
    Number,
    Punctuator,
}

/// Tokenize `ctx.lines` into `ctx.tokens`
///
/// On a fatal lexical error the tokens made so far are kept and the stop
/// error is returned. The layout table is sized to the token list either way.
pub fn tokenize(ctx: &mut Context) -> LintResult<()> {
    let result = Lexer::new(ctx).run();
    ctx.sync_meta();
    result
}

/// Lexer state over one context
pub struct Lexer<'c> {
    ctx: &'c mut Context,
    /// Characters of the current line, tabs replaced
    chars: Vec<char>,
    /// Read position in `chars`; may run one past the end
    pos: usize,
    /// False once the last line has been consumed
    has_line: bool,
    /// Length of the current line as written
    whole_len: usize,
    /// Current character; `None` past the end of the line
    char: Option<char>,
    /// Text of the literal being scanned
    snippet: String,
    line: usize,
    next_line_index: usize,
    column: usize,
    from: usize,
    /// Last token that was not a comment
    prior: Option<usize>,
    first_made: bool,
    regexp_seen: bool,
    multi_mode: bool,
    mega_mode: bool,
    mega_line: usize,
    mega_from: usize,
}

impl<'c> Lexer<'c> {
    /// Create a lexer positioned before the first line
    pub fn new(ctx: &'c mut Context) -> Self {
        let shebang = ctx.lines.first().is_some_and(|l| l.starts_with("#!"));
        ctx.shebang = shebang;
        Self {
            ctx,
            chars: Vec::new(),
            pos: 0,
            has_line: true,
            whole_len: 0,
            char: None,
            snippet: String::new(),
            line: 0,
            next_line_index: usize::from(shebang),
            column: 0,
            from: 0,
            prior: None,
            first_made: false,
            regexp_seen: false,
            multi_mode: false,
            mega_mode: false,
            mega_line: 0,
            mega_from: 0,
        }
    }

    /// Produce every token up to and including `(end)`
    pub fn run(&mut self) -> LintResult<()> {
        let first = self.lex()?;
        self.first_made = true;
        let id = self.ctx.tokens[first].id.as_str();
        self.ctx.json_mode = id == "{" || id == "[";
        loop {
            let nr = self.lex()?;
            if self.ctx.tokens[nr].id == "(end)" {
                return Ok(());
            }
        }
    }

    fn rest(&self) -> &[char] {
        &self.chars[self.pos.min(self.chars.len())..]
    }

    fn rest_string(&self) -> String {
        self.rest().iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.rest().first().copied()
    }

    fn option(&self, name: OptionName) -> bool {
        self.ctx.options.get(name)
    }

    /// Load the next source line; false past the last one
    fn next_line(&mut self) -> bool {
        if !self.option(OptionName::Long)
            && self.whole_len > MAX_LINE
            && !self.ctx.json_mode
            && self.first_made
            && !self.regexp_seen
        {
            self.ctx.warn_at(Code::TooLong, self.line, MAX_LINE, &[]);
        }
        self.column = 0;
        self.pos = 0;
        self.line = self.next_line_index;
        self.next_line_index += 1;
        self.regexp_seen = false;
        let Some(text) = self.ctx.lines.get(self.line) else {
            self.chars.clear();
            self.whole_len = 0;
            self.has_line = false;
            return false;
        };
        let mut chars: Vec<char> = text.chars().collect();
        self.whole_len = chars.len();
        let white = self.option(OptionName::White);
        if let Some(at) = chars.iter().position(|&c| c == '\t') {
            if !white {
                self.ctx.warn_at(Code::UseSpaces, self.line, at + 1, &[]);
            }
            for c in chars.iter_mut().filter(|c| **c == '\t') {
                *c = ' ';
            }
        }
        if !white && chars.last() == Some(&' ') {
            self.ctx
                .warn_at(Code::UnexpectedTrailingSpace, self.line, chars.len() - 1, &[]);
        }
        self.chars = chars;
        self.has_line = true;
        true
    }

    fn snip(&mut self) {
        self.snippet.pop();
    }

    /// Advance one character, optionally checking the current one first
    fn next_char(&mut self, expect: Option<char>) -> LintResult<Option<char>> {
        if let Some(want) = expect {
            if self.char != Some(want) {
                let want = want.to_string();
                return Err(match self.char {
                    None => self.ctx.stop_at(
                        Code::ExpectedA,
                        self.line,
                        self.column.saturating_sub(1),
                        &[&want],
                    ),
                    Some(c) => self.ctx.stop_at(
                        Code::ExpectedAB,
                        self.line,
                        self.column.saturating_sub(1),
                        &[&want, &c.to_string()],
                    ),
                });
            }
        }
        match self.peek() {
            Some(c) => {
                self.char = Some(c);
                self.snippet.push(c);
            }
            None => {
                self.char = None;
                self.snippet.push(' ');
            }
        }
        self.pos += 1;
        self.column += 1;
        Ok(self.char)
    }

    /// Put the last snippet character back
    fn back_char(&mut self) -> Option<char> {
        match self.snippet.pop() {
            Some(c) => {
                self.char = Some(c);
                self.pos = self.pos.saturating_sub(1);
                self.column = self.column.saturating_sub(1);
            }
            None => self.char = None,
        }
        self.char
    }

    /// Consume a run of digits, then advance one character
    fn some_digits(&mut self, digit: fn(char) -> bool, quiet: bool) -> LintResult<usize> {
        let digits: String = self.rest().iter().take_while(|&&c| digit(c)).collect();
        let length = digits.chars().count();
        if !quiet && length == 0 {
            let snippet = self.snippet.clone();
            self.ctx
                .warn_at(Code::ExpectedDigitsAfterA, self.line, self.column, &[&snippet]);
        }
        self.column += length;
        self.pos += length;
        self.snippet.push_str(&digits);
        self.next_char(None)?;
        Ok(length)
    }

    /// Scan a backslash escape; `extra` lists context-specific escapables
    fn escape(&mut self, extra: &str) -> LintResult<()> {
        self.next_char(Some('\\'))?;
        let Some(c) = self.char else {
            return Err(self.ctx.stop_at(Code::UnclosedString, self.line, self.column, &[]));
        };
        if ESCAPEABLE.contains(c) {
            self.next_char(None)?;
            return Ok(());
        }
        if c == 'u' {
            if self.next_char(Some('u'))? == Some('{') {
                if self.ctx.json_mode {
                    self.ctx
                        .warn_at(Code::UnexpectedA, self.line, self.column - 1, &["{"]);
                }
                if self.some_digits(is_hex, false)? > 5 {
                    self.ctx
                        .warn_at(Code::TooManyDigits, self.line, self.column - 1, &[]);
                }
                if self.char != Some('}') {
                    let saw = self.char.map(String::from).unwrap_or_default();
                    return Err(self.ctx.stop_at(
                        Code::ExpectedABeforeB,
                        self.line,
                        self.column,
                        &["}", &saw],
                    ));
                }
                self.next_char(None)?;
                return Ok(());
            }
            self.back_char();
            if self.some_digits(is_hex, true)? < 4 {
                self.ctx
                    .warn_at(Code::ExpectedFourDigits, self.line, self.column - 1, &[]);
            }
            return Ok(());
        }
        if extra.contains(c) {
            self.next_char(None)?;
            return Ok(());
        }
        self.ctx.warn_at(
            Code::UnexpectedABeforeB,
            self.line,
            self.column.saturating_sub(2),
            &["\\", &c.to_string()],
        );
        Ok(())
    }

    /// Append a token and return its number
    fn make(&mut self, id: &str, value: Option<String>, identifier: bool) -> usize {
        let nr = self.ctx.tokens.len();
        let mut token = crate::token::Token::new(nr, id, self.line, self.from, self.column);
        token.identifier = identifier;
        token.value = value;
        if id != "(comment)" && id != ";" {
            self.ctx.directive_mode = false;
        }
        if identifier
            && self
                .prior
                .and_then(|p| self.ctx.tokens.get(p))
                .is_some_and(|p| p.id == ".")
        {
            token.dot = true;
        }
        let previous = self
            .ctx
            .tokens
            .last()
            .map(|p| (p.nr, p.line, p.thru, p.id.clone()));
        self.ctx.tokens.push(token);

        if let Some((prev_nr, prev_line, prev_thru, prev_id)) = previous {
            if prev_line == self.line
                && prev_thru == self.from
                && matches!(id, "(comment)" | "(regexp)" | "/")
                && matches!(prev_id.as_str(), "(comment)" | "(regexp)")
            {
                let a = self.ctx.artifact(prev_nr);
                let b = self.ctx.artifact(nr);
                self.ctx.warn(Code::ExpectedSpaceAB, nr, &[&a, &b]);
            }
            if prev_id == "." && id == "(number)" {
                self.ctx.warn(Code::ExpectedABeforeB, prev_nr, &["0", "."]);
            }
        }
        if id != "(comment)" {
            self.prior = Some(nr);
        }
        nr
    }

    /// Apply the items of a directive body
    fn parse_directive(&mut self, comment: usize, kind: DirectiveKind, body: &str) -> LintResult<()> {
        let part = Pattern::DirectivePart.regex()?;
        let mut body = body.to_string();
        loop {
            let (name, value, rest) = match part.captures(&body) {
                Some(caps) => (
                    caps.get(1).map_or("", |m| m.as_str()).to_string(),
                    caps.get(2).map(|m| m.as_str().to_string()),
                    caps.get(3).map_or("", |m| m.as_str()).to_string(),
                ),
                None if body.is_empty() => return Ok(()),
                None => return Err(self.ctx.stop(Code::BadDirectiveA, comment, &[&body])),
            };
            match kind {
                DirectiveKind::Jslint => match name.parse::<OptionName>() {
                    Ok(option) => match value.as_deref() {
                        None | Some("") | Some("true") => self.ctx.enable_option(option),
                        Some("false") => self.ctx.options.set(option, false),
                        Some(other) => {
                            let shown = format!("{name}:{other}");
                            self.ctx.warn(Code::BadOptionA, comment, &[&shown]);
                        }
                    },
                    Err(_) => {
                        self.ctx.warn(Code::BadOptionA, comment, &[&name]);
                    }
                },
                DirectiveKind::Property => {
                    self.ctx.tenure.get_or_insert_with(Default::default).insert(name);
                }
                DirectiveKind::Global => {
                    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                        let shown = format!("{name}:{value}");
                        self.ctx.warn(Code::BadOptionA, comment, &[&shown]);
                    }
                    self.ctx.declared_globals.insert(name);
                    self.ctx.module_mode = ModuleMode::GlobalDirective(comment);
                }
            }
            body = rest;
        }
    }

    /// Make a comment token and process a directive it carries
    fn comment(&mut self, text: String) -> LintResult<usize> {
        let nr = self.make("(comment)", Some(text.clone()), false);
        if !self.option(OptionName::Devel) && Pattern::Todo.is_match(&text)? {
            self.ctx.warn(Code::TodoComment, nr, &[]);
        }
        let directive = Pattern::Directive.regex()?.captures(&text).and_then(|caps| {
            let kind = DirectiveKind::from_word(caps.get(1)?.as_str())?;
            Some((kind, caps.get(2).map_or("", |m| m.as_str()).to_string()))
        });
        if let Some((kind, body)) = directive {
            if !self.ctx.directive_mode {
                self.ctx.warn_at(
                    Code::MisplacedDirectiveA,
                    self.line,
                    self.from,
                    &[kind.as_str()],
                );
            } else {
                self.ctx.tokens[nr].directive = Some(kind);
                self.parse_directive(nr, kind, &body)?;
            }
            self.ctx.directives.push(nr);
        }
        Ok(nr)
    }

    fn string(&mut self, quote: char) -> LintResult<usize> {
        self.snippet.clear();
        self.next_char(None)?;
        loop {
            match self.char {
                Some(c) if c == quote => {
                    self.snip();
                    let value = std::mem::take(&mut self.snippet);
                    let nr = self.make("(string)", Some(value), false);
                    self.ctx.tokens[nr].quote = Some(quote);
                    return Ok(nr);
                }
                None => {
                    return Err(self
                        .ctx
                        .stop_at(Code::UnclosedString, self.line, self.column, &[]));
                }
                Some('\\') => {
                    let extra = quote.to_string();
                    self.escape(&extra)?;
                }
                Some('`') => {
                    if self.mega_mode {
                        self.ctx
                            .warn_at(Code::UnexpectedA, self.line, self.column, &["`"]);
                    }
                    self.next_char(Some('`'))?;
                }
                Some(_) => {
                    self.next_char(None)?;
                }
            }
        }
    }

    /// Fraction and exponent of a number
    fn frack(&mut self) -> LintResult<()> {
        if self.char == Some('.') {
            self.some_digits(is_digit, false)?;
        }
        if matches!(self.char, Some('E' | 'e')) {
            self.next_char(None)?;
            if !matches!(self.char, Some('+' | '-')) {
                self.back_char();
            }
            self.some_digits(is_digit, false)?;
        }
        Ok(())
    }

    fn number(&mut self) -> LintResult<usize> {
        if self.snippet == "0" {
            self.next_char(None)?;
            match self.char {
                Some('.') => self.frack()?,
                Some('b') => {
                    self.some_digits(|c| matches!(c, '0' | '1'), false)?;
                }
                Some('o') => {
                    self.some_digits(|c| matches!(c, '0'..='7'), false)?;
                }
                Some('x') => {
                    self.some_digits(is_hex, false)?;
                }
                _ => {}
            }
        } else {
            self.next_char(None)?;
            self.frack()?;
        }
        if self.char.is_some_and(|c| c.is_ascii_alphanumeric()) {
            let mut head = self.snippet.clone();
            let last = head.pop().map(String::from).unwrap_or_default();
            return Err(self.ctx.stop_at(
                Code::UnexpectedAAfterB,
                self.line,
                self.column - 1,
                &[&last, &head],
            ));
        }
        self.back_char();
        let value = self.snippet.clone();
        Ok(self.make("(number)", Some(value), false))
    }

    /// Template literal: the opening tick, string parts, substitution
    /// tokens, and the closing tick
    fn mega(&mut self) -> LintResult<usize> {
        if self.mega_mode {
            return Err(self
                .ctx
                .stop_at(Code::ExpectedAB, self.line, self.column, &["}", "`"]));
        }
        self.snippet.clear();
        self.mega_from = self.from;
        self.mega_line = self.line;
        self.mega_mode = true;
        self.make("`", None, false);
        self.from += 1;

        loop {
            let rest = self.rest();
            let found = rest.iter().enumerate().position(|(i, &c)| {
                c == '`' || c == '\\' || (c == '$' && rest.get(i + 1) == Some(&'{'))
            });
            let Some(at) = found else {
                let line = self.rest_string();
                self.snippet.push_str(&line);
                self.snippet.push('\n');
                if !self.next_line() {
                    return Err(self.ctx.stop_at(
                        Code::UnclosedMega,
                        self.mega_line,
                        self.mega_from,
                        &[],
                    ));
                }
                continue;
            };
            let head: String = rest[..at].iter().collect();
            self.snippet.push_str(&head);
            self.column += at;
            self.pos += at;
            match self.peek() {
                Some('\\') => {
                    let pair: String = self.rest().iter().take(2).collect();
                    self.snippet.push_str(&pair);
                    self.pos += 2;
                    self.column += 2;
                    continue;
                }
                Some('$') => {
                    let value = std::mem::take(&mut self.snippet);
                    let nr = self.make("(string)", Some(value), false);
                    self.ctx.tokens[nr].quote = Some('`');
                    self.column += 2;
                    self.make("${", None, false);
                    self.pos += 2;
                    loop {
                        let nr = self.lex()?;
                        match self.ctx.tokens[nr].id.as_str() {
                            "{" => {
                                return Err(self.ctx.stop_at(
                                    Code::ExpectedAB,
                                    self.line,
                                    self.column,
                                    &["}", "{"],
                                ));
                            }
                            "}" => break,
                            _ => {}
                        }
                    }
                    self.snippet.clear();
                }
                _ => {
                    let value = std::mem::take(&mut self.snippet);
                    let nr = self.make("(string)", Some(value), false);
                    self.ctx.tokens[nr].quote = Some('`');
                    break;
                }
            }
        }
        self.pos += 1;
        self.column += 1;
        self.mega_mode = false;
        Ok(self.make("`", None, false))
    }

    /// `/* ... */`, possibly spanning lines
    fn block_comment(&mut self) -> LintResult<usize> {
        let mut parts = Vec::new();
        if self.peek() == Some('/') {
            self.ctx.warn_at(Code::UnexpectedA, self.line, self.column, &["/"]);
        }
        let end = loop {
            if let Some(i) = find_chars(self.rest(), &['*', '/']) {
                break i;
            }
            if let Some(j) = find_chars(self.rest(), &['/', '*']) {
                self.ctx.warn_at(Code::NestedComment, self.line, self.column + j, &[]);
            }
            parts.push(self.rest_string());
            if !self.next_line() {
                return Err(self
                    .ctx
                    .stop_at(Code::UnclosedComment, self.line, self.column, &[]));
            }
        };
        let body: Vec<char> = self.rest()[..end].to_vec();
        let nested = find_chars(&body, &['/', '*'])
            .or_else(|| (body.last() == Some(&'/')).then(|| body.len() - 1));
        if let Some(j) = nested {
            self.ctx.warn_at(Code::NestedComment, self.line, self.column + j, &[]);
        }
        parts.push(body.iter().collect());
        self.column += end + 2;
        self.pos += end + 2;
        self.comment(parts.join(" "))
    }

    /// A `/` that is either division or the start of a regexp literal
    fn slash(&mut self) -> LintResult<usize> {
        let prior = self.prior.and_then(|p| self.ctx.tokens.get(p));
        let (identifier, dot, prior_id) = match prior {
            Some(t) => (t.identifier, t.dot, t.id.clone()),
            None => (false, false, "(global)".to_string()),
        };
        if identifier {
            if !dot {
                match prior_id.as_str() {
                    "return" => return self.regexp(),
                    "case" | "delete" | "in" | "instanceof" | "new" | "typeof" | "void"
                    | "yield" => {
                        let nr = self.regexp()?;
                        return Err(self.ctx.stop(Code::UnexpectedA, nr, &[]));
                    }
                    _ => {}
                }
            }
        } else {
            let last = prior_id.chars().last().unwrap_or(' ');
            if "(,=:?[".contains(last) {
                return self.regexp();
            }
            if "!&|{};~+-*%/^<>".contains(last) {
                let nr = self.regexp()?;
                self.ctx.warn(Code::WrapRegexp, nr, &[]);
                return Ok(nr);
            }
        }
        if self.peek() == Some('=') {
            self.column += 1;
            self.pos += 1;
            self.snippet = "/=".to_string();
            self.ctx.warn_at(Code::UnexpectedA, self.line, self.column, &["/="]);
        }
        let id = self.snippet.clone();
        Ok(self.make(&id, None, false))
    }

    /// Make the next token
    fn lex(&mut self) -> LintResult<usize> {
        loop {
            while self.rest().is_empty() {
                let more = self.has_line && self.next_line();
                self.from = 0;
                if !more {
                    if self.mega_mode {
                        return Err(self.ctx.stop_at(
                            Code::UnclosedMega,
                            self.mega_line,
                            self.mega_from,
                            &[],
                        ));
                    }
                    return Ok(self.make("(end)", None, false));
                }
            }
            self.from = self.column;
            let Some((lexeme, length)) = match_token(self.rest()) else {
                let c = self.peek().map(String::from).unwrap_or_default();
                return Err(self
                    .ctx
                    .stop_at(Code::UnexpectedCharA, self.line, self.column, &[&c]));
            };
            self.snippet = self.rest()[..length].iter().collect();
            self.column += length;
            self.pos += length;

            match lexeme {
                Lexeme::Whitespace => continue,
                Lexeme::Identifier => {
                    let id = self.snippet.clone();
                    return Ok(self.make(&id, None, true));
                }
                Lexeme::Number => return self.number(),
                Lexeme::Punctuator => {}
            }

            return match self.snippet.as_str() {
                "\"" => self.string('"'),
                "'" => {
                    self.ctx.warn_at(Code::UseDouble, self.line, self.column, &[]);
                    self.string('\'')
                }
                "`" => self.mega(),
                "//" => {
                    let text = self.rest_string();
                    self.pos = self.chars.len();
                    let nr = self.comment(text)?;
                    if self.mega_mode {
                        self.ctx.warn(Code::UnexpectedComment, nr, &["`"]);
                    }
                    Ok(nr)
                }
                "/*" => self.block_comment(),
                "/" => self.slash(),
                _ => {
                    let id = self.snippet.clone();
                    Ok(self.make(&id, None, false))
                }
            };
        }
    }
}

/// Regular expression literals
impl Lexer<'_> {
    fn regexp(&mut self) -> LintResult<usize> {
        self.multi_mode = false;
        self.regexp_seen = true;
        self.snippet.clear();
        self.next_char(None)?;
        if self.char == Some('=') {
            self.ctx
                .warn_at(Code::ExpectedABeforeB, self.line, self.column, &["\\", "="]);
        }
        self.regexp_choice()?;

        self.snip();
        let value = self.snippet.clone();
        self.next_char(Some('/'))?;

        let mut allowed = String::from("gimuy");
        let mut flags = String::new();
        while let Some(c) = self.char.filter(char::is_ascii_alphabetic) {
            if let Some(at) = allowed.find(c) {
                allowed.remove(at);
            } else {
                self.ctx
                    .warn_at(Code::UnexpectedA, self.line, self.column, &[&c.to_string()]);
            }
            if !flags.contains(c) {
                flags.push(c);
            }
            self.next_char(None)?;
        }
        self.back_char();
        if let Some(c @ ('/' | '*')) = self.char {
            return Err(self
                .ctx
                .stop_at(Code::UnexpectedA, self.line, self.from, &[&c.to_string()]));
        }
        let nr = self.make("(regexp)", None, false);
        let token = &mut self.ctx.tokens[nr];
        token.value = Some(value);
        token.flags = Some(flags.clone());
        if self.multi_mode && !flags.contains('m') {
            self.ctx.warn_at(Code::MissingM, self.line, self.column, &[]);
        }
        Ok(nr)
    }

    fn regexp_quantifier(&mut self) -> LintResult<()> {
        match self.char {
            Some('?' | '*' | '+') => {
                self.next_char(None)?;
            }
            Some('{') => {
                if self.some_digits(is_digit, true)? == 0 {
                    self.ctx
                        .warn_at(Code::ExpectedABeforeB, self.line, self.column, &["0", ","]);
                }
                if self.char == Some(',') {
                    self.some_digits(is_digit, true)?;
                }
                self.next_char(Some('}'))?;
            }
            _ => return Ok(()),
        }
        if self.char == Some('?') {
            self.next_char(Some('?'))?;
        }
        Ok(())
    }

    /// One character of a class; false at the end of the class
    fn regexp_subklass(&mut self) -> LintResult<bool> {
        match self.char {
            Some('\\') => {
                self.escape("BbDdSsWw-[]^")?;
                return Ok(true);
            }
            None | Some('[' | ']' | '/' | '^' | '-') => return Ok(false),
            Some(' ') => {
                self.ctx
                    .warn_at(Code::ExpectedAB, self.line, self.column, &["\\u0020", " "]);
            }
            Some('`') if self.mega_mode => {
                self.ctx.warn_at(Code::UnexpectedA, self.line, self.column, &["`"]);
            }
            Some(_) => {}
        }
        self.next_char(None)?;
        Ok(true)
    }

    fn regexp_ranges(&mut self) -> LintResult<()> {
        while self.regexp_subklass()? {
            if self.char == Some('-') {
                self.next_char(Some('-'))?;
                if !self.regexp_subklass()? {
                    return Err(self.ctx.stop_at(
                        Code::UnexpectedA,
                        self.line,
                        self.column - 1,
                        &["-"],
                    ));
                }
            }
        }
        Ok(())
    }

    fn regexp_klass(&mut self) -> LintResult<()> {
        self.next_char(Some('['))?;
        if self.char == Some('^') {
            self.next_char(Some('^'))?;
        }
        loop {
            self.regexp_ranges()?;
            match self.char {
                Some(c) if c != ']' => {
                    self.ctx.warn_at(
                        Code::ExpectedABeforeB,
                        self.line,
                        self.column - 1,
                        &["\\", &c.to_string()],
                    );
                    self.next_char(None)?;
                }
                _ => break,
            }
        }
        self.next_char(Some(']'))?;
        Ok(())
    }

    fn regexp_group(&mut self) -> LintResult<()> {
        self.next_char(Some('('))?;
        match self.char {
            Some('?') => {
                self.next_char(Some('?'))?;
                match self.char {
                    Some('<') => {
                        self.next_char(Some('<'))?;
                        if self.char == Some('!') {
                            self.next_char(Some('!'))?;
                        } else {
                            self.next_char(Some('='))?;
                        }
                    }
                    Some('=' | '!') => {
                        self.next_char(None)?;
                    }
                    _ => {
                        self.next_char(Some(':'))?;
                    }
                }
            }
            Some(':') => {
                self.ctx
                    .warn_at(Code::ExpectedABeforeB, self.line, self.column, &["?", ":"]);
            }
            _ => {}
        }
        self.regexp_choice()?;
        self.next_char(Some(')'))?;
        Ok(())
    }

    /// One factor; false at the end of a sequence
    fn regexp_factor(&mut self) -> LintResult<bool> {
        let Some(c) = self.char else {
            return Ok(false);
        };
        match c {
            '/' | ']' | ')' => return Ok(false),
            '(' => {
                self.regexp_group()?;
                return Ok(true);
            }
            '[' => {
                self.regexp_klass()?;
                return Ok(true);
            }
            '\\' => {
                self.escape("BbDdSsWw^${}[]():=!.|*+?")?;
                return Ok(true);
            }
            '?' | '+' | '*' | '}' | '{' => {
                self.ctx.warn_at(
                    Code::ExpectedABeforeB,
                    self.line,
                    self.column - 1,
                    &["\\", &c.to_string()],
                );
            }
            '`' => {
                if self.mega_mode {
                    self.ctx
                        .warn_at(Code::UnexpectedA, self.line, self.column - 1, &["`"]);
                }
            }
            ' ' => {
                self.ctx
                    .warn_at(Code::ExpectedAB, self.line, self.column - 1, &["\\s", " "]);
            }
            '$' => {
                if self.peek() != Some('/') {
                    self.multi_mode = true;
                }
            }
            '^' => {
                if self.snippet != "^" {
                    self.multi_mode = true;
                }
            }
            _ => {}
        }
        self.next_char(None)?;
        Ok(true)
    }

    fn regexp_sequence(&mut self) -> LintResult<()> {
        let mut follow = false;
        while self.regexp_factor()? {
            self.regexp_quantifier()?;
            follow = true;
        }
        if !follow {
            let c = self.char.map(String::from).unwrap_or_default();
            self.ctx
                .warn_at(Code::ExpectedRegexpFactorA, self.line, self.column, &[&c]);
        }
        Ok(())
    }

    /// Alternatives separated by `|`
    fn regexp_choice(&mut self) -> LintResult<()> {
        loop {
            self.regexp_sequence()?;
            if self.char != Some('|') {
                return Ok(());
            }
            self.next_char(Some('|'))?;
        }
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_js_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Position of the first occurrence of a two-character sequence
fn find_chars(haystack: &[char], needle: &[char; 2]) -> Option<usize> {
    haystack.windows(2).position(|w| w == needle)
}

/// Match the longest token shape at the start of a line remainder
fn match_token(rest: &[char]) -> Option<(Lexeme, usize)> {
    if rest.iter().any(|c| matches!(c, '\u{2028}' | '\u{2029}')) {
        return None;
    }
    let first = *rest.first()?;
    let at = |i: usize| rest.get(i).copied();
    let count = |pred: &dyn Fn(char) -> bool| rest.iter().take_while(|&&c| pred(c)).count();

    if is_js_space(first) {
        return Some((Lexeme::Whitespace, count(&is_js_space)));
    }
    if first.is_ascii_alphabetic() || first == '_' || first == '$' {
        let length = count(&|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        return Some((Lexeme::Identifier, length));
    }
    let length = match first {
        '0' => return Some((Lexeme::Number, 1)),
        '1'..='9' => return Some((Lexeme::Number, count(&|c| c.is_ascii_digit()))),
        '(' | ')' | '{' | '}' | '[' | ']' | ',' | ':' | ';' | '\'' | '"' | '~' | '`' => 1,
        '?' => 1 + usize::from(matches!(at(1), Some('?' | '.'))),
        '=' => match (at(1), at(2)) {
            (Some('='), Some('=')) => 3,
            (Some('=' | '>'), _) => 2,
            _ => 1,
        },
        '.' => count(&|c| c == '.'),
        '*' => 1 + usize::from(matches!(at(1), Some('*' | '/' | '='))),
        '/' => 1 + usize::from(matches!(at(1), Some('*' | '/'))),
        '+' => 1 + usize::from(matches!(at(1), Some('=' | '+'))),
        '-' => 1 + usize::from(matches!(at(1), Some('=' | '-'))),
        '^' | '%' => 1 + usize::from(at(1) == Some('=')),
        '&' => 1 + usize::from(matches!(at(1), Some('&' | '='))),
        '|' => 1 + usize::from(matches!(at(1), Some('|' | '='))),
        '>' => {
            let arrows = count(&|c| c == '>').min(3);
            arrows + usize::from(at(arrows) == Some('='))
        }
        '<' => {
            let arrows = 1 + usize::from(at(1) == Some('<'));
            arrows + usize::from(at(arrows) == Some('='))
        }
        '!' => match (at(1), at(2)) {
            (Some('!'), _) => 2,
            (Some('='), Some('=')) => 3,
            (Some('='), _) => 2,
            _ => 1,
        },
        _ => return None,
    };
    Some((Lexeme::Punctuator, length))
}

//! Splits raw arguments into classified tokens, lazily.

use crate::low_level::{HasParam, NameTable};
use crate::parser::Name;
use std::collections::VecDeque;
use std::iter::Peekable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Always and only the first argument.
    ExeName(String),
    Short { name: char, value: Option<String> },
    Long { name: String, value: Option<String> },
    Plain(String),
}

fn looks_like_flag(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

/// Whether a name takes a value is read from the table, so a short flag's trailing characters
/// are either its value or more flags depending on how it was declared.
pub struct Tokens<'a, I: Iterator<Item = String>> {
    args: Peekable<I>,
    names: &'a NameTable,
    pending: VecDeque<Token>,
    started: bool,
}

impl<'a, I: Iterator<Item = String>> Tokens<'a, I> {
    pub fn new<A: IntoIterator<IntoIter = I>>(args: A, names: &'a NameTable) -> Self {
        Self {
            args: args.into_iter().peekable(),
            names,
            pending: VecDeque::new(),
            started: false,
        }
    }

    fn takes_value(&self, name: &Name) -> bool {
        self.names.has_param(name) == Some(HasParam::Yes)
    }

    /// The following argument, unless it is itself a flag.
    fn next_value(&mut self) -> Option<String> {
        match self.args.peek() {
            Some(next) if !looks_like_flag(next) => self.args.next(),
            _ => None,
        }
    }

    fn scan_long(&mut self, long: &str) -> Token {
        match long.split_once('=') {
            Some((name, value)) => Token::Long {
                name: name.to_string(),
                value: Some(value.to_string()),
            },
            None => {
                let name = long.to_string();
                let value = if self.takes_value(&Name::Long(name.clone())) {
                    self.next_value()
                } else {
                    None
                };
                Token::Long { name, value }
            }
        }
    }

    fn scan_shorts(&mut self, shorts: &str) {
        for (i, short) in shorts.char_indices() {
            if self.takes_value(&Name::Short(short)) {
                let rest = &shorts[i + short.len_utf8()..];
                let value = if rest.is_empty() {
                    self.next_value()
                } else {
                    Some(rest.to_string())
                };
                self.pending.push_back(Token::Short { name: short, value });
                return;
            }
            self.pending.push_back(Token::Short {
                name: short,
                value: None,
            });
        }
    }
}

impl<'a, I: Iterator<Item = String>> Iterator for Tokens<'a, I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if !self.started {
            self.started = true;
            return self.args.next().map(Token::ExeName);
        }
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let arg = self.args.next()?;
            if arg.is_empty() {
                continue;
            }
            if let Some(long) = arg.strip_prefix("--") {
                return Some(self.scan_long(long));
            }
            match arg.strip_prefix('-') {
                Some(shorts) if !shorts.is_empty() => self.scan_shorts(shorts),
                _ => return Some(Token::Plain(arg)),
            }
        }
    }
}

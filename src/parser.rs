use crate::error::{BindResult, ParseError, ParseOutcome, ParseResult, SpecError};
use crate::help::{ArgHelpNamed, ArgHelpPositional, Help};
use crate::low_level::{HasParam, NameTable, Target, Unique};
use crate::token::{Token, Tokens};
use std::env;
use std::fmt;
use std::ops::Add;
use std::process;
use std::str::FromStr;
use tracing::{debug, trace};

#[derive(Debug, Hash, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub enum Name {
    Long(String),
    Short(char),
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Self::Long(long) => write!(f, "--{}", long),
            Self::Short(short) => write!(f, "-{}", short),
        }
    }
}

pub trait IntoName {
    fn into_name(self) -> Name;
}

impl IntoName for Name {
    fn into_name(self) -> Name {
        self
    }
}

impl IntoName for char {
    fn into_name(self) -> Name {
        Name::Short(self)
    }
}

impl<'a> IntoName for &'a str {
    fn into_name(self) -> Name {
        Name::Long(self.to_string())
    }
}

impl IntoName for String {
    fn into_name(self) -> Name {
        Name::Long(self)
    }
}

type FlagBinder<C> = Box<dyn Fn(&mut C) -> BindResult>;
type ValueBinder<C> = Box<dyn Fn(&mut C, &str) -> BindResult>;
type ExeBinder<C> = Box<dyn Fn(&mut C, String)>;

/// Converts the raw value with `FromStr` before handing it to `bind`.
fn converting<C, T, F>(bind: F) -> ValueBinder<C>
where
    C: 'static,
    T: FromStr + 'static,
    F: Fn(&mut C, T) -> BindResult + 'static,
{
    Box::new(move |config: &mut C, raw: &str| {
        let value = raw
            .parse::<T>()
            .map_err(|_| ParseError::unconvertible(raw))?;
        bind(config, value)
    })
}

/// How an option reacts to being matched. The variant also decides whether the option takes a
/// value, so that never has to be guessed from the arguments.
pub enum Binder<C> {
    Flag(FlagBinder<C>),
    Value { hint: String, bind: ValueBinder<C> },
}

impl<C> Binder<C> {
    pub fn has_param(&self) -> HasParam {
        match self {
            Self::Flag(_) => HasParam::No,
            Self::Value { .. } => HasParam::Yes,
        }
    }

    fn hint(&self) -> Option<&str> {
        match self {
            Self::Flag(_) => None,
            Self::Value { hint, .. } => Some(hint.as_str()),
        }
    }
}

/// A named option.
pub struct Opt<C> {
    names: Vec<Name>,
    description: Option<String>,
    binder: Binder<C>,
}

impl<C: 'static> Opt<C> {
    pub fn new(binder: Binder<C>) -> Self {
        Self {
            names: Vec::new(),
            description: None,
            binder,
        }
    }

    /// Sets a `bool` field. Passing the flag again is harmless.
    pub fn flag<F>(field: F) -> Self
    where
        F: Fn(&mut C) -> &mut bool + 'static,
    {
        Self::flag_with(move |config: &mut C| {
            *field(config) = true;
            Ok(())
        })
    }

    pub fn flag_with<F>(bind: F) -> Self
    where
        F: Fn(&mut C) -> BindResult + 'static,
    {
        Self::new(Binder::Flag(Box::new(bind)))
    }

    /// Parses the value and assigns it to a field.
    pub fn value<T, F, H>(field: F, hint: H) -> Self
    where
        T: FromStr + 'static,
        F: Fn(&mut C) -> &mut T + 'static,
        H: AsRef<str>,
    {
        Self::value_with(
            move |config: &mut C, value: T| {
                *field(config) = value;
                Ok(())
            },
            hint,
        )
    }

    /// Parses the value and appends it to a list field.
    pub fn values<T, F, H>(field: F, hint: H) -> Self
    where
        T: FromStr + 'static,
        F: Fn(&mut C) -> &mut Vec<T> + 'static,
        H: AsRef<str>,
    {
        Self::value_with(
            move |config: &mut C, value: T| {
                field(config).push(value);
                Ok(())
            },
            hint,
        )
    }

    pub fn value_with<T, F, H>(bind: F, hint: H) -> Self
    where
        T: FromStr + 'static,
        F: Fn(&mut C, T) -> BindResult + 'static,
        H: AsRef<str>,
    {
        Self::new(Binder::Value {
            hint: hint.as_ref().to_string(),
            bind: converting(bind),
        })
    }
}

impl<C> Opt<C> {
    pub fn name<N: IntoName>(mut self, name: N) -> Self {
        self.names.push(name.into_name());
        self
    }

    pub fn desc<S: AsRef<str>>(mut self, description: S) -> Self {
        self.description = Some(description.as_ref().to_string());
        self
    }

    pub fn names(&self) -> &[Name] {
        &self.names
    }

    fn bind(&self, config: &mut C, name: Name, value: Option<String>) -> BindResult {
        match (&self.binder, value) {
            (Binder::Flag(bind), None) => bind(config),
            (Binder::Flag(_), Some(value)) => Err(ParseError::UnexpectedValue { name, value }),
            (Binder::Value { bind, .. }, Some(value)) => bind(config, &value),
            (Binder::Value { .. }, None) => Err(ParseError::MissingValue(name)),
        }
    }

    fn help_message(&self) -> ArgHelpNamed {
        ArgHelpNamed {
            names: self.names.clone(),
            hint: self.binder.hint().map(str::to_string),
            description: self.description.clone(),
        }
    }
}

/// The positional sink. Every token that isn't a flag is fed to it, in order.
pub struct Arg<C> {
    hint: String,
    description: Option<String>,
    bind: ValueBinder<C>,
}

impl<C: 'static> Arg<C> {
    pub fn values<T, F, H>(field: F, hint: H) -> Self
    where
        T: FromStr + 'static,
        F: Fn(&mut C) -> &mut Vec<T> + 'static,
        H: AsRef<str>,
    {
        Self::value_with(
            move |config: &mut C, value: T| {
                field(config).push(value);
                Ok(())
            },
            hint,
        )
    }

    pub fn value_with<T, F, H>(bind: F, hint: H) -> Self
    where
        T: FromStr + 'static,
        F: Fn(&mut C, T) -> BindResult + 'static,
        H: AsRef<str>,
    {
        Self {
            hint: hint.as_ref().to_string(),
            description: None,
            bind: converting(bind),
        }
    }
}

impl<C> Arg<C> {
    pub fn desc<S: AsRef<str>>(mut self, description: S) -> Self {
        self.description = Some(description.as_ref().to_string());
        self
    }
}

/// Receives the first argument, unvalidated.
pub struct ExeName<C> {
    bind: ExeBinder<C>,
}

impl<C: 'static> ExeName<C> {
    pub fn new<F>(field: F) -> Self
    where
        F: Fn(&mut C) -> &mut String + 'static,
    {
        Self {
            bind: Box::new(move |config: &mut C, program_name: String| {
                *field(config) = program_name;
            }),
        }
    }
}

/// Stops parsing when matched and reports that help was asked for.
pub struct HelpFlag<C> {
    names: Vec<Name>,
    description: String,
    bind: FlagBinder<C>,
}

impl<C: 'static> HelpFlag<C> {
    /// Answers to `-?`, `-h` and `--help`.
    pub fn new<F>(field: F) -> Self
    where
        F: Fn(&mut C) -> &mut bool + 'static,
    {
        Self {
            names: vec![Name::Short('?'), Name::Short('h'), Name::Long("help".to_string())],
            description: "display usage information".to_string(),
            bind: Box::new(move |config: &mut C| {
                *field(config) = true;
                Ok(())
            }),
        }
    }
}

impl<C> HelpFlag<C> {
    pub fn desc<S: AsRef<str>>(mut self, description: S) -> Self {
        self.description = description.as_ref().to_string();
        self
    }

    pub fn name<N: IntoName>(mut self, name: N) -> Self {
        self.names.push(name.into_name());
        self
    }
}

/// A complete or partial command line. Build one from [`Opt`], [`Arg`], [`ExeName`] and
/// [`HelpFlag`] values joined with `+`.
pub struct Parser<C> {
    exe_name: Option<ExeName<C>>,
    help: Option<HelpFlag<C>>,
    opts: Vec<Opt<C>>,
    positional: Option<Arg<C>>,
    names: NameTable,
}

impl<C> Default for Parser<C> {
    fn default() -> Self {
        Self {
            exe_name: None,
            help: None,
            opts: Vec::new(),
            positional: None,
            names: NameTable::default(),
        }
    }
}

fn unique<T>(left: Option<T>, right: Option<T>, which: Unique) -> Result<Option<T>, SpecError> {
    match (left, right) {
        (Some(_), Some(_)) => Err(SpecError::RepeatedUnique(which)),
        (left, right) => Ok(left.or(right)),
    }
}

impl<C> Parser<C> {
    pub fn try_compose<P: IntoParser<C>>(self, other: P) -> Result<Self, SpecError> {
        let Parser {
            exe_name,
            help,
            opts,
            positional,
            names,
        } = other.into_parser()?;
        let mut composed = self;
        composed.exe_name = unique(composed.exe_name, exe_name, Unique::ExeName)?;
        composed.help = unique(composed.help, help, Unique::Help)?;
        composed.positional = unique(composed.positional, positional, Unique::Positional)?;
        composed.names.merge(names, composed.opts.len())?;
        composed.opts.extend(opts);
        Ok(composed)
    }

    /// Every name this parser answers to, in composition order.
    pub fn aliases(&self) -> Vec<Name> {
        self.opts
            .iter()
            .flat_map(|opt| opt.names.iter())
            .chain(self.help.iter().flat_map(|help| help.names.iter()))
            .cloned()
            .collect()
    }

    pub fn recognises(&self, name: &Name) -> bool {
        self.names.contains(name)
    }

    pub fn help<S: Into<String>>(&self, program_name: S) -> Help {
        let mut help = Help::new(program_name.into());
        if let Some(positional) = &self.positional {
            help.positional.push(ArgHelpPositional {
                hint: positional.hint.clone(),
                description: positional.description.clone(),
            });
        }
        help.named.extend(self.opts.iter().map(|opt| opt.help_message()));
        if let Some(help_flag) = &self.help {
            help.named.push(ArgHelpNamed {
                names: help_flag.names.clone(),
                hint: None,
                description: Some(help_flag.description.clone()),
            });
        }
        help
    }

    /// Binds `args` into `config` in a single pass. The first argument is the program name.
    ///
    /// Stops at the first problem. Fields already assigned by then keep their new values.
    pub fn parse<A, S>(&self, config: &mut C, args: A) -> ParseResult<ParseOutcome>
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        debug!(options = self.opts.len(), "parsing arguments");
        for token in Tokens::new(args.into_iter().map(Into::<String>::into), &self.names) {
            trace!(?token, "dispatching token");
            let matched = match token {
                Token::ExeName(program_name) => {
                    if let Some(exe_name) = &self.exe_name {
                        (exe_name.bind)(config, program_name);
                    }
                    None
                }
                Token::Short { name, value } => self.dispatch(config, Name::Short(name), value)?,
                Token::Long { name, value } => self.dispatch(config, Name::Long(name), value)?,
                Token::Plain(value) => match &self.positional {
                    Some(positional) => {
                        (positional.bind)(config, &value)?;
                        None
                    }
                    None => return Err(ParseError::UnrecognizedToken(value)),
                },
            };
            if let Some(outcome) = matched {
                debug!(?outcome, "stopped early");
                return Ok(outcome);
            }
        }
        Ok(ParseOutcome::Matched)
    }

    fn dispatch(
        &self,
        config: &mut C,
        name: Name,
        value: Option<String>,
    ) -> ParseResult<Option<ParseOutcome>> {
        let arg_ref = self
            .names
            .get(&name)
            .ok_or_else(|| ParseError::UnrecognizedToken(name.to_string()))?;
        match arg_ref.target {
            Target::Help => {
                if let Some(value) = value {
                    return Err(ParseError::UnexpectedValue { name, value });
                }
                if let Some(help) = &self.help {
                    (help.bind)(config)?;
                }
                Ok(Some(ParseOutcome::HelpRequested))
            }
            Target::Opt(index) => {
                self.opts[index].bind(config, name, value)?;
                Ok(None)
            }
        }
    }

    /// Parses the process arguments, printing help and exiting when asked, or printing the
    /// error and help and exiting with status 2 on failure.
    pub fn parse_env_or_exit(&self, config: &mut C) {
        let program_name = env::args().next().unwrap_or_default();
        match self.parse(config, env::args()) {
            Ok(ParseOutcome::Matched) => (),
            Ok(ParseOutcome::HelpRequested) => {
                println!("{}", self.help(program_name));
                process::exit(0);
            }
            Err(error) => {
                eprintln!("{}\n", error);
                eprintln!("{}", self.help(program_name));
                process::exit(2);
            }
        }
    }
}

pub trait IntoParser<C> {
    fn into_parser(self) -> Result<Parser<C>, SpecError>;
}

impl<C> IntoParser<C> for Parser<C> {
    fn into_parser(self) -> Result<Parser<C>, SpecError> {
        Ok(self)
    }
}

impl<C> IntoParser<C> for Opt<C> {
    fn into_parser(self) -> Result<Parser<C>, SpecError> {
        if self.names.is_empty() {
            return Err(SpecError::OptWithNoNames);
        }
        let mut names = NameTable::default();
        names.register(&self.names, Target::Opt(0), self.binder.has_param())?;
        Ok(Parser {
            opts: vec![self],
            names,
            ..Parser::default()
        })
    }
}

impl<C> IntoParser<C> for Arg<C> {
    fn into_parser(self) -> Result<Parser<C>, SpecError> {
        Ok(Parser {
            positional: Some(self),
            ..Parser::default()
        })
    }
}

impl<C> IntoParser<C> for ExeName<C> {
    fn into_parser(self) -> Result<Parser<C>, SpecError> {
        Ok(Parser {
            exe_name: Some(self),
            ..Parser::default()
        })
    }
}

impl<C> IntoParser<C> for HelpFlag<C> {
    fn into_parser(self) -> Result<Parser<C>, SpecError> {
        let mut names = NameTable::default();
        names.register(&self.names, Target::Help, HasParam::No)?;
        Ok(Parser {
            help: Some(self),
            names,
            ..Parser::default()
        })
    }
}

macro_rules! impl_add {
    ($($ty:ident),*) => {
        $(
            /// Composition. Panics if the two sides share a name or both hold a slot that may
            /// only appear once; use [`Parser::try_compose`] to get the error instead.
            impl<C, R: IntoParser<C>> Add<R> for $ty<C> {
                type Output = Parser<C>;

                fn add(self, rhs: R) -> Parser<C> {
                    match self.into_parser().and_then(|parser| parser.try_compose(rhs)) {
                        Ok(parser) => parser,
                        Err(e) => panic!("{}", e),
                    }
                }
            }
        )*
    };
}

impl_add!(Parser, Opt, Arg, ExeName, HelpFlag);

use crate::error::SpecError;
use crate::parser::Name;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasParam {
    Yes,
    No,
}

/// What a registered name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Index into the parser's option list.
    Opt(usize),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgRef {
    pub target: Target,
    pub has_param: HasParam,
}

/// Slots a composed parser may hold at most one of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unique {
    ExeName,
    Help,
    Positional,
}

impl fmt::Display for Unique {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Self::ExeName => write!(f, "executable name"),
            Self::Help => write!(f, "help flag"),
            Self::Positional => write!(f, "positional argument"),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct NameTable {
    name_to_arg_ref: HashMap<Name, ArgRef>,
}

impl NameTable {
    pub fn register(
        &mut self,
        names: &[Name],
        target: Target,
        has_param: HasParam,
    ) -> Result<(), SpecError> {
        let arg_ref = ArgRef { target, has_param };
        for name in names {
            if self.name_to_arg_ref.contains_key(name) {
                return Err(SpecError::NameUsedMultipleTimes(name.clone()));
            }
            self.name_to_arg_ref.insert(name.clone(), arg_ref);
        }
        Ok(())
    }

    /// Absorbs `other`, whose option indices are shifted up by `opt_offset`.
    pub fn merge(&mut self, other: NameTable, opt_offset: usize) -> Result<(), SpecError> {
        for (name, ArgRef { target, has_param }) in other.name_to_arg_ref {
            let target = match target {
                Target::Opt(index) => Target::Opt(index + opt_offset),
                Target::Help => Target::Help,
            };
            self.register(&[name], target, has_param)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &Name) -> Option<ArgRef> {
        self.name_to_arg_ref.get(name).copied()
    }

    pub fn has_param(&self, name: &Name) -> Option<HasParam> {
        self.get(name).map(|arg_ref| arg_ref.has_param)
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.name_to_arg_ref.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.name_to_arg_ref.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_arg_ref.is_empty()
    }
}

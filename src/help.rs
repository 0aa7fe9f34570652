use crate::parser::Name;
use std::fmt;

const ARG_SINGLE_LINE_MAX_ARG_LENGTH: usize = 16;
const OPT_SINGLE_LINE_MAX_ARG_LENGTH: usize = 32;
const DESCRIPTION_LEFT_PAD: usize = 4;

#[derive(Debug, Clone)]
pub struct ArgHelpPositional {
    pub hint: String,
    pub description: Option<String>,
}

impl ArgHelpPositional {
    fn usage(&self) -> String {
        format!("[{} ...]", self.hint)
    }
}

#[derive(Debug, Clone)]
pub struct ArgHelpNamed {
    pub names: Vec<Name>,
    pub hint: Option<String>,
    pub description: Option<String>,
}

impl ArgHelpNamed {
    fn usage(&self) -> String {
        let name_list = self
            .names
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        match self.hint.as_ref() {
            Some(hint) => format!("{} <{}>", name_list, hint),
            None => name_list,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Help {
    pub program_name: String,
    pub positional: Vec<ArgHelpPositional>,
    pub named: Vec<ArgHelpNamed>,
}

impl Help {
    pub fn new(program_name: String) -> Self {
        Self {
            program_name,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }
}

/// Writes one section of aligned `usage  description` rows. Rows whose usage is too wide to
/// share a line with a description put the description on the next line instead.
fn write_section(
    f: &mut fmt::Formatter,
    title: &str,
    parts: &[(String, Option<&String>)],
    single_line_max: usize,
) -> Result<(), fmt::Error> {
    let width = parts
        .iter()
        .filter_map(|(usage, _)| (usage.len() < single_line_max).then_some(usage.len()))
        .max()
        .unwrap_or(0)
        + DESCRIPTION_LEFT_PAD;
    write!(f, "\n\n{}:", title)?;
    for (usage, description) in parts {
        writeln!(f)?;
        match description {
            Some(description) if usage.len() < single_line_max => {
                write!(f, "    {:width$} {}", usage, description, width = width)?
            }
            Some(description) => {
                writeln!(f, "    {}", usage)?;
                write!(f, "                {}", description)?;
            }
            None => write!(f, "    {}", usage)?,
        }
    }
    Ok(())
}

impl fmt::Display for Help {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Usage: {} [OPTIONS]", self.program_name)?;
        for p in &self.positional {
            write!(f, " {}", p.usage())?;
        }
        if !self.positional.is_empty() {
            let parts = self
                .positional
                .iter()
                .map(|p| (p.usage(), p.description.as_ref()))
                .collect::<Vec<_>>();
            write_section(f, "Args", &parts, ARG_SINGLE_LINE_MAX_ARG_LENGTH)?;
        }
        if !self.named.is_empty() {
            let parts = self
                .named
                .iter()
                .map(|n| (n.usage(), n.description.as_ref()))
                .collect::<Vec<_>>();
            write_section(f, "Options", &parts, OPT_SINGLE_LINE_MAX_ARG_LENGTH)?;
        }
        Ok(())
    }
}

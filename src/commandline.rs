//! The command line of a unit-test runner, bound into [`ConfigData`].

use crate::error::{ok, runtime_error, BindResult, ParseError};
use crate::parser::{Arg, ExeName, HelpFlag, Opt, Parser};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarnAbout(u8);

impl WarnAbout {
    pub const NOTHING: Self = Self(0x00);
    pub const NO_ASSERTIONS: Self = Self(0x01);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WarnAbout {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WarnAbout {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowDurations {
    #[default]
    DefaultForReporter,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunOrder {
    #[default]
    InDeclarationOrder,
    InLexicographicalOrder,
    InRandomOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UseColour {
    #[default]
    Auto,
    /// Always colour.
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigData {
    pub list_tests: bool,
    pub list_tags: bool,
    pub list_reporters: bool,
    pub list_test_names_only: bool,

    pub show_successful_tests: bool,
    pub should_debug_break: bool,
    pub no_throw: bool,
    pub show_help: bool,
    pub show_invisibles: bool,
    pub filenames_as_tags: bool,

    /// Negative means never abort.
    pub abort_after: i32,
    pub rng_seed: u32,

    pub warnings: WarnAbout,
    pub show_durations: ShowDurations,
    pub run_order: RunOrder,
    pub use_colour: UseColour,

    pub output_filename: String,
    pub name: String,
    pub process_name: String,

    pub reporter_names: Vec<String>,
    pub tests_or_tags: Vec<String>,
    pub sections_to_run: Vec<String>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            list_tests: false,
            list_tags: false,
            list_reporters: false,
            list_test_names_only: false,
            show_successful_tests: false,
            should_debug_break: false,
            no_throw: false,
            show_help: false,
            show_invisibles: false,
            filenames_as_tags: false,
            abort_after: -1,
            rng_seed: 0,
            warnings: WarnAbout::NOTHING,
            show_durations: ShowDurations::DefaultForReporter,
            run_order: RunOrder::InDeclarationOrder,
            use_colour: UseColour::Auto,
            output_filename: String::new(),
            name: String::new(),
            process_name: String::new(),
            reporter_names: Vec::new(),
            tests_or_tags: Vec::new(),
            sections_to_run: Vec::new(),
        }
    }
}

fn set_warning(config: &mut ConfigData, warning: String) -> BindResult {
    if warning != "NoAssertions" {
        return runtime_error(format!("Unrecognised warning: '{}'", warning));
    }
    config.warnings |= WarnAbout::NO_ASSERTIONS;
    ok()
}

const SELECTOR_PADDING: &[char] = &[' ', '\t', '\n', '\r'];

/// One selector per line, read leniently: bytes that are not UTF-8 are replaced rather than
/// failing the load. Blank lines and `#` comments are skipped, and each selector is quoted
/// (unless it already is) and given a trailing comma. Only ASCII spaces, tabs and line ends
/// are trimmed.
fn load_test_names_from_file(config: &mut ConfigData, filename: String) -> BindResult {
    let path = PathBuf::from(filename);
    let unavailable = |source: io::Error| ParseError::ResourceUnavailable {
        path: path.clone(),
        source,
    };
    let reader = BufReader::new(File::open(&path).map_err(unavailable)?);
    let before = config.tests_or_tags.len();
    for line in reader.split(b'\n') {
        let line = line.map_err(unavailable)?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim_matches(SELECTOR_PADDING);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let selector = if line.starts_with('"') {
            format!("{},", line)
        } else {
            format!("\"{}\",", line)
        };
        config.tests_or_tags.push(selector);
    }
    debug!(
        path = %path.display(),
        selectors = config.tests_or_tags.len() - before,
        "loaded test names"
    );
    ok()
}

/// Accepts any prefix of `declared`, `lexical` or `random`.
fn set_test_order(config: &mut ConfigData, order: String) -> BindResult {
    config.run_order = if "declared".starts_with(order.as_str()) {
        RunOrder::InDeclarationOrder
    } else if "lexical".starts_with(order.as_str()) {
        RunOrder::InLexicographicalOrder
    } else if "random".starts_with(order.as_str()) {
        RunOrder::InRandomOrder
    } else {
        return runtime_error(format!("Unrecognised ordering: '{}'", order));
    };
    ok()
}

fn set_rng_seed(config: &mut ConfigData, seed: String) -> BindResult {
    if seed != "time" {
        config.rng_seed = seed
            .parse()
            .map_err(|_| ParseError::unconvertible(&seed))?;
        return ok();
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    config.rng_seed = now as u32;
    ok()
}

fn set_colour_usage(config: &mut ConfigData, use_colour: String) -> BindResult {
    config.use_colour = match use_colour.to_lowercase().as_str() {
        "yes" => UseColour::Yes,
        "no" => UseColour::No,
        "auto" => UseColour::Auto,
        _ => {
            return runtime_error(format!(
                "colour mode must be one of: auto, yes or no. '{}' not recognised",
                use_colour
            ))
        }
    };
    ok()
}

/// Program name, help and the listing and display switches.
pub fn listing_options() -> Parser<ConfigData> {
    ExeName::new(|c: &mut ConfigData| &mut c.process_name)
        + HelpFlag::new(|c: &mut ConfigData| &mut c.show_help)
        + Opt::flag(|c: &mut ConfigData| &mut c.list_tests)
            .name('l')
            .name("list-tests")
            .desc("list all/matching test cases")
        + Opt::flag(|c: &mut ConfigData| &mut c.list_tags)
            .name('t')
            .name("list-tags")
            .desc("list all/matching tags")
        + Opt::flag(|c: &mut ConfigData| &mut c.show_successful_tests)
            .name('s')
            .name("success")
            .desc("include successful tests in output")
        + Opt::flag(|c: &mut ConfigData| &mut c.should_debug_break)
            .name('b')
            .name("break")
            .desc("break into debugger on failure")
        + Opt::flag(|c: &mut ConfigData| &mut c.no_throw)
            .name('e')
            .name("nothrow")
            .desc("skip exception tests")
        + Opt::flag(|c: &mut ConfigData| &mut c.show_invisibles)
            .name('i')
            .name("invisibles")
            .desc("show invisibles (tabs, newlines)")
}

/// Output, reporting and failure handling.
pub fn run_options() -> Parser<ConfigData> {
    Opt::value(|c: &mut ConfigData| &mut c.output_filename, "filename")
        .name('o')
        .name("out")
        .desc("output filename")
        + Opt::values(|c: &mut ConfigData| &mut c.reporter_names, "name")
            .name('r')
            .name("reporter")
            .desc("reporter to use (defaults to console)")
        + Opt::value(|c: &mut ConfigData| &mut c.name, "name")
            .name('n')
            .name("name")
            .desc("suite name")
        + Opt::flag_with(|c: &mut ConfigData| {
            c.abort_after = 1;
            ok()
        })
        .name('a')
        .name("abort")
        .desc("abort at first failure")
        + Opt::value_with(
            |c: &mut ConfigData, x: i32| {
                c.abort_after = x;
                ok()
            },
            "no. failures",
        )
        .name('x')
        .name("abortx")
        .desc("abort after x failures")
        + Opt::value_with(set_warning, "warning name")
            .name('w')
            .name("warn")
            .desc("enable warnings")
        + Opt::flag_with(|c: &mut ConfigData| {
            c.show_durations = ShowDurations::Always;
            ok()
        })
        .name('d')
        .name("durations")
        .desc("show test durations")
        + Opt::value_with(load_test_names_from_file, "filename")
            .name('f')
            .name("input-file")
            .desc("load test names to run from a file")
}

/// Test selection and ordering, plus the positional test specs.
pub fn selection_options() -> Parser<ConfigData> {
    Opt::flag(|c: &mut ConfigData| &mut c.filenames_as_tags)
        .name('#')
        .name("filenames-as-tags")
        .desc("adds a tag for the filename")
        + Opt::values(|c: &mut ConfigData| &mut c.sections_to_run, "section name")
            .name('c')
            .name("section")
            .desc("specify section to run")
        + Opt::flag(|c: &mut ConfigData| &mut c.list_test_names_only)
            .name("list-test-names-only")
            .desc("list all/matching test cases names only")
        + Opt::flag(|c: &mut ConfigData| &mut c.list_reporters)
            .name("list-reporters")
            .desc("list all reporters")
        + Opt::value_with(set_test_order, "decl|lex|rand")
            .name("order")
            .desc("test case order (defaults to decl)")
        + Opt::value_with(set_rng_seed, "'time'|number")
            .name("rng-seed")
            .desc("set a specific seed for random numbers")
        + Opt::value_with(set_colour_usage, "yes|no")
            .name("use-colour")
            .desc("should output be colourised")
        + Arg::values(|c: &mut ConfigData| &mut c.tests_or_tags, "test name|pattern|tags")
            .desc("which test or tests to use")
}

pub fn make_command_line_parser() -> Parser<ConfigData> {
    listing_options() + run_options() + selection_options()
}

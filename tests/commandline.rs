use argbind::commandline::{
    listing_options, make_command_line_parser, run_options, selection_options, ConfigData,
    RunOrder, ShowDurations, UseColour, WarnAbout,
};
use argbind::{ErrorKind, ParseError, ParseOutcome, ParseResult};
use rstest::rstest;
use std::io::Write;

fn parse(args: &[&str]) -> (ConfigData, ParseResult<ParseOutcome>) {
    let mut config = ConfigData::default();
    let result = make_command_line_parser().parse(&mut config, args.iter().copied());
    (config, result)
}

fn parse_ok(args: &[&str]) -> ConfigData {
    let (config, result) = parse(args);
    assert_eq!(result.unwrap(), ParseOutcome::Matched);
    config
}

#[test]
fn success_and_break_leave_everything_else_alone() {
    let config = parse_ok(&["prog", "-s", "-b"]);
    assert_eq!(
        config,
        ConfigData {
            process_name: "prog".to_string(),
            show_successful_tests: true,
            should_debug_break: true,
            ..ConfigData::default()
        }
    );
}

#[test]
fn bundled_short_flags() {
    let config = parse_ok(&["prog", "-sb"]);
    assert!(config.show_successful_tests);
    assert!(config.should_debug_break);
}

#[rstest]
#[case(&["prog", "-l"][..])]
#[case(&["prog", "--list-tests"][..])]
fn list_tests_aliases(#[case] args: &[&str]) {
    assert!(parse_ok(args).list_tests);
}

#[test]
fn every_switch_is_reachable() {
    let config = parse_ok(&[
        "prog",
        "--list-tags",
        "--nothrow",
        "--invisibles",
        "-#",
        "--list-test-names-only",
        "--list-reporters",
        "--durations",
    ]);
    assert!(config.list_tags);
    assert!(config.no_throw);
    assert!(config.show_invisibles);
    assert!(config.filenames_as_tags);
    assert!(config.list_test_names_only);
    assert!(config.list_reporters);
    assert_eq!(config.show_durations, ShowDurations::Always);
}

#[test]
fn repeating_a_flag_is_not_an_error() {
    let config = parse_ok(&["prog", "-s", "--success", "-s"]);
    assert!(config.show_successful_tests);
}

#[test]
fn abortx_takes_a_number() {
    assert_eq!(parse_ok(&["prog", "--abortx", "3"]).abort_after, 3);
    assert_eq!(parse_ok(&["prog", "-x5"]).abort_after, 5);
    assert_eq!(parse_ok(&["prog", "--abortx=7"]).abort_after, 7);
    assert_eq!(parse_ok(&["prog", "-a"]).abort_after, 1);
    assert_eq!(parse_ok(&["prog"]).abort_after, -1);

    let (_, result) = parse(&["prog", "--abortx", "nope"]);
    let error = result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidValue);
    assert!(error.to_string().contains("nope"));
}

#[test]
fn last_abort_setting_wins() {
    assert_eq!(parse_ok(&["prog", "-x", "4", "-a"]).abort_after, 1);
    assert_eq!(parse_ok(&["prog", "-a", "-x", "4"]).abort_after, 4);
}

#[rstest]
#[case("decl", RunOrder::InDeclarationOrder)]
#[case("lex", RunOrder::InLexicographicalOrder)]
#[case("rand", RunOrder::InRandomOrder)]
fn order(#[case] keyword: &str, #[case] expected: RunOrder) {
    assert_eq!(parse_ok(&["prog", "--order", keyword]).run_order, expected);
}

#[test]
fn unknown_order_names_the_keyword() {
    let (_, result) = parse(&["prog", "--order", "weird"]);
    let error = result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidValue);
    assert!(error.to_string().contains("weird"));
}

#[test]
fn colour_mode_is_case_insensitive() {
    assert_eq!(
        parse_ok(&["prog", "--use-colour", "YES"]).use_colour,
        UseColour::Yes
    );
    assert_eq!(
        parse_ok(&["prog", "--use-colour=no"]).use_colour,
        UseColour::No
    );
    let (_, result) = parse(&["prog", "--use-colour", "maybe"]);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidValue);
}

#[test]
fn warnings() {
    assert!(parse_ok(&["prog", "-w", "NoAssertions"])
        .warnings
        .contains(WarnAbout::NO_ASSERTIONS));
    let (config, result) = parse(&["prog", "--warn", "Loud"]);
    assert_eq!(
        result.unwrap_err().to_string(),
        "Unrecognised warning: 'Loud'"
    );
    assert_eq!(config.warnings, WarnAbout::NOTHING);
}

#[test]
fn rng_seed() {
    assert_eq!(parse_ok(&["prog", "--rng-seed", "42"]).rng_seed, 42);
    let (_, result) = parse(&["prog", "--rng-seed", "soon"]);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidValue);
}

#[test]
fn string_and_list_values() {
    let config = parse_ok(&[
        "prog", "-o", "out.xml", "-r", "junit", "--reporter", "console", "-n", "suite", "-c",
        "first", "--section=second",
    ]);
    assert_eq!(config.output_filename, "out.xml");
    assert_eq!(config.reporter_names, ["junit", "console"]);
    assert_eq!(config.name, "suite");
    assert_eq!(config.sections_to_run, ["first", "second"]);
}

#[test]
fn positionals_accumulate_in_order() {
    let config = parse_ok(&["prog", "first test", "-s", "[tag]", "wild*"]);
    assert_eq!(config.tests_or_tags, ["first test", "[tag]", "wild*"]);
    assert!(config.show_successful_tests);
}

#[test]
fn input_file_selectors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "foo\n#comment\n\n\"bar\"\n").unwrap();
    let path = file.path().to_str().unwrap();
    let config = parse_ok(&["prog", "-f", path]);
    assert_eq!(config.tests_or_tags, ["\"foo\",", "\"bar\","]);
}

#[test]
fn input_file_appends_after_positionals() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "  spaced name  ").unwrap();
    let path = file.path().to_str().unwrap();
    let config = parse_ok(&["prog", "cli", "--input-file", path]);
    assert_eq!(config.tests_or_tags, ["cli", "\"spaced name\","]);
}

#[test]
fn input_file_with_invalid_utf8_keeps_every_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"foo\n\xff\xfebad\nbar\n").unwrap();
    let path = file.path().to_str().unwrap();
    let config = parse_ok(&["prog", "-f", path]);
    assert_eq!(config.tests_or_tags.len(), 3);
    assert_eq!(config.tests_or_tags[0], "\"foo\",");
    assert!(config.tests_or_tags[1].contains("bad"));
    assert_eq!(config.tests_or_tags[2], "\"bar\",");
}

#[test]
fn input_file_keeps_non_ascii_whitespace() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "\u{a0}nbsp name\u{a0}\r\n").unwrap();
    let path = file.path().to_str().unwrap();
    let config = parse_ok(&["prog", "-f", path]);
    assert_eq!(config.tests_or_tags, ["\"\u{a0}nbsp name\u{a0}\","]);
}

#[test]
fn unreadable_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let (config, result) = parse(&["prog", "-s", "-f", missing.to_str().unwrap(), "-b"]);
    let error = result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ResourceUnavailable);
    assert!(matches!(error, ParseError::ResourceUnavailable { ref path, .. } if *path == missing));
    // no rollback, and nothing after the failure is applied
    assert!(config.show_successful_tests);
    assert!(!config.should_debug_break);
}

#[rstest]
#[case(&["prog", "-z"][..], "Unrecognised token: -z")]
#[case(&["prog", "--bogus"][..], "Unrecognised token: --bogus")]
#[case(&["prog", "--"][..], "Unrecognised token: --")]
#[case(&["prog", "--order"][..], "Expected argument following --order")]
#[case(&["prog", "-o", "-s"][..], "Expected argument following -o")]
#[case(&["prog", "--success=yes"][..], "Unexpected value 'yes' given to flag --success")]
fn malformed_command_lines(#[case] args: &[&str], #[case] message: &str) {
    let (_, result) = parse(args);
    assert_eq!(result.unwrap_err().to_string(), message);
}

#[rstest]
#[case("-?")]
#[case("-h")]
#[case("--help")]
fn help_short_circuits(#[case] flag: &str) {
    let (config, result) = parse(&["prog", "-s", flag, "--not-a-flag"]);
    assert_eq!(result.unwrap(), ParseOutcome::HelpRequested);
    assert!(config.show_help);
    assert!(config.show_successful_tests);
}

#[test]
fn groups_compose_in_any_order() {
    let forward = listing_options() + run_options() + selection_options();
    let backward = selection_options() + run_options() + listing_options();
    let mut forward_aliases = forward.aliases();
    let mut backward_aliases = backward.aliases();
    forward_aliases.sort();
    backward_aliases.sort();
    assert_eq!(forward_aliases, backward_aliases);

    let args = ["prog", "-s", "--order", "rand", "-x", "2", "name"];
    let mut from_forward = ConfigData::default();
    let mut from_backward = ConfigData::default();
    forward.parse(&mut from_forward, args).unwrap();
    backward.parse(&mut from_backward, args).unwrap();
    assert_eq!(from_forward, from_backward);
}

#[test]
fn parsing_is_repeatable() {
    let parser = make_command_line_parser();
    let args = ["prog", "-s", "-r", "xml", "--use-colour", "no", "a", "b"];
    let mut first = ConfigData::default();
    let mut second = ConfigData::default();
    parser.parse(&mut first, args).unwrap();
    parser.parse(&mut second, args).unwrap();
    assert_eq!(first, second);
}

#[test]
fn help_text_follows_composition_order() {
    let text = make_command_line_parser().help("prog").to_string();
    assert!(text.starts_with("Usage: prog [OPTIONS] [test name|pattern|tags ...]"));
    let positions = ["--list-tests", "--out <filename>", "--use-colour <yes|no>", "--help"]
        .iter()
        .map(|needle| text.find(needle).unwrap())
        .collect::<Vec<_>>();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

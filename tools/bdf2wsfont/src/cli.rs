//! Command line parsing and [`ConvertConfig`] construction.

use std::path::PathBuf;

use bdf2wsfont::{ConvertConfig, Mode, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

/// Parses `bdf2wsfont`'s arguments to construct a [`ConvertConfig`].
pub fn get_config() -> ConvertConfig {
    parse_arguments(&command_parser().get_matches())
}

/// Parses the arguments required to produce a valid [`ConvertConfig`].
pub fn parse_arguments(matches: &ArgMatches) -> ConvertConfig {
    let mode = if matches.get_flag("print") {
        Mode::PrintAll
    } else {
        let table = matches
            .get_one::<PathBuf>("table")
            .cloned()
            .unwrap_or_else(|| unreachable!("`table` is required unless `print` is present"));
        Mode::Header { table }
    };

    let input = matches
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| unreachable!("`input` is a required argument"));

    let verbosity = if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else {
        Verbosity::from_verbose_count(matches.get_count("verbose"))
    };

    ConvertConfig {
        mode,
        input,
        output: matches.get_one::<PathBuf>("output").cloned(),
        name: matches.get_one::<String>("name").cloned(),
        verbosity,
    }
}

/// Returns the command parser for `bdf2wsfont`.
pub fn command_parser() -> Command {
    let print = Arg::new("print")
        .short('p')
        .long("print")
        .help("Print every glyph of the font in source order instead of a wsfont header")
        .action(ArgAction::SetTrue);

    let table = Arg::new("table")
        .short('t')
        .long("table")
        .env("BDF2WSFONT_TABLE")
        .help("Translation table mapping output slots to font encodings")
        .value_parser(value_parser!(PathBuf))
        .required_unless_present("print");

    let input = Arg::new("input")
        .short('i')
        .long("input")
        .help("BDF font to convert")
        .value_parser(value_parser!(PathBuf))
        .required(true);

    let output = Arg::new("output")
        .short('o')
        .long("output")
        .help("File to write to instead of standard output")
        .value_parser(value_parser!(PathBuf));

    let name = Arg::new("name")
        .short('n')
        .long("name")
        .help("Identifier for the emitted symbols [default: input file stem]");

    let verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help("Report progress; repeat to report every parsed property")
        .action(ArgAction::Count);

    let quiet = Arg::new("quiet")
        .short('q')
        .long("quiet")
        .help("Only report errors")
        .action(ArgAction::SetTrue)
        .conflicts_with("verbose");

    Command::new("bdf2wsfont")
        .about("Converts a BDF font into a wsdisplay_font C header")
        .arg(print)
        .arg(table)
        .arg(input)
        .arg(output)
        .arg(name)
        .arg(verbose)
        .arg(quiet)
        .arg_required_else_help(true)
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use bdf2wsfont::{Mode, Verbosity};

    use super::{command_parser, parse_arguments};

    fn parse(args: &[&str]) -> Result<bdf2wsfont::ConvertConfig, clap::Error> {
        let matches = command_parser().try_get_matches_from(args)?;
        Ok(parse_arguments(&matches))
    }

    #[test]
    fn header_mode() {
        let config = parse(&["bdf2wsfont", "-t", "cp437.txt", "-i", "ter-u16n.bdf"]).unwrap();

        assert_eq!(
            config.mode,
            Mode::Header {
                table: PathBuf::from("cp437.txt")
            }
        );
        assert_eq!(config.input, PathBuf::from("ter-u16n.bdf"));
        assert_eq!(config.output, None);
        assert_eq!(config.name, None);
        assert_eq!(config.verbosity, Verbosity::Normal);
    }

    #[test]
    fn print_mode_needs_no_table() {
        let config = parse(&["bdf2wsfont", "-p", "-i", "font.bdf", "-vv"]).unwrap();

        assert_eq!(config.mode, Mode::PrintAll);
        assert_eq!(config.verbosity, Verbosity::Trace);
    }

    #[test]
    fn output_and_name() {
        let config = parse(&[
            "bdf2wsfont",
            "--table",
            "t.txt",
            "--input",
            "f.bdf",
            "--output",
            "f.h",
            "--name",
            "gallant",
            "-q",
        ])
        .unwrap();

        assert_eq!(config.output, Some(PathBuf::from("f.h")));
        assert_eq!(config.name.as_deref(), Some("gallant"));
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn input_is_required() {
        assert!(parse(&["bdf2wsfont", "-p"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(parse(&["bdf2wsfont", "-p", "-i", "f.bdf", "-q", "-v"]).is_err());
    }
}

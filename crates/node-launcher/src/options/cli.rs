//! # Command Line Front End
//!
//! Builds the `clap` command from the descriptor table and turns the parsed
//! matches into an [`OptionTable`]. Every option can also be supplied through
//! its `QC_*` environment variable; both count as "explicitly set", the
//! compiled-in default never does.

use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::options::descriptor::{OptionKind, OPTIONS};
use crate::options::table::{OptionTable, OptionValue};

/// Switch that prints the resolved configuration instead of starting the node.
pub const DUMP_CONFIG: &str = "dumpconfig";

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub options: OptionTable,
    /// `--dumpconfig` was given.
    pub dump_config: bool,
}

/// Build the `clap` command for every descriptor.
#[must_use]
pub fn command() -> Command {
    let mut cmd = Command::new("qc-node")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Quantum-Chain node")
        .arg(
            Arg::new(DUMP_CONFIG)
                .long(DUMP_CONFIG)
                .action(ArgAction::SetTrue)
                .help("Print the resolved configuration as TOML and exit"),
        );

    for d in OPTIONS {
        let mut arg = Arg::new(d.name)
            .long(d.name)
            .help(d.usage)
            .help_heading(d.category.heading())
            .env(d.env_var());

        arg = match d.kind {
            OptionKind::Bool => arg.action(ArgAction::SetTrue),
            kind => {
                let mut arg = arg.action(ArgAction::Set).value_name(kind.value_name());
                if kind == OptionKind::Int {
                    arg = arg.allow_negative_numbers(true);
                }
                match d.default {
                    Some(default) => arg.default_value(default),
                    None => arg,
                }
            }
        };
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Parse the process arguments, exiting with usage help on grammar errors.
#[must_use]
pub fn parse() -> Invocation {
    Invocation::from_matches(&command().get_matches())
}

/// Parse an explicit argument list.
pub fn try_parse_from<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Ok(Invocation::from_matches(&matches))
}

impl Invocation {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            options: OptionTable::from_matches(matches),
            dump_config: matches.get_flag(DUMP_CONFIG),
        }
    }
}

impl OptionTable {
    /// Convert parsed matches, recording which values the user supplied.
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut table = OptionTable::defaults();
        for d in OPTIONS {
            let explicit = matches!(
                matches.value_source(d.name),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            );
            if !explicit {
                continue;
            }
            let raw = match d.kind {
                OptionKind::Bool => Some(matches.get_flag(d.name).to_string()),
                _ => matches.get_one::<String>(d.name).cloned(),
            };
            table.insert(d.name, OptionValue { raw, explicit });
        }
        table
    }
}

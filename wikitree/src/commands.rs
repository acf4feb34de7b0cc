use crate::CLAP_STYLING;
use clap::{arg, command};
use wikitree_scanner::source::DEFAULT_BASE_URL;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikitree")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikitree")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(--"cache-dir" <PATH>)
                .required(false)
                .global(true)
                .help("Directory holding cached crawl trees")
                .default_value("~/.cache/wikitree"),
        )
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .global(true)
                .help("Base URL of the encyclopedia; topics are appended as one path segment")
                .default_value(DEFAULT_BASE_URL),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .global(true)
                .help("Per-request timeout when fetching pages")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(--"max-pages" <NUM>)
                .required(false)
                .global(true)
                .help("Largest page budget a request may ask for")
                .value_parser(clap::value_parser!(usize))
                .default_value("20"),
        )
        .subcommand_required(true)
        .subcommand(
            command!("serve")
                .about("Serves topic trees over HTTP at /api?topic=<TOPIC>&pages=<PAGES>")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to listen on (default: 0.0.0.0:$PORT, PORT defaults to 3000)"),
                ),
        )
        .subcommand(
            command!("crawl")
                .about("Crawls the See also links outward from a topic and prints the tree")
                .arg(arg!(<TOPIC>).help("The root topic, e.g. Bees"))
                .arg(
                    arg!(-p --"pages" <PAGES>)
                        .required(false)
                        .help("Page budget for the crawl")
                        .default_value("5"),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the tree as JSON instead of an indented tree"),
                )
                .arg(
                    arg!(--"no-cache")
                        .required(false)
                        .help("Always crawl; neither read nor write the cache"),
                ),
        )
}

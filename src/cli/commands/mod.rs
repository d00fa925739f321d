use crate::{
    checker::DEFAULT_MAX_CONCURRENCY,
    tls::{DEFAULT_TIMEOUT, MAX_TIMEOUT},
};
use clap::{
    Arg, ArgAction, ArgGroup, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("config")
                .env("CERTSWEEP_CONFIG")
                .help("YAML file with a `hosts` list")
                .long("config")
                .long_help(
                    "YAML file listing the hosts to check:\n\n\
                    hosts:\n  \
                      - example.com\n  \
                      - example.org:8443\n  \
                      - \"[::1]:443\"\n\n\
                    Entries without a port use 443."
                )
                .short('C')
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("domains")
                .env("CERTSWEEP_DOMAINS")
                .help("Comma-separated list of hosts, e.g. example.com,example.org:8443")
                .long("domains")
                .short('d')
                .value_name("LIST"),
        )
        .group(
            ArgGroup::new("hosts")
                .args(["config", "domains"])
                .required(true)
                .multiple(false),
        )
        .arg(
            Arg::new("timeout")
                .default_value(DEFAULT_TIMEOUT.as_secs().to_string())
                .env("CERTSWEEP_TIMEOUT")
                .help("Seconds allowed per host for connect + TLS handshake")
                .long("timeout")
                .short('t')
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..=MAX_TIMEOUT.as_secs())),
        )
        .arg(
            Arg::new("insecure")
                .env("CERTSWEEP_INSECURE")
                .help("Skip certificate chain verification")
                .long("insecure")
                .long_help(
                    "Skip certificate chain and hostname verification.\n\
                    The leaf certificate is still reported, which is useful \
                    for expired or self-signed certificates."
                )
                .short('k')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .default_value("table")
                .env("CERTSWEEP_OUTPUT")
                .help("Output format")
                .long("output")
                .short('o')
                .value_name("FORMAT")
                .value_parser(["table", "json", "yaml"]),
        )
        .arg(
            Arg::new("ca")
                .env("CERTSWEEP_CA")
                .help("PEM bundle with extra trust anchors")
                .long("ca")
                .long_help(
                    "Path to a PEM file with extra Certificate Authorities.\n\
                    They are trusted on top of the bundled web PKI roots.\n\
                    Ignored with --insecure.\n\n\
                    Example: /etc/ssl/certs/internal-ca.pem"
                )
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("concurrency")
                .default_value(DEFAULT_MAX_CONCURRENCY.to_string())
                .env("CERTSWEEP_CONCURRENCY")
                .help("Maximum number of hosts checked at the same time")
                .long("concurrency")
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .help("Increase verbosity, -v info, -vv debug, -vvv trace")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
}

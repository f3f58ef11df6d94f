pub mod authn;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const CMD_SERVER: &str = "server";
pub const CMD_VERIFY: &str = "verify";

fn server() -> Command {
    Command::new(CMD_SERVER)
        .about("Serve POST /login backed by the allow-list and token service")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ORGAUTH_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
}

fn verify() -> Command {
    Command::new(CMD_VERIFY)
        .about("Verify a single credential and print the resulting principal")
        .arg(
            Arg::new("organization")
                .short('o')
                .long("organization")
                .help("Organization the user belongs to")
                .env("ORGAUTH_ORGANIZATION")
                .required(true),
        )
        .arg(
            Arg::new("username")
                .long("username")
                .help("Username to verify")
                .env("ORGAUTH_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Password to verify")
                .env("ORGAUTH_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("orgauth")
        .about("Organization-scoped password authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(authn::with_args(server()))
        .subcommand(authn::with_args(verify()));

    logging::with_args(command)
}

use std::io::Write;

use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::{debug, Level};

use fwrite::error::FormatProblem;
use fwrite::format::Format;
use fwrite::value::Value;
use fwrite::writing::{IoFlags, Session, Sink, CRLF, LF};

static SUMMARY: &str = r#"status: {status}
iostat: {iostat}
values: {values}
descriptors: {descriptors}
"#;

#[derive(Serialize)]
struct Summary {
    status: String,
    iostat: i32,
    values: usize,
    descriptors: usize,
}

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("fwrite")
        .version(VERSION)
        .propagate_version(true)
        .about("Write one formatted record from a legacy edit descriptor format.")
        .arg(
            Arg::new("non-advancing")
                .short('n')
                .long("non-advancing")
                .action(ArgAction::SetTrue)
                .help("Do not end the record with a line terminator."),
        )
        .arg(
            Arg::new("terminator")
                .short('t')
                .long("terminator")
                .value_parser(["lf", "crlf", "none"])
                .default_value("lf")
                .help("Line terminator placed between and after records."),
        )
        .arg(
            Arg::new("status")
                .short('s')
                .long("status")
                .action(ArgAction::SetTrue)
                .help("Print a summary of the write status to standard error."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log what the writer is doing to standard error."),
        )
        .arg(
            Arg::new("format")
                .required(true)
                .help("The format, for example \"('x =', I4, 2F8.3)\" or \"*\"."),
        )
        .arg(
            Arg::new("values")
                .num_args(0..)
                .allow_hyphen_values(true)
                .help("Values to write: integers, reals, .true./.false., (re,im), or text."),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if matches.get_flag("verbose") {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    let text = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("*");

    let format = match Format::parse(text) {
        Ok(format) => format,
        Err(error) => {
            eprintln!(
                "{}",
                FormatProblem::new(&error, text).full_details()
            );
            std::process::exit(1);
        }
    };
    let descriptors = format
        .descriptors()
        .len();

    let values: Vec<Value> = matches
        .get_many::<String>("values")
        .map(|values| {
            values
                .map(|value| Value::parse(value))
                .collect()
        })
        .unwrap_or_default();
    debug!(?values);

    let terminator = match matches
        .get_one::<String>("terminator")
        .map(String::as_str)
    {
        Some("crlf") => CRLF,
        Some("none") => "",
        _ => LF,
    };

    let mut flags = IoFlags::new()
        .non_advancing(matches.get_flag("non-advancing"))
        .terminator(terminator);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    {
        let mut session = Session::new(Sink::stream(&mut handle), format).with_flags(&mut flags);
        session.write(&values);
    }

    if matches.get_flag("status") {
        let summary = Summary {
            status: match flags.error() {
                Some(error) => error.to_string(),
                None => "ok".to_string(),
            },
            iostat: flags.ios(),
            values: values.len(),
            descriptors,
        };

        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        let rendered = tt
            .add_template("summary", SUMMARY)
            .and_then(|_| tt.render("summary", &summary));
        match rendered {
            Ok(rendered) => {
                let _ = std::io::stderr().write_all(rendered.as_bytes());
            }
            Err(error) => eprintln!("{}: {}", "warning".bright_yellow(), error),
        }
    }

    if let Some(error) = flags.error() {
        eprintln!("{}: {}", "error".bright_red(), error);
        std::process::exit(2);
    }
}

// main.rs      gifstream command
//
// Copyright (c) 2025-2026  gifstream developers
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifstream::{Decoder, Token};
use std::error::Error;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &'static str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    match create_app().get_matches().subcommand() {
        ("show", Some(matches)) => show(&mut out, matches)?,
        _ => panic!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifstream")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("GIF file inspector")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("show")
                .about("Show GIF frame table")
                .arg(
                    Arg::with_name("files")
                        .required(true)
                        .min_values(1)
                        .help("input file(s)"),
                ),
        )
}

/// Handle show subcommand
fn show(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let values = matches.values_of_os("files").unwrap();
    for path in values {
        show_file(out, path)?;
    }
    Ok(())
}

/// Show one GIF file
fn show_file(
    out: &mut StandardStream,
    path: &OsStr,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut cyan = ColorSpec::new();
    cyan.set_fg(Some(Color::Cyan)).set_intense(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let f = BufReader::new(File::open(&path)?);
    let mut decoder = Decoder::new(f)?;
    out.set_color(&magenta)?;
    writeln!(out, "{:?}", path)?;
    out.set_color(&bold)?;
    writeln!(
        out,
        "GIF{}, {}x{}",
        decoder.version(),
        decoder.width(),
        decoder.height()
    )?;
    out.set_color(&yellow)?;
    writeln!(out, " Fr#  Delay  Pixels")?;
    let mut frames = 0;
    loop {
        match decoder.next_token()? {
            Token::Image => {
                let frame = decoder.read_image()?;
                out.set_color(if frame.delay_time_cs > 0 {
                    &bold
                } else {
                    &dflt
                })?;
                writeln!(
                    out,
                    "{:>4} {:6.2} {:>7}",
                    frame.index,
                    frame.delay_time_cs as f32 / 100f32,
                    frame.colors.len()
                )?;
                frames += 1;
            }
            Token::Comment => {
                out.set_color(&cyan)?;
                for line in decoder.read_comment()?.split('\n') {
                    let line = line.trim();
                    if line.len() > 0 {
                        writeln!(out, "  # {}", line)?;
                    }
                }
            }
            Token::EndOfFile => break,
        }
    }
    out.set_color(&bold)?;
    writeln!(out, "frames: {}", frames)?;
    Ok(())
}

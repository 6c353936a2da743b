extern crate xive as lib;

use flexi_logger::{FileSpec, Logger};
use itertools::Itertools;
use lib::agenda::Agenda;
use lib::calendar::{DayCell, GridLayout, WeekStart, YearMonth, DAYS_IN_WEEK};
use lib::config::Config;
use lib::nfc;
use lib::provider::Result;
use std::path::PathBuf;
use structopt::StructOpt;

const CELL_WIDTH: usize = 6;

#[derive(Debug, StructOpt)]
#[structopt(name = "xive", about = "XIVE - ticket calendar and tag tools.")]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "print the calendar grid of a month")]
    Grid {
        #[structopt(long = "month", help = "month to show as YYYY-MM")]
        month: Option<YearMonth>,

        #[structopt(
            long = "tickets",
            help = "ticket payload ({\"data\": [...]}) to show",
            parse(from_os_str)
        )]
        tickets: Option<PathBuf>,

        #[structopt(long = "week-start", help = "first day of the week: sun or mon")]
        week_start: Option<WeekStart>,

        #[structopt(long = "layout", help = "six-weeks or natural")]
        layout: Option<GridLayout>,
    },

    #[structopt(about = "extract the stamp or event token from a tag payload")]
    Tag {
        payload: String,

        #[structopt(long = "raw", help = "payload still carries its text record header")]
        raw: bool,
    },
}

fn format_cell(cell: &DayCell) -> String {
    let text = if cell.is_padding {
        format!("[{}]", cell.label)
    } else if cell.has_events() {
        format!("{}*", cell.label)
    } else {
        cell.label.clone()
    };

    format!("{:>width$}", text, width = CELL_WIDTH)
}

fn print_grid(
    mut config: Config,
    month: Option<YearMonth>,
    tickets: Option<PathBuf>,
    week_start: Option<WeekStart>,
    layout: Option<GridLayout>,
) -> Result<()> {
    if tickets.is_some() {
        config.tickets = tickets;
    }
    if let Some(week_start) = week_start {
        config.calendar.week_start = week_start;
    }
    if let Some(layout) = layout {
        config.calendar.layout = layout;
    }

    let mut agenda = Agenda::from_config(&config)?;
    if let Some(month) = month {
        agenda.set_month(month);
    }

    let cells = agenda.grid()?;

    println!("{}", agenda.month());
    println!(
        "{}",
        agenda
            .config()
            .week_start
            .weekdays()
            .iter()
            .map(|day| format!("{:>width$}", day.to_string(), width = CELL_WIDTH))
            .join("")
    );

    for week in cells.chunks(DAYS_IN_WEEK) {
        println!("{}", week.iter().map(format_cell).join(""));
    }

    let with_events = cells.iter().filter(|cell| cell.has_events()).collect_vec();
    if !with_events.is_empty() {
        println!();
    }
    for cell in with_events {
        for event in &cell.events {
            println!(
                "{}  #{} {} {}",
                cell.date, event.id, event.title, event.location
            );
        }
    }

    Ok(())
}

fn print_token(payload: &str, raw: bool) -> Result<()> {
    if raw {
        let token = nfc::decode_tag(payload.as_bytes())?;
        println!("{}", token);
    } else {
        let token = nfc::format_token(payload);
        if let Err(err) = token.parse::<nfc::TagToken>() {
            log::warn!("{}", err);
        }
        println!("{}", token);
    }

    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        println!("XIVE ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    match args.cmd {
        Command::Grid {
            month,
            tickets,
            week_start,
            layout,
        } => print_grid(config, month, tickets, week_start, layout)?,
        Command::Tag { payload, raw } => print_token(&payload, raw)?,
    }

    Ok(())
}

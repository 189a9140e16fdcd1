use std::path::Path;

use clap::Subcommand;
use classboard_core::clock::parse_weekday;
use classboard_core::schedule::DayAgenda;
use classboard_core::{
    AgendaBuilder, AgendaItem, ClassSession, Clock, Config, Moment, ScheduleBoard,
    ScheduleRepository,
};

use super::{day_name, load_config};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the class happening now and the next one today
    Now {
        /// Section id (e.g. "A")
        #[arg(long, short)]
        section: String,
        /// Pretend it is this moment, e.g. "monday 10:30"
        #[arg(long)]
        at: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show each day's classes with the breaks between them
    Agenda {
        /// Section id (e.g. "A")
        #[arg(long, short)]
        section: String,
        /// Only this weekday
        #[arg(long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print everything for one render (status plus all agendas) as JSON
    Board {
        /// Section id (e.g. "A")
        #[arg(long, short)]
        section: String,
        /// Pretend it is this moment, e.g. "monday 10:30"
        #[arg(long)]
        at: Option<String>,
    },
    /// List configured sections
    Sections,
}

pub fn run(
    action: ScheduleAction,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let agenda = AgendaBuilder::new().with_thresholds(config.breaks);

    match action {
        ScheduleAction::Now { section, at, json } => {
            let repo = ScheduleRepository::load(&config, &section)?;
            let now = sample_now(&config, at.as_deref())?;
            let board = ScheduleBoard::build(&repo, now, &agenda);
            if json {
                println!("{}", serde_json::to_string_pretty(&board.status)?);
            } else {
                println!("{}  ({} {})", board.title, day_name(now.day), now.time);
                match board.status.current {
                    Some(class) => {
                        println!("Happening now: {}", class.course);
                        print_details(class);
                    }
                    None => println!("No class is happening right now."),
                }
                if board.status.conflict {
                    println!("  (overlaps another class at this time)");
                }
                match board.status.next {
                    Some(class) => {
                        println!("Next up: {}", class.course);
                        print_details(class);
                    }
                    None => println!("No upcoming class today."),
                }
            }
        }
        ScheduleAction::Agenda { section, day, json } => {
            let repo = ScheduleRepository::load(&config, &section)?;
            let now = config.clock()?.now();
            let board = ScheduleBoard::build(&repo, now, &agenda);
            let days: Vec<&DayAgenda> = match day {
                Some(text) => {
                    let day = parse_weekday(&text)
                        .ok_or_else(|| format!("unknown weekday '{text}'"))?;
                    board.days.iter().filter(|d| d.day == day).collect()
                }
                None => board.days.iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                println!("{}", board.title);
                if days.is_empty() {
                    println!("No classes.");
                }
                for day in days {
                    print_day(day);
                }
            }
        }
        ScheduleAction::Board { section, at } => {
            let repo = ScheduleRepository::load(&config, &section)?;
            let now = sample_now(&config, at.as_deref())?;
            let board = ScheduleBoard::build(&repo, now, &agenda);
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        ScheduleAction::Sections => {
            for section in &config.sections {
                println!(
                    "{}\t{}\t{}",
                    section.id,
                    section.title,
                    config.section_path(section).display()
                );
            }
        }
    }
    Ok(())
}

/// Sample "now" once for the whole command.
fn sample_now(config: &Config, at: Option<&str>) -> Result<Moment, Box<dyn std::error::Error>> {
    let now = match at {
        Some(text) => Moment::parse(text)?,
        None => config.clock()?.now(),
    };
    tracing::debug!(%now, "sampled now");
    Ok(now)
}

fn print_details(class: &ClassSession) {
    println!("  {} | {} | {} - {}", class.teacher, class.venue, class.start, class.end);
}

fn print_day(day: &DayAgenda) {
    println!();
    println!("== {} ==", day_name(day.day));
    for item in &day.items {
        match item {
            AgendaItem::Class(class) => println!(
                "  {} - {}  {} ({}, {})",
                class.start, class.end, class.course, class.teacher, class.venue
            ),
            AgendaItem::Break(b) => {
                if let Some(label) = b.label() {
                    println!("      -- {label} --");
                }
            }
        }
    }
}

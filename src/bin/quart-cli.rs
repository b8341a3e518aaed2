#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use quart::{
    io,
    model::{parse_date, parse_time, NewShift, Shift, ShiftId, ShiftPatch},
    scheduler::{Scheduler, WeekWindow},
    storage::JsonStore,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification de quarts (semaine publiée = semaine figée)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des shifts
    #[arg(long, global = true, env = "QUART_STORE", default_value = "shifts.json")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un shift
    Create {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long, value_parser = time_arg)]
        start: NaiveTime,
        /// HH:MM
        #[arg(long, value_parser = time_arg)]
        end: NaiveTime,
    },

    /// Modifier un shift non publié
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = time_arg)]
        start: Option<NaiveTime>,
        #[arg(long, value_parser = time_arg)]
        end: Option<NaiveTime>,
    },

    /// Supprimer un shift non publié
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Publier une liste d'ids "id1,id2,..." (les ids inconnus sont ignorés)
    Publish {
        #[arg(long = "id", value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },

    /// Publier toute la semaine contenant la date
    PublishWeek {
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
    },

    /// Lister et optionnellement exporter
    List {
        /// Restreint à la semaine contenant cette date
        #[arg(long, value_parser = date_arg, conflicts_with_all = ["from", "to"])]
        week: Option<NaiveDate>,
        /// Semaine suivante de `--week`
        #[arg(long, requires = "week", conflicts_with = "prev")]
        next: bool,
        /// Semaine précédente de `--week`
        #[arg(long, requires = "week")]
        prev: bool,
        #[arg(long, value_parser = date_arg, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = date_arg, requires = "from")]
        to: Option<NaiveDate>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher un shift
    Show {
        #[arg(long)]
        id: String,
    },

    /// Vue de la semaine contenant la date : état de publication + shifts par jour
    Week {
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        #[arg(long, conflicts_with = "prev")]
        next: bool,
        #[arg(long)]
        prev: bool,
    },

    /// Importer des shifts depuis un CSV (chaque ligne est validée)
    Import {
        #[arg(long)]
        csv: String,
    },
}

fn date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn time_arg(raw: &str) -> Result<NaiveTime, String> {
    parse_time(raw).map_err(|e| format!("expected HH:MM: {e}"))
}

/// Semaine contenant `date`, éventuellement décalée d'une semaine.
fn pick_week(date: NaiveDate, next: bool, prev: bool) -> Result<WeekWindow> {
    let window = WeekWindow::try_containing(date)?;
    let picked = if next {
        window.next()
    } else if prev {
        window.previous()
    } else {
        Some(window)
    };
    picked.with_context(|| format!("no adjacent week for {date}"))
}

fn print_shift(s: &Shift) {
    println!(
        "{} | {} {}-{} | {} | {}",
        s.id.as_str(),
        s.date.format("%Y-%m-%d"),
        s.start_time.format("%H:%M"),
        s.end_time.format("%H:%M"),
        s.name,
        if s.is_published { "published" } else { "draft" }
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
    #[cfg(not(feature = "logging"))]
    let _ = cli.log;

    let store = JsonStore::open(&cli.store)?;
    let mut scheduler = Scheduler::new(store);

    let code = match cli.cmd {
        Commands::Create {
            name,
            date,
            start,
            end,
        } => {
            let shift = scheduler.create_shift(NewShift::new(name, date, start, end))?;
            print_shift(&shift);
            0
        }
        Commands::Update {
            id,
            name,
            date,
            start,
            end,
        } => {
            let patch = ShiftPatch {
                name,
                date,
                start_time: start,
                end_time: end,
                is_published: None,
            };
            if patch.is_empty() {
                bail!("nothing to update (use --name, --date, --start or --end)");
            }
            let shift = scheduler.update_shift(&ShiftId::new(id), patch)?;
            print_shift(&shift);
            0
        }
        Commands::Delete { id } => {
            let shift = scheduler.delete_shift(&ShiftId::new(id))?;
            print_shift(&shift);
            0
        }
        Commands::Publish { ids } => {
            let ids: Vec<ShiftId> = ids
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(ShiftId::new)
                .collect();
            let published = scheduler.publish_shifts(&ids)?;
            for s in &published {
                print_shift(s);
            }
            println!("Published {}/{} shift(s)", published.len(), ids.len());
            0
        }
        Commands::PublishWeek { date } => {
            let window = WeekWindow::try_containing(date)?;
            let published = scheduler.publish_week(date)?;
            for s in &published {
                print_shift(s);
            }
            println!(
                "Published {} shift(s) for week {} → {}",
                published.len(),
                window.start,
                window.end
            );
            0
        }
        Commands::List {
            week,
            next,
            prev,
            from,
            to,
            out_json,
            out_csv,
        } => {
            let range = match (week, from, to) {
                (Some(date), _, _) => {
                    let w = pick_week(date, next, prev)?;
                    Some((w.start, w.end))
                }
                (None, Some(from), Some(to)) => Some((from, to)),
                _ => None,
            };
            let shifts = scheduler.find_shifts(range)?;
            if let Some(path) = out_json {
                io::export_shifts_json(path, &shifts)?;
            }
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, &shifts)?;
            }
            for s in &shifts {
                print_shift(s);
            }
            0
        }
        Commands::Show { id } => {
            let shift = scheduler.find_shift(&ShiftId::new(id))?;
            print_shift(&shift);
            0
        }
        Commands::Week { date, next, prev } => {
            let window = pick_week(date, next, prev)?;
            let status = scheduler.week_status(window.start)?;
            let shifts = scheduler.find_shifts(Some((window.start, window.end)))?;
            println!(
                "Week {} → {}: {}/{} published ({})",
                status.window.start,
                status.window.end,
                status.published,
                status.total,
                if status.is_published() { "published" } else { "open" }
            );
            for day in window.days() {
                println!("{}", day.format("%a %Y-%m-%d"));
                for s in shifts.iter().filter(|s| s.date == day) {
                    print_shift(s);
                }
            }
            0
        }
        Commands::Import { csv } => {
            let rows = io::import_shifts_csv(csv)?;
            let mut rejected = 0usize;
            for row in rows {
                let label = format!("{} {} {}", row.name, row.date, row.start_time.format("%H:%M"));
                match scheduler.create_shift(row) {
                    Ok(shift) => print_shift(&shift),
                    Err(err) if err.is_rejection() => {
                        eprintln!("rejected {label}: {err}");
                        rejected += 1;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            // Code 2 = WARNING/INCOMPLETE
            if rejected > 0 {
                eprintln!("{rejected} row(s) rejected");
                2
            } else {
                0
            }
        }
    };

    std::process::exit(code);
}

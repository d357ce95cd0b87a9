//gym-tracker-cli/src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::{Local, Timelike};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gym_tracker_lib::{
    stretches_for, Advance, AppService, Catalog, ExerciseLog, SessionError, SetField,
    StretchSetting, TimerHint, Units, WorkoutLog,
};

const LOG_ENV_VAR: &str = "GYM_TRACKER_LOG";
const RECENT_ON_HOME: usize = 3;

fn main() -> Result<()> {
    init_logging();

    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Loads config, opens the store and resumes any interrupted session
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    debug!(db = ?service.get_db_path(), active = service.tracker.is_active(), "service ready");
    let header_color = gym_tracker_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green);

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        // --- Program ---
        cli::Commands::Days => print_days_table(service.tracker.catalog(), header_color),
        cli::Commands::Day { day_id } => {
            let Some(day) = service.tracker.catalog().day_by_id(&day_id) else {
                bail!("Workout day not found: {day_id}");
            };
            println!("{} ({})", day.title, day.focus);
            print_day_exercises(&service, &day_id, header_color);
        }
        cli::Commands::Stretches => print_stretches(header_color),

        // --- Session ---
        cli::Commands::Start { day_id, force } => {
            let result = if force {
                service.tracker.restart(&day_id)
            } else {
                service.tracker.start(&day_id)
            };
            match result {
                Ok(()) => print_session(&service, header_color),
                Err(SessionError::AlreadyActive(active)) => bail!(
                    "A session for '{active}' is already in progress. Finish it with `gt next`, drop it with `gt cancel`, or use `gt start {day_id} --force`."
                ),
                Err(e) => bail!("Error starting workout: {e}"),
            }
        }
        cli::Commands::Status => {
            if service.tracker.is_active() {
                print_session(&service, header_color);
            } else {
                print_home(&service, header_color);
            }
        }
        cli::Commands::Adjust { set, field, delta } => {
            let field = match field {
                cli::SetFieldCli::Weight => SetField::Weight,
                cli::SetFieldCli::Reps => SetField::Reps,
            };
            adjust_and_show(&mut service, set, field, delta, header_color)?;
        }
        cli::Commands::Weight { set, direction } => {
            let delta = signed(service.config.weight_step, direction);
            adjust_and_show(&mut service, set, SetField::Weight, delta, header_color)?;
        }
        cli::Commands::Reps { set, direction } => {
            let delta = signed(service.config.reps_step, direction);
            adjust_and_show(&mut service, set, SetField::Reps, delta, header_color)?;
        }
        cli::Commands::Done { set } => match service.tracker.toggle_completed(set) {
            Ok(Some(completed)) => {
                let state = if completed { "done" } else { "not done" };
                println!("Set {} marked {state}.", set + 1);
                print_current_sets(&service, header_color);
            }
            Ok(None) => println!("Set {} does not exist for this exercise.", set + 1),
            Err(e) => bail!("Error updating set: {e}"),
        },
        cli::Commands::Next => match service.tracker.advance() {
            Ok(Advance::Next(_)) => print_session(&service, header_color),
            Ok(Advance::Finished(log)) => print_finished(&service, &log),
            Err(e) => bail!("Error advancing workout: {e}"),
        },
        cli::Commands::Cancel => {
            if service.tracker.cancel()? {
                println!("Session cancelled. Nothing was added to the history.");
            } else {
                println!("No workout session is in progress.");
            }
        }

        // --- Records ---
        cli::Commands::History { limit } => {
            let logs = service.tracker.history().recent(limit);
            if logs.is_empty() {
                println!("No workouts logged yet. Time to start!");
            } else if export_csv {
                print_history_csv(service.tracker.catalog(), logs, service.config.units)?;
            } else {
                print_history_table(
                    service.tracker.catalog(),
                    logs,
                    header_color,
                    service.config.units,
                );
            }
        }
        cli::Commands::Defaults { exercise } => {
            let rows = default_rows(&service, exercise.as_deref());
            if rows.is_empty() {
                println!("No remembered set values yet.");
            } else if export_csv {
                print_defaults_csv(&rows, service.config.units)?;
            } else {
                print_defaults_table(&rows, header_color, service.config.units);
            }
        }

        // --- Config ---
        cli::Commands::DbPath => println!("Database file is located at: {:?}", service.get_db_path()),
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
        cli::Commands::SetUnits { units } => {
            let units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            service.set_units(units)?;
            println!("Units set to {units:?}.");
        }
        cli::Commands::SetWeightStep { step } => {
            service.set_weight_step(step)?;
            println!("Weight step set to {step}.");
        }
        cli::Commands::SetRepsStep { step } => {
            service.set_reps_step(step)?;
            println!("Reps step set to {step}.");
        }
        cli::Commands::SetFallbackWeights { standard, dumbbell } => {
            service.set_fallback_weights(standard, dumbbell)?;
            println!("Starting weights set to {standard} (dumbbell: {dumbbell}).");
        }
        cli::Commands::SetHeaderColor { color } => {
            service.set_header_color(&color)?;
            println!("Header colour set to {}.", service.config.theme.header_color);
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn signed(step: f64, direction: cli::DirectionCli) -> f64 {
    match direction {
        cli::DirectionCli::Up => step,
        cli::DirectionCli::Down => -step,
    }
}

fn adjust_and_show(
    service: &mut AppService,
    set: usize,
    field: SetField,
    delta: f64,
    header_color: Color,
) -> Result<()> {
    match service.tracker.adjust_set(set, field, delta) {
        Ok(Some(entry)) => {
            println!(
                "Set {}: {} {} x {} reps",
                set + 1,
                entry.weight,
                service.config.units.weight_label(),
                entry.reps
            );
            print_current_sets(service, header_color);
            Ok(())
        }
        Ok(None) => {
            println!("Set {} does not exist for this exercise.", set + 1);
            Ok(())
        }
        Err(e) => bail!("Error adjusting set: {e}"),
    }
}

fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning! Let's get moving.",
        12..=17 => "Good afternoon! Time to crush it.",
        _ => "Good evening! Finish the day strong.",
    }
}

fn day_title(catalog: &Catalog, day_id: &str) -> String {
    catalog
        .day_by_id(day_id)
        .map_or_else(|| "Unknown Workout".to_string(), |d| d.title.clone())
}

fn exercise_name(catalog: &Catalog, exercise_id: &str) -> String {
    catalog
        .exercise_by_id(exercise_id)
        .map_or_else(|| exercise_id.to_string(), |e| e.name.clone())
}

/// Idle view: greeting, the program and the last few workouts.
fn print_home(service: &AppService, header_color: Color) {
    println!("{}", greeting(Local::now().hour()));
    println!();
    print_days_table(service.tracker.catalog(), header_color);

    let recent = service.tracker.history().recent(RECENT_ON_HOME);
    if recent.is_empty() {
        println!("No workouts logged yet. Time to start!");
        return;
    }
    println!("Recent history:");
    for log in recent {
        println!(
            "  ✔ {} on {}",
            day_title(service.tracker.catalog(), &log.program_id),
            log.date.with_timezone(&Local).format("%A, %b %-d")
        );
    }
}

/// Active view: where we are in the day and the sets of the current exercise.
fn print_session(service: &AppService, header_color: Color) {
    let tracker = &service.tracker;
    let (Some(day), Some(progress), Some(exercise)) = (
        tracker.active_day(),
        tracker.progress(),
        tracker.current_exercise(),
    ) else {
        println!("No workout session is in progress.");
        return;
    };
    let unit = service.config.units.weight_label();

    println!("{} ({})", day.title, day.focus);
    println!(
        "Exercise {}/{} · {:.0}% complete",
        progress.index + 1,
        progress.total,
        progress.percent()
    );
    println!();
    println!("{} [{}]", exercise.name, exercise.category);
    println!("Target: {} reps", exercise.reps);
    if let Some(notes) = &exercise.notes {
        println!("{notes}");
    }
    match exercise.category.timer_hint() {
        TimerHint::Rest { seconds } => println!("Rest timer: {seconds}s between sets"),
        TimerHint::Interval { seconds } => {
            println!("Intervals: {seconds}s hard / {seconds}s recover");
        }
    }
    if let Some(last) = tracker.history().most_recent_for(&exercise.id) {
        let weights: Vec<String> = last
            .sets
            .iter()
            .map(|s| format!("{}{unit}", s.weight))
            .collect();
        println!("Last time: {}", weights.join(", "));
    }

    print_current_sets(service, header_color);

    if progress.is_last() {
        println!("Run `gt next` to finish the workout.");
    } else {
        println!("Run `gt next` for the next exercise.");
    }
}

fn print_current_sets(service: &AppService, header_color: Color) {
    if let Some(log) = service.tracker.current_log() {
        print_sets_table(log, header_color, service.config.units);
    }
}

fn print_sets_table(log: &ExerciseLog, header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Set").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Status").fg(header_color),
        ]);

    for (idx, set) in log.sets.iter().enumerate() {
        let status = if set.completed {
            Cell::new("Completed").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new("-")
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(set.weight),
            Cell::new(set.reps),
            status,
        ]);
    }
    println!("{table}");
}

fn print_finished(service: &AppService, log: &WorkoutLog) {
    let total_sets: usize = log.exercises.iter().map(|e| e.sets.len()).sum();
    let done_sets: usize = log.exercises.iter().map(ExerciseLog::completed_sets).sum();
    println!(
        "Workout complete: {}",
        day_title(service.tracker.catalog(), &log.program_id)
    );
    println!(
        "{} exercises, {done_sets}/{total_sets} sets done, volume {:.1} {}",
        log.exercises.len(),
        log.completed_volume(),
        service.config.units.weight_label()
    );
}

fn print_days_table(catalog: &Catalog, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Title").fg(header_color),
            Cell::new("Focus").fg(header_color),
            Cell::new("Exercises").fg(header_color),
        ]);

    for day in catalog.days() {
        table.add_row(vec![
            Cell::new(&day.id),
            Cell::new(&day.title),
            Cell::new(&day.focus),
            Cell::new(day.exercises.len()),
        ]);
    }
    println!("{table}");
}

fn print_day_exercises(service: &AppService, day_id: &str, header_color: Color) {
    let Some(day) = service.tracker.catalog().day_by_id(day_id) else {
        return;
    };
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("ID").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Category").fg(header_color),
            Cell::new("Sets").fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Notes").fg(header_color),
        ]);

    for (idx, exercise) in day.exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&exercise.id),
            Cell::new(&exercise.name),
            Cell::new(exercise.category),
            Cell::new(exercise.sets),
            Cell::new(&exercise.reps),
            Cell::new(exercise.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

fn print_stretches(header_color: Color) {
    for (setting, heading, cue_header) in [
        (StretchSetting::Gym, "Gym (between sets)", "When"),
        (StretchSetting::Home, "Home (daily/off-days)", "Target"),
    ] {
        println!("{heading}");
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Stretch").fg(header_color),
                Cell::new("Duration").fg(header_color),
                Cell::new(cue_header).fg(header_color),
            ]);
        for stretch in stretches_for(setting) {
            table.add_row(vec![stretch.name, stretch.duration, stretch.cue]);
        }
        println!("{table}");
    }
}

fn print_history_table(catalog: &Catalog, logs: &[WorkoutLog], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date (Local)").fg(header_color),
            Cell::new("Workout").fg(header_color),
            Cell::new("Exercises").fg(header_color),
            Cell::new("Sets Done").fg(header_color),
            Cell::new(format!("Volume ({})", units.weight_label())).fg(header_color),
        ]);

    for log in logs {
        let total_sets: usize = log.exercises.iter().map(|e| e.sets.len()).sum();
        let done_sets: usize = log.exercises.iter().map(ExerciseLog::completed_sets).sum();
        table.add_row(vec![
            Cell::new(log.date.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
            Cell::new(day_title(catalog, &log.program_id)),
            Cell::new(log.exercises.len()),
            Cell::new(format!("{done_sets}/{total_sets}")),
            Cell::new(format!("{:.1}", log.completed_volume())),
        ]);
    }
    println!("{table}");
}

/// One CSV row per logged set.
fn print_history_csv(catalog: &Catalog, logs: &[WorkoutLog], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Workout_Id",
        "Date_Local",
        "Day",
        "Exercise",
        "Set",
        &format!("Weight_{}", units.weight_label()),
        "Reps",
        "Completed",
    ])?;

    for log in logs {
        let date = log.date.with_timezone(&Local).to_rfc3339();
        let day = day_title(catalog, &log.program_id);
        for exercise in &log.exercises {
            let name = exercise_name(catalog, &exercise.exercise_id);
            for (idx, set) in exercise.sets.iter().enumerate() {
                writer.write_record([
                    log.id.clone(),
                    date.clone(),
                    day.clone(),
                    name.clone(),
                    (idx + 1).to_string(),
                    set.weight.to_string(),
                    set.reps.to_string(),
                    set.completed.to_string(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// (exercise name, set number, weight, reps); gaps have no values.
type DefaultRow = (String, usize, Option<(f64, f64)>);

fn default_rows(service: &AppService, only: Option<&str>) -> Vec<DefaultRow> {
    let catalog = service.tracker.catalog();
    service
        .tracker
        .defaults()
        .iter()
        .filter(|(id, _)| only.map_or(true, |wanted| wanted == *id))
        .flat_map(|(id, sets)| {
            let name = exercise_name(catalog, id);
            sets.iter().enumerate().map(move |(idx, value)| {
                (name.clone(), idx + 1, value.map(|d| (d.weight, d.reps)))
            })
        })
        .collect()
}

fn print_defaults_table(rows: &[DefaultRow], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Exercise").fg(header_color),
            Cell::new("Set").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
        ]);

    for (name, set, value) in rows {
        let (weight, reps) = value.map_or(("-".to_string(), "-".to_string()), |(w, r)| {
            (w.to_string(), r.to_string())
        });
        table.add_row(vec![
            Cell::new(name),
            Cell::new(set),
            Cell::new(weight),
            Cell::new(reps),
        ]);
    }
    println!("{table}");
}

fn print_defaults_csv(rows: &[DefaultRow], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Exercise",
        "Set",
        &format!("Weight_{}", units.weight_label()),
        "Reps",
    ])?;
    for (name, set, value) in rows {
        let (weight, reps) = value.map_or((String::new(), String::new()), |(w, r)| {
            (w.to_string(), r.to_string())
        });
        writer.write_record([name.clone(), set.to_string(), weight, reps])?;
    }
    writer.flush()?;
    Ok(())
}

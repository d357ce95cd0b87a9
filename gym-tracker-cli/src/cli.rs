//gym-tracker-cli/src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Step through a gym program and log every set", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print history and defaults as CSV instead of tables
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetFieldCli {
    Weight,
    Reps,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionCli {
    Up,
    Down,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the workout days of the program
    Days,
    /// Show the exercises of one workout day
    Day {
        /// Workout day ID (e.g. "day-1")
        day_id: String,
    },
    /// Start a workout session
    Start {
        /// Workout day ID (e.g. "day-1")
        day_id: String,
        /// Discard a session that is already in progress
        #[arg(short, long)]
        force: bool,
    },
    /// Show the current exercise, or recent workouts when no session is running
    Status,
    /// Add a signed amount to the weight or reps of a set
    Adjust {
        /// Set number, starting at 1
        #[arg(value_parser = parse_set_number)]
        set: usize,
        #[arg(value_enum)]
        field: SetFieldCli,
        /// Amount to add, negative to subtract (e.g. 5, -2.5)
        #[arg(allow_hyphen_values = true, value_parser = parse_finite)]
        delta: f64,
    },
    /// Raise or lower the weight of a set by the configured step
    Weight {
        /// Set number, starting at 1
        #[arg(value_parser = parse_set_number)]
        set: usize,
        #[arg(value_enum)]
        direction: DirectionCli,
    },
    /// Raise or lower the reps of a set by the configured step
    Reps {
        /// Set number, starting at 1
        #[arg(value_parser = parse_set_number)]
        set: usize,
        #[arg(value_enum)]
        direction: DirectionCli,
    },
    /// Mark a set as done (or not done again)
    Done {
        /// Set number, starting at 1
        #[arg(value_parser = parse_set_number)]
        set: usize,
    },
    /// Move to the next exercise, finishing the workout after the last one
    Next,
    /// Abandon the current session without saving it
    Cancel,
    /// List completed workouts, newest first
    History {
        /// Show only the last N workouts
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the remembered per-set starting values
    Defaults {
        /// Only show this exercise ID
        exercise: Option<String>,
    },
    /// Show the stretching routine
    Stretches,
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Set the units used for display
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Set the weight step used by `weight up/down`
    SetWeightStep {
        #[arg(value_parser = parse_finite)]
        step: f64,
    },
    /// Set the reps step used by `reps up/down`
    SetRepsStep {
        #[arg(value_parser = parse_finite)]
        step: f64,
    },
    /// Set the starting weights for exercises with no logged values
    SetFallbackWeights {
        /// Starting weight for most exercises
        #[arg(value_parser = parse_finite)]
        standard: f64,
        /// Starting weight for dumbbell ("DB") exercises
        #[arg(value_parser = parse_finite)]
        dumbbell: f64,
    },
    /// Set the table header colour (e.g. green, darkcyan)
    SetHeaderColor { color: String },
    /// Generate shell completion scripts
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

/// Turns a 1-based set number from the command line into a set index.
fn parse_set_number(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("Set numbers start at 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(format!("Invalid set number: '{s}'")),
    }
}

fn parse_finite(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        Ok(_) => Err(format!("'{s}' is not a finite number")),
        Err(_) => Err(format!("Invalid number: '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_number_is_one_based() {
        assert_eq!(parse_set_number("1"), Ok(0));
        assert_eq!(parse_set_number("3"), Ok(2));
        assert!(parse_set_number("0").unwrap_err().contains("start at 1"));
        assert!(parse_set_number("two").unwrap_err().contains("Invalid set number"));
    }

    #[test]
    fn test_adjust_accepts_negative_delta() {
        let cli = Cli::try_parse_from(["gt", "adjust", "2", "weight", "-5"]).unwrap();
        match cli.command {
            Commands::Adjust { set, field, delta } => {
                assert_eq!(set, 1);
                assert_eq!(field, SetFieldCli::Weight);
                assert_eq!(delta, -5.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_start_force_flag() {
        let cli = Cli::try_parse_from(["gt", "start", "day-3", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Start { ref day_id, force: true } if day_id == "day-3"
        ));
    }

    #[test]
    fn test_export_csv_is_global() {
        let cli = Cli::try_parse_from(["gt", "history", "--export-csv", "-l", "3"]).unwrap();
        assert!(cli.export_csv);
        assert!(matches!(cli.command, Commands::History { limit: 3 }));
    }

    #[test]
    fn test_done_rejects_set_zero() {
        assert!(Cli::try_parse_from(["gt", "done", "0"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn test_numbers_must_be_finite() {
        assert_eq!(parse_finite("-2.5"), Ok(-2.5));
        assert!(parse_finite("inf").unwrap_err().contains("not a finite number"));
        assert!(Cli::try_parse_from(["gt", "adjust", "1", "weight", "inf"]).is_err());
        assert!(Cli::try_parse_from(["gt", "adjust", "1", "reps", "NaN"]).is_err());
        assert!(Cli::try_parse_from(["gt", "set-weight-step", "inf"]).is_err());
        assert!(Cli::try_parse_from(["gt", "set-fallback-weights", "40", "-inf"]).is_err());
    }
}

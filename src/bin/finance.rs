use std::{error::Error, io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use finance_tracker::{
    Config, Entry, EntryFilter, EntryId, EntryStatus, EntryType, NewUser, PasswordHash, UserId,
    setup_logging,
    stores::sqlite::{SQLAppState, create_app_state},
};

const USER_NOT_FOUND_MSG: &str = "Usuário não encontrado para o Id informado.";
const ENTRY_NOT_FOUND_MSG: &str = "Lançamento não encontrado na base de Dados.";

/// Record income and expenses, and keep track of your balance.
#[derive(Parser, Debug)]
#[command(name = "finance", version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "FINANCE_DB_PATH")]
    db_path: PathBuf,

    /// The bcrypt cost for hashing the passwords of new users.
    #[arg(long, env = "FINANCE_PASSWORD_COST", default_value_t = PasswordHash::DEFAULT_COST)]
    password_cost: u32,

    /// Which log messages to print to stderr, e.g. "info" or "finance_tracker=debug".
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_filter: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new user, prompting for their password
    Register {
        /// The user's name
        #[arg(long)]
        name: String,
        /// The email to log in with
        #[arg(long)]
        email: String,
    },

    /// Check the password of a registered user
    LogIn {
        /// The email the user registered with
        #[arg(long)]
        email: String,
    },

    /// Record a new entry
    AddEntry {
        /// ID of the user the entry belongs to
        #[arg(long)]
        user_id: i64,
        /// What the entry is for
        #[arg(long)]
        description: String,
        /// The amount of money, e.g. 12.50
        #[arg(long)]
        value: Decimal,
        /// Either income or expense
        #[arg(long = "type")]
        entry_type: EntryType,
        /// Defaults to the current month
        #[arg(long)]
        month: Option<i32>,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        /// One of pending, settled or canceled
        #[arg(long, default_value_t = EntryStatus::Pending)]
        status: EntryStatus,
    },

    /// Change the fields of an entry, fields that are not given are kept
    UpdateEntry {
        /// ID of the entry to change
        id: EntryId,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        value: Option<Decimal>,
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
        #[arg(long)]
        month: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Change the status of an entry
    SetStatus {
        /// ID of the entry to change
        id: EntryId,
        /// One of pending, settled or canceled
        status: EntryStatus,
    },

    /// Delete an entry
    DeleteEntry {
        /// ID of the entry to delete
        id: EntryId,
    },

    /// Print an entry
    ShowEntry {
        /// ID of the entry to print
        id: EntryId,
    },

    /// Print the entries that match every given field
    FindEntries {
        #[arg(long)]
        user_id: Option<i64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        value: Option<Decimal>,
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
        #[arg(long)]
        month: Option<i32>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        status: Option<EntryStatus>,
    },

    /// Print a user's income minus their expenses
    Balance {
        /// ID of the user
        #[arg(long)]
        user_id: i64,
    },
}

#[derive(Serialize)]
struct Balance {
    user_id: UserId,
    balance: Decimal,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_filter);

    let config = match Config::new(args.db_path, args.password_cost) {
        Ok(config) => config,
        Err(error) => {
            print_error(error);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: Command) -> Result<(), Box<dyn Error>> {
    let connection = Connection::open(config.db_path())?;
    let mut state = create_app_state(connection, config.password_cost())?;

    if let Some(output) = execute(&mut state, command)? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Run `command` against `state`, returning what should be printed.
///
/// Returns `None` if there is nothing to print, e.g. the user closed stdin
/// at a password prompt.
fn execute(state: &mut SQLAppState, command: Command) -> Result<Option<Value>, Box<dyn Error>> {
    match command {
        Command::Register { name, email } => {
            // Fail before prompting for a password nobody will use.
            state.users.validate_email_uniqueness(&email)?;

            let Some(password) = prompt_new_password()? else {
                return Ok(None);
            };
            let user = state.users.register(NewUser {
                name,
                email,
                password,
            })?;

            to_output(&user)
        }
        Command::LogIn { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let user = state.users.authenticate(&email, &password)?;

            to_output(&user)
        }
        Command::AddEntry {
            user_id,
            description,
            value,
            entry_type,
            month,
            year,
            status,
        } => {
            let user_id = require_user(state, user_id)?;
            let now = OffsetDateTime::now_utc();

            let entry = Entry::build(&description, value, entry_type)
                .month(month.unwrap_or_else(|| u8::from(now.month()).into()))
                .year(year.unwrap_or(now.year()))
                .user_id(user_id)
                .status(status)
                .finalize();

            to_output(&state.entries.save(entry)?)
        }
        Command::UpdateEntry {
            id,
            description,
            value,
            entry_type,
            month,
            year,
        } => {
            let mut entry = require_entry(state, id)?;

            if description.is_some() {
                entry.description = description;
            }
            if value.is_some() {
                entry.value = value;
            }
            if entry_type.is_some() {
                entry.entry_type = entry_type;
            }
            if month.is_some() {
                entry.month = month;
            }
            if year.is_some() {
                entry.year = year;
            }

            to_output(&state.entries.update(entry)?)
        }
        Command::SetStatus { id, status } => {
            let entry = require_entry(state, id)?;

            to_output(&state.entries.update_status(entry, status)?)
        }
        Command::DeleteEntry { id } => {
            let entry = require_entry(state, id)?;
            state.entries.delete(&entry)?;

            to_output(&entry)
        }
        Command::ShowEntry { id } => to_output(&require_entry(state, id)?),
        Command::FindEntries {
            user_id,
            description,
            value,
            entry_type,
            month,
            year,
            status,
        } => {
            let filter = EntryFilter {
                description,
                month,
                year,
                value,
                entry_type,
                status,
                user_id: user_id.map(UserId::new),
                ..Default::default()
            };

            to_output(&state.entries.find(&filter)?)
        }
        Command::Balance { user_id } => {
            let user_id = require_user(state, user_id)?;
            let balance = state.entries.balance_by_user(user_id)?;

            to_output(&Balance { user_id, balance })
        }
    }
}

fn require_user(state: &SQLAppState, raw_id: i64) -> Result<UserId, Box<dyn Error>> {
    match state.users.find_by_id(UserId::new(raw_id))? {
        Some(user) => Ok(user.id),
        None => Err(USER_NOT_FOUND_MSG.into()),
    }
}

fn require_entry(state: &SQLAppState, id: EntryId) -> Result<Entry, Box<dyn Error>> {
    state
        .entries
        .find_by_id(id)?
        .ok_or_else(|| ENTRY_NOT_FOUND_MSG.into())
}

/// Prompt for a password twice, returning `None` if stdin is closed.
fn prompt_new_password() -> Result<Option<String>, io::Error> {
    loop {
        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(error) => return Err(error),
        };

        if first_password.is_empty() {
            print_error("Password must not be empty, try again.");
            continue;
        }

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(error) => return Err(error),
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Ok(Some(first_password));
    }
}

fn to_output(value: &impl Serialize) -> Result<Option<Value>, Box<dyn Error>> {
    Ok(Some(serde_json::to_value(value)?))
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

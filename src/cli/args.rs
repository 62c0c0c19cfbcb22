//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Alumni Job Board - server, worker and admin tooling
#[derive(Parser, Debug)]
#[command(name = "alumni-job-board")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage background jobs
    Jobs(JobsArgs),

    /// Fill an empty database with demo accounts and listings
    Seed,

    /// Admin account commands
    Admin(AdminArgs),

    /// Alumnus account commands
    Alumnus(AlumnusArgs),

    /// Company account commands
    Company(CompanyArgs),

    /// Job listing commands
    Listing(ListingArgs),

    /// Commands spanning every account kind
    User(UserArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the jobs command
#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

/// Job management actions
#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the email worker
    Work,
    /// Show queue counts by status
    List,
    /// Clear failed jobs
    Clear,
}

/// Print JSON instead of one line per row
#[derive(Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    #[arg(long)]
    pub json: bool,
}

/// Acting admin for commands that need one
#[derive(Args, Debug, Clone, Copy)]
pub struct RequesterArgs {
    /// ID of the admin performing the action
    #[arg(long = "requester")]
    pub requester_id: Uuid,
}

#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,
}

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Create an admin account
    Add { login_email: String, password: String },
    /// Show an admin by ID
    Get { id: Uuid },
    /// Show an admin by login email
    GetByEmail { login_email: String },
    /// List admins
    List(OutputArgs),
    /// Change an admin's login email (password required)
    UpdateEmail {
        id: Uuid,
        password: String,
        new_login_email: String,
    },
    /// Change an admin's password
    UpdatePassword {
        id: Uuid,
        current_password: String,
        new_password: String,
    },
    /// Set the stored profile photo path, relative to the upload directory
    UpdatePhoto { id: Uuid, path: String },
    /// Delete any account
    Delete {
        target_id: Uuid,
        #[command(flatten)]
        requester: RequesterArgs,
    },
}

#[derive(Parser, Debug)]
pub struct AlumnusArgs {
    #[command(subcommand)]
    pub action: AlumnusAction,
}

#[derive(Subcommand, Debug)]
pub enum AlumnusAction {
    /// Register an alumnus
    Add {
        login_email: String,
        password: String,
        first_name: String,
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show an alumnus by ID
    Get { id: Uuid },
    /// List alumni
    List(OutputArgs),
    /// Change login email (password required)
    UpdateEmail {
        id: Uuid,
        password: String,
        new_login_email: String,
    },
    /// Change password
    UpdatePassword {
        id: Uuid,
        current_password: String,
        new_password: String,
    },
    /// Subscribe to one or more companies
    Subscribe {
        id: Uuid,
        #[arg(required = true, num_args = 1..)]
        company_ids: Vec<Uuid>,
    },
    /// Apply to a listing with a resume file from disk
    Apply {
        id: Uuid,
        listing_id: Uuid,
        resume: PathBuf,
        #[arg(long)]
        experience: Option<String>,
    },
    /// Save a listing
    Save { id: Uuid, listing_id: Uuid },
}

#[derive(Parser, Debug)]
pub struct CompanyArgs {
    #[command(subcommand)]
    pub action: CompanyAction,
}

#[derive(Subcommand, Debug)]
pub enum CompanyAction {
    /// Register a company
    Add {
        login_email: String,
        password: String,
        company_name: String,
        mailing_address: String,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        public_email: Option<String>,
    },
    /// Show a company by ID
    Get { id: Uuid },
    /// List companies
    List(OutputArgs),
    /// A company's listings in any state
    Listings {
        id: Uuid,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// A company's notifications
    Notifications { id: Uuid },
}

#[derive(Parser, Debug)]
pub struct ListingArgs {
    #[command(subcommand)]
    pub action: ListingAction,
}

#[derive(Subcommand, Debug)]
pub enum ListingAction {
    /// Post a listing for a company
    Add {
        company_id: Uuid,
        title: String,
        /// e.g. "FULL TIME", "INTERNSHIP"
        position_type: String,
        description: String,
        monthly_salary_ttd: i32,
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        site: Option<String>,
    },
    /// Show a listing
    Get { id: Uuid },
    /// Every listing in any state
    List {
        #[command(flatten)]
        requester: RequesterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Search approved listings
    Search {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        position_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        min_salary: Option<i32>,
        #[arg(long)]
        max_salary: Option<i32>,
        #[arg(long, default_value = "1")]
        page: u64,
        #[arg(long, default_value = "20")]
        per_page: u64,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Overwrite the approval status
    SetStatus {
        id: Uuid,
        /// PENDING, APPROVED, REJECTED, "DELETION REQUESTED" or "UPDATE REQUESTED"
        status: String,
        #[command(flatten)]
        requester: RequesterArgs,
    },
    /// Approve and notify subscribers
    Publish {
        id: Uuid,
        #[command(flatten)]
        requester: RequesterArgs,
    },
    /// Delete a listing
    Delete {
        id: Uuid,
        #[command(flatten)]
        requester: RequesterArgs,
    },
}

#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// List accounts of every kind
    List(OutputArgs),
    /// Find an account by login email
    GetByEmail { login_email: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_delete_with_requester() {
        let target = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let cli = Cli::parse_from([
            "alumni-job-board",
            "admin",
            "delete",
            &target.to_string(),
            "--requester",
            &admin.to_string(),
        ]);

        match cli.command {
            Commands::Admin(AdminArgs {
                action: AdminAction::Delete { target_id, requester },
            }) => {
                assert_eq!(target_id, target);
                assert_eq!(requester.requester_id, admin);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subscribe_requires_a_company() {
        let id = Uuid::new_v4().to_string();
        assert!(Cli::try_parse_from(["alumni-job-board", "alumnus", "subscribe", &id]).is_err());
    }
}

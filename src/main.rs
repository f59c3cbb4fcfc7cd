use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use storage_groups::audit::ChangeJournal;
use storage_groups::cli::{
    handle_add_command, handle_drives_command, handle_edit_command, handle_history_command,
    handle_list_command, handle_manage_command, handle_remove_command, AddArgs,
};
use storage_groups::config::{GroupsPaths, Settings};
use storage_groups::devices::{SnapshotSource, SnapshotStorageApi};
use storage_groups::models::GroupId;
use storage_groups::prompt::Prompter;
use storage_groups::storage::GroupStore;

#[derive(Parser)]
#[command(
    name = "sgroups",
    version,
    about = "Configure master/backup storage groups of removable drives",
    long_about = "sgroups discovers removable drives and arranges them into named \
                  storage groups of one master and any number of backups. Groups \
                  are stored on the drive itself and matched by serial number, so \
                  drive letters may change freely between sessions."
)]
struct Cli {
    /// Drive root holding the configuration (defaults to the current drive)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// JSON device fixture to use instead of querying the host
    #[arg(long, global = true, env = "STORAGE_GROUPS_FIXTURE")]
    fixture: Option<PathBuf>,

    /// Fail instead of prompting when input would be required
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Comma-separated answers for every prompt, in order
    #[arg(long, global = true, value_delimiter = ',')]
    answers: Option<Vec<String>>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected drives
    Drives {
        /// Include fixed drives
        #[arg(short, long)]
        all: bool,
    },

    /// Show storage groups and their availability
    #[command(alias = "ls")]
    List,

    /// Add a storage group
    Add(AddArgs),

    /// Edit a storage group
    Edit {
        /// Group id
        id: GroupId,
    },

    /// Remove storage groups
    #[command(alias = "rm")]
    Remove {
        /// Group ids
        #[arg(required = true)]
        ids: Vec<GroupId>,
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive management menu
    Manage,

    /// Show recent group changes
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Create the configuration directory with default settings
    Init,

    /// Show resolved paths and settings
    Paths,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = GroupsPaths::new(cli.root)?;
    let settings = Settings::load_or_default(&paths)?;

    let non_interactive = cli.non_interactive || settings.non_interactive;
    let api =
        SnapshotStorageApi::from_fixture(cli.fixture.or_else(|| settings.device_fixture.clone()));
    let mut prompter = match cli.answers {
        Some(answers) => Prompter::scripted(answers, non_interactive),
        None => Prompter::console(non_interactive),
    };

    let mut store = GroupStore::new(paths.clone());
    if settings.audit_enabled {
        store = store.with_journal(ChangeJournal::new(paths.audit_log()));
    }

    match cli.command {
        Some(Commands::Drives { all }) => handle_drives_command(&api, all)?,
        Some(Commands::List) => handle_list_command(&store, &api)?,
        Some(Commands::Add(args)) => handle_add_command(&store, &api, &mut prompter, args)?,
        Some(Commands::Edit { id }) => handle_edit_command(&store, &api, &mut prompter, id)?,
        Some(Commands::Remove { ids, yes }) => {
            handle_remove_command(&store, &api, &mut prompter, &ids, yes)?
        }
        Some(Commands::Manage) => handle_manage_command(&store, &api, &mut prompter)?,
        Some(Commands::History { count }) => {
            handle_history_command(&ChangeJournal::new(paths.audit_log()), count)?
        }
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!(
                "Initialized storage groups at: {}",
                paths.config_dir().display()
            );
            println!();
            println!("Run 'sgroups drives' to see connected drives.");
            println!("Run 'sgroups add' to create the first storage group.");
        }
        Some(Commands::Paths) => {
            println!("Storage Groups Configuration");
            println!("============================");
            println!("Drive root:     {}", paths.root().display());
            println!("Group file:     {}", paths.groups_file().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Non-interactive: {}", non_interactive);
            println!("  Audit enabled:   {}", settings.audit_enabled);
            match api.source() {
                SnapshotSource::Host => println!("  Device source:   host"),
                SnapshotSource::Fixture(path) => {
                    println!("  Device source:   fixture {}", path.display())
                }
            }
        }
        None => {
            println!("sgroups - storage group configuration");
            println!();
            println!("Run 'sgroups --help' for usage information.");
            println!("Run 'sgroups manage' to open the management menu.");
        }
    }

    Ok(())
}

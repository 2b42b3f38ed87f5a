use clap::{Parser, Subcommand};
use pms_core::{
    config::store_path_from_env_value, constants::STORE_PATH_ENV, CoreConfig, JsonFileStore,
    PatientService, PatientView,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pms")]
#[command(about = "Patient management system CLI")]
struct Cli {
    /// Patient store file
    #[arg(long, global = true, env = STORE_PATH_ENV)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty patient store if none exists
    Init,
    /// List all patients
    List,
    /// Show one patient
    Show {
        /// Patient ID
        id: String,
    },
    /// List patients ordered by height, weight or bmi
    Sorted {
        /// Field to sort by (height, weight, bmi)
        sort_by: String,
        /// Sort order (asc, desc)
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Delete a patient
    Delete {
        /// Patient ID
        id: String,
    },
}

fn describe(id: &str, view: &PatientView) -> String {
    let fields = &view.fields;
    let derived = match (view.bmi, view.verdict) {
        (Some(bmi), Some(verdict)) => format!("{bmi} ({verdict})"),
        _ => "-".to_string(),
    };
    format!(
        "ID: {}, Name: {}, City: {}, Age: {}, Gender: {}, BMI: {}",
        id,
        fields.name.as_deref().unwrap_or("-"),
        fields.city.as_deref().unwrap_or("-"),
        fields.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
        fields.gender.map(|g| g.to_string()).unwrap_or_else(|| "-".into()),
        derived
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let store_path = cli
        .store
        .unwrap_or_else(|| store_path_from_env_value(None));
    let cfg = CoreConfig::new(store_path)?;
    let service = || -> Result<PatientService, Box<dyn std::error::Error>> {
        Ok(PatientService::new(Arc::new(cfg.open_store()?)))
    };

    match cli.command {
        Some(Commands::Init) => match JsonFileStore::new(cfg.store_path()).initialise() {
            Ok(true) => println!("Created patient store at {}", cfg.store_path().display()),
            Ok(false) => println!(
                "Patient store already exists at {}",
                cfg.store_path().display()
            ),
            Err(e) => eprintln!("Error creating patient store: {}", e),
        },
        Some(Commands::List) => match service()?.list() {
            Ok(listing) if listing.is_empty() => println!("No patients found."),
            Ok(listing) => {
                for (id, view) in &listing {
                    println!("{}", describe(id, view));
                }
            }
            Err(e) => eprintln!("Error listing patients: {}", e),
        },
        Some(Commands::Show { id }) => match service()?.get(&id) {
            Ok(view) => println!("{}", describe(&id, &view)),
            Err(e) => eprintln!("Error showing patient: {}", e),
        },
        Some(Commands::Sorted { sort_by, order }) => {
            match service()?.sorted(Some(sort_by.as_str()), Some(order.as_str())) {
                Ok(views) => {
                    for view in &views {
                        println!("{}", describe(view.id.as_deref().unwrap_or("-"), view));
                    }
                }
                Err(e) => eprintln!("Error sorting patients: {}", e),
            }
        }
        Some(Commands::Delete { id }) => match service()?.delete(&id) {
            Ok(()) => println!("Patient {} deleted successfully!", id),
            Err(e) => eprintln!("Error deleting patient: {}", e),
        },
        None => {
            println!("Use 'pms --help' for commands");
        }
    }

    Ok(())
}

use anyhow::{anyhow, Result};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use training_bot::config::Config;
use training_bot::database::connection::{sqlite_file_path, DatabaseManager};
use training_bot::database::models::TrainingProgram;
use training_bot::services::seed::{self, SeedReport};
use training_bot::utils::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "seed" => seed_programs(&args[1..]).await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn connect() -> Result<DatabaseManager> {
    let database_url = Config::database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Training Bot - Database Tool");
    println!("================================");

    let db_manager = connect().await?;
    println!("🚀 Running database migrations...");

    match db_manager.run_migrations().await {
        Ok(_) => println!("✅ Migrations completed successfully!"),
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = connect().await?;

    match db_manager.table_names().await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'manage migrate' to create the schema");
            return Ok(());
        }
    }

    match TrainingProgram::find_all(&db_manager.pool).await {
        Ok(programs) if programs.is_empty() => {
            println!("💡 No programs loaded yet, run 'manage seed'");
        }
        Ok(programs) => {
            println!("🏃 Programs:");
            for program in programs {
                println!("  • {} (id {})", program.name, program.id);
            }
        }
        Err(e) => println!("⚠️  Could not list programs: {e}"),
    }

    Ok(())
}

/// Loads the given documents, or every document in `PROGRAMS_DIR` when none
/// are named.
async fn seed_programs(files: &[String]) -> Result<()> {
    let db_manager = connect().await?;
    db_manager.run_migrations().await?;

    let paths: Vec<PathBuf> = if files.is_empty() {
        let dir = Config::programs_dir_from_env();
        println!("📂 Loading programs from {dir}");
        seed::program_files(Path::new(&dir))?
    } else {
        files.iter().map(PathBuf::from).collect()
    };

    if paths.is_empty() {
        println!("⚠️  No program documents found");
        return Ok(());
    }

    let mut total = SeedReport::default();
    for path in &paths {
        let report = seed::load_file(&db_manager.pool, path).await?;
        println!(
            "  • {}: {} workouts added, {} already present",
            path.display(),
            report.workouts_created,
            report.workouts_skipped
        );
        total.merge(report);
    }

    println!(
        "✅ Seeding finished: {} new programs, {} new workouts",
        total.programs_created, total.workouts_created
    );
    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = Config::database_url_from_env();
    let db_path = sqlite_file_path(&database_url)
        .ok_or_else(|| anyhow!("Reset is only supported for file-backed SQLite databases"))?;

    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

fn mask_url(url: &str) -> String {
    match sqlite_file_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🏃 Training Bot - Database Tool");
    println!();
    println!("USAGE:");
    println!("    manage [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up      Run database migrations (default)");
    println!("    check            Check database connection, schema and programs");
    println!("    seed [FILES...]  Load program documents (default: all in PROGRAMS_DIR)");
    println!("    reset            Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    help             Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL     Database connection string (default: sqlite:./data/training.db)");
    println!("    PROGRAMS_DIR     Program documents directory (default: ./trainings)");
    println!();
    println!("EXAMPLES:");
    println!("    manage                          # Run migrations");
    println!("    manage seed trainings/run.json  # Load one program");
    println!("    manage reset                    # Reset database (careful!)");
    println!();
}

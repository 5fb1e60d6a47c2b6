//! Operator tooling: seed the demo dataset and recover the admin account.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use nexus_api::auth::password::hash_password;
use nexus_core::user::validate_password_strength;
use nexus_db::repositories::UserRepo;
use nexus_db::seed::{self, SeedPasswords, ADMIN_EMAIL, ADMIN_PASSWORD, USER_PASSWORD};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "nexus-admin", version, about = "Nexus ERP administration commands")]
struct Cli {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert the demo dataset (users, products, leads, clients, claims).
    Seed {
        /// Delete all existing rows first.
        #[arg(long)]
        reset: bool,
    },
    /// Set a new password for an account and clear any lockout.
    ResetAdminPassword {
        #[arg(long, default_value = ADMIN_EMAIL)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "nexus_db=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let pool = nexus_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    nexus_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match cli.command {
        Command::Seed { reset } => {
            let passwords = SeedPasswords {
                admin_hash: hash_password(ADMIN_PASSWORD)?,
                user_hash: hash_password(USER_PASSWORD)?,
            };
            let report = seed::run(&pool, &passwords, reset).await?;

            if report.skipped {
                println!("Admin account already exists, nothing seeded (use --reset to start over)");
                return Ok(());
            }

            println!(
                "Seeded {} users, {} products, {} leads, {} clients, {} claims, {} comments",
                report.users,
                report.products,
                report.leads,
                report.clients,
                report.claims,
                report.comments
            );
            println!();
            println!("Sample credentials:");
            println!("  admin       {ADMIN_EMAIL} / {ADMIN_PASSWORD}");
            println!("  supervisor  supervisor@nexuserp.com / {USER_PASSWORD}");
            println!("  operator    operator1@nexuserp.com / {USER_PASSWORD}");
            println!("  client      client1@example.com / {USER_PASSWORD}");
        }
        Command::ResetAdminPassword { email, password } => {
            validate_password_strength(&password)?;

            let email = nexus_core::validation::normalize_email(&email);
            let Some(user) = UserRepo::find_by_email(&pool, &email).await? else {
                bail!("No user with email {email}");
            };
            UserRepo::update_password(&pool, user.id, &hash_password(&password)?).await?;

            tracing::info!(user_id = user.id, "Password reset");
            println!("Password updated for {email}");
        }
    }

    Ok(())
}

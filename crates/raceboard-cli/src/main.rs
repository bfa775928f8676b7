use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use sqlx::PgPool;

use raceboard_cli::{accounts, rbac};
use raceboard_core::Identity;
use raceboard_db::init_db_pool;
use raceboard_models::RoleId;

#[derive(Parser)]
#[command(name = "raceboard-cli")]
#[command(about = "Raceboard CLI - Administrative tools for Raceboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a login account
    CreateAccount {
        /// Account identifier (student or teacher number)
        #[arg(short = 'a', long)]
        account: Option<String>,

        /// Identity class: student or teacher
        #[arg(short = 'i', long)]
        identity: Option<Identity>,

        /// Role id (defaults to the identity's default role)
        #[arg(short = 'r', long)]
        role: Option<i32>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Import accounts for student and teacher roster rows that have none
    SyncAccounts,
    /// Insert the default roles and permission matrix
    SeedRbac,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url, 5)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateAccount {
            account,
            identity,
            role,
            password,
        } => handle_create_account(&pool, account, identity, role, password).await,
        Commands::SyncAccounts => handle_sync_accounts(&pool).await,
        Commands::SeedRbac => handle_seed_rbac(&pool).await,
    }
}

async fn handle_create_account(
    pool: &PgPool,
    account: Option<String>,
    identity: Option<Identity>,
    role: Option<i32>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let account = match account {
        Some(account) => account,
        None => Input::new()
            .with_prompt("Account")
            .interact_text()
            .context("Failed to read account")?,
    };

    let identity = match identity {
        Some(identity) => identity,
        None => {
            let choices = [Identity::Student, Identity::Teacher];
            let picked = Select::new()
                .with_prompt("Identity")
                .items(&choices)
                .default(0)
                .interact()
                .context("Failed to read identity")?;
            choices[picked]
        }
    };

    let role_id = role
        .map(RoleId::new)
        .unwrap_or_else(|| accounts::default_role_for(identity, &account));

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    accounts::create_account(pool, &account, &password, identity, role_id)
        .await
        .context("Error creating account")?;

    println!("\n✅ Account created successfully!");
    println!("   Account:  {}", account);
    println!("   Identity: {}", identity);
    println!("   Role:     {}", role_id);
    Ok(())
}

async fn handle_sync_accounts(pool: &PgPool) -> anyhow::Result<()> {
    println!("🔄 Syncing accounts from rosters...");
    let report = accounts::sync_accounts(pool)
        .await
        .context("Error syncing accounts")?;

    println!("\n✅ Sync complete");
    println!("   Students imported: {}", report.students_imported);
    println!("   Teachers imported: {}", report.teachers_imported);
    println!("   Already present:   {}", report.skipped);
    Ok(())
}

async fn handle_seed_rbac(pool: &PgPool) -> anyhow::Result<()> {
    println!("🌱 Seeding roles and permissions...");
    let report = rbac::seed_rbac(pool).await.context("Error seeding RBAC data")?;

    println!("\n✅ Seeding complete");
    println!("   Roles created:       {}", report.roles_created);
    println!("   Permissions created: {}", report.permissions_created);
    println!("   Grants created:      {}", report.grants_created);
    Ok(())
}

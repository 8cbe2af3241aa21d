use campaign_site::{
    MIGRATOR,
    auth::ADMIN_ROLE,
    error::StoreError,
    models::NewUser,
    repository::{PostgresRepository, Repository},
};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;

/// Creates an admin account for the dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    email: String,

    #[arg(long)]
    name: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let email = args.email.trim().to_lowercase();
    if email.is_empty() || args.name.trim().is_empty() || args.password.is_empty() {
        eprintln!("email, name and password must not be empty");
        return ExitCode::FAILURE;
    }

    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(&args.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("cannot connect to the database: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = MIGRATOR.run(&pool).await {
        eprintln!("cannot apply migrations: {err}");
        return ExitCode::FAILURE;
    }

    let password = match bcrypt::hash(&args.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            eprintln!("cannot hash password: {err}");
            return ExitCode::FAILURE;
        }
    };

    let repo = PostgresRepository::new(pool.clone());
    let result = repo
        .create_user(NewUser {
            email: email.clone(),
            name: args.name.trim().to_string(),
            password,
            role: ADMIN_ROLE.to_string(),
        })
        .await;
    pool.close().await;

    match result {
        Ok(user) => {
            println!("created admin {} ({})", user.email, user.id);
            ExitCode::SUCCESS
        }
        Err(StoreError::UniqueViolation(_)) => {
            eprintln!("a user with email {email} already exists");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("cannot create admin: {err}");
            ExitCode::FAILURE
        }
    }
}

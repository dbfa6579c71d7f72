//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! kultr-cli user create -n "Kim Lee" -e kim@kultr.store -r admin
//! kultr-cli user list --search kim
//! kultr-cli user stats
//! ```

use thiserror::Error;

use kultr_admin::db::{RepositoryError, UserRepository, UserStore};
use kultr_admin::models::{User, UserInput, UserInputError, UserListQuery};

use super::CommandError;

/// Errors that can occur during user commands.
#[derive(Debug, Error)]
pub enum UserCommandError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("{0}")]
    Invalid(#[from] UserInputError),

    #[error("User already exists with email: {0}")]
    UserExists(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for UserCommandError {
    fn from(e: RepositoryError) -> Self {
        Self::Repository(e)
    }
}

async fn repository() -> Result<UserRepository, UserCommandError> {
    Ok(UserRepository::new(super::connect().await?))
}

fn summary(user: &User) -> String {
    format!(
        "{:>5}  {:<24} {:<32} {:<8} {}",
        user.id.as_i32(),
        user.name,
        user.email.as_str(),
        user.role,
        user.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// Create a user. Role defaults to `user` when blank.
pub async fn create(name: &str, email: &str, role: Option<&str>) -> Result<User, UserCommandError> {
    let new_user = UserInput {
        name: Some(name.to_owned()),
        email: Some(email.to_owned()),
        role: role.map(str::to_owned),
    }
    .validate()?;

    let repo = repository().await?;
    let user = repo.create(&new_user).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => UserCommandError::UserExists(email.trim().to_owned()),
        other => other.into(),
    })?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );
    Ok(user)
}

/// Print the newest users, optionally filtered by name or email.
pub async fn list(search: Option<String>, limit: i64) -> Result<(), UserCommandError> {
    let query = UserListQuery {
        search,
        page: Some(1),
        limit: Some(limit),
    };
    let users = repository().await?.list(&query).await?;

    #[allow(clippy::print_stdout)]
    {
        if users.is_empty() {
            println!("No users found");
        }
        for user in &users {
            println!("{}", summary(user));
        }
    }
    Ok(())
}

/// Print the dashboard counters.
pub async fn stats() -> Result<(), UserCommandError> {
    let stats = repository().await?.stats().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Total users:        {}", stats.total_users);
        println!("Active (30 days):   {}", stats.active_users);
        println!("Admins:             {}", stats.admin_users);
        println!("New today:          {}", stats.new_users_today);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("User {0} doesn't exist")]
    UserNotFound(String),

    #[error("User with id {0} doesn't exist")]
    UserIdNotFound(i64),

    #[error("Todo {0} doesn't exist")]
    TodoNotFound(i64),

    #[error("Todo {todo_id} doesn't exist for user {username}")]
    TodoNotFoundForUser { todo_id: i64, username: String },

    #[error("Todo {todo_id} doesn't belong to {username}")]
    NotOwner { todo_id: i64, username: String },

    #[error("Username or email already taken")]
    UserExists,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl Error {
    /// Lookup and ownership failures are printed and the command ends normally;
    /// everything else is a fault.
    pub fn is_report(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound(_)
                | Error::UserIdNotFound(_)
                | Error::TodoNotFound(_)
                | Error::TodoNotFoundForUser { .. }
                | Error::NotOwner { .. }
                | Error::UserExists
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

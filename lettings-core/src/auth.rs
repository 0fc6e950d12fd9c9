use argon2::{
    password_hash::{Encoding, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use log::info;
use rand::rngs::OsRng;
use thiserror::Error;
use tokio::task::spawn_blocking;

use crate::{fields, AccountData, DatabaseError, NewAccount, SharedDatabase, ValidationError};

/// Registers accounts and checks credentials
pub struct Auth {
    db: SharedDatabase,
    argon: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is incorrect, without saying which
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct NewPlainAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The parts of an account that are safe to hand out
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub name: String,
    pub email: String,
}

impl Auth {
    pub fn new(db: &SharedDatabase) -> Self {
        Self {
            db: db.clone(),
            argon: Argon2::default(),
        }
    }

    /// Creates an account, storing only a salted hash of the password
    pub async fn register(&self, new_account: NewPlainAccount) -> Result<AccountProfile, AuthError> {
        let name = fields::required_text("name", Some(new_account.name))?;
        let email = fields::required_text("email", Some(new_account.email))?;
        let password = fields::required_text("password", Some(new_account.password))?;

        let hashed_password = self.hash(password).await?;

        let account = self
            .db
            .create_account(NewAccount {
                name,
                email,
                password: hashed_password,
            })
            .await
            .map_err(AuthError::Db)?;

        info!("Account registered for {}", account.email);
        Ok(account.into())
    }

    /// Checks the credentials, returning the account's profile if they match
    pub async fn authenticate(&self, credentials: Credentials) -> Result<AccountProfile, AuthError> {
        let email = fields::required_text("email", Some(credentials.email))?;
        let password = fields::required_text("password", Some(credentials.password))?;

        let account = self
            .db
            .account_by_email(&email)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => AuthError::InvalidCredentials,
                err => AuthError::Db(err),
            })?;

        let stored_password = PasswordHash::parse(&account.password, Encoding::default())
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        self.argon
            .verify_password(password.as_bytes(), &stored_password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(account.into())
    }

    async fn hash(&self, password: String) -> Result<String, AuthError> {
        let argon = self.argon.clone();

        spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);

            argon
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AuthError::HashError(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::HashError(e.to_string()))?
    }
}

impl From<AccountData> for AccountProfile {
    fn from(account: AccountData) -> Self {
        Self {
            name: account.name,
            email: account.email,
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::{Database, MemoryDatabase};

    fn setup() -> (Arc<MemoryDatabase>, Auth) {
        let db = Arc::new(MemoryDatabase::new());
        let shared: SharedDatabase = db.clone();

        (db, Auth::new(&shared))
    }

    fn ana() -> NewPlainAccount {
        NewPlainAccount {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn registered_account_can_log_in() {
        let (_, auth) = setup();
        auth.register(ana()).await.unwrap();

        let profile = auth
            .authenticate(Credentials {
                email: "ana@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            profile,
            AccountProfile {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn password_is_never_stored_in_plaintext() {
        let (db, auth) = setup();
        auth.register(ana()).await.unwrap();

        let stored = db.account_by_email("ana@example.com").await.unwrap();

        assert_ne!(stored.password, "correct horse");
        assert!(stored.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (db, auth) = setup();
        auth.register(ana()).await.unwrap();

        let mut again = ana();
        again.name = "Someone else".to_string();

        assert!(matches!(
            auth.register(again).await,
            Err(AuthError::Db(DatabaseError::Conflict { .. }))
        ));
        assert_eq!(db.account_by_email("ana@example.com").await.unwrap().name, "Ana");
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let (_, auth) = setup();

        let mut nameless = ana();
        nameless.name = String::new();

        assert!(matches!(
            auth.register(nameless).await,
            Err(AuthError::Invalid(ValidationError::MissingField("name")))
        ));
    }

    #[tokio::test]
    async fn failures_do_not_reveal_which_part_was_wrong() {
        let (_, auth) = setup();
        auth.register(ana()).await.unwrap();

        let wrong_password = auth
            .authenticate(Credentials {
                email: "ana@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        let unknown_email = auth
            .authenticate(Credentials {
                email: "bob@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read `ADMIN_DATABASE_URL` (or `DATABASE_URL`) after loading `.env`.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();
    std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

mod credentials;

pub use credentials::{CredentialProvider, EnvCredential, FileCredential};

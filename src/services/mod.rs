//! Service layer: the operations the CLI and library callers use.

pub mod credential_check;
pub mod key_restriction;

pub use credential_check::{CredentialCheck, FieldStatus};
pub use key_restriction::KeyRestrictionService;

//! Value Objects - Immutable, identity-less domain primitives

mod provider_kind;

pub use provider_kind::ProviderKind;

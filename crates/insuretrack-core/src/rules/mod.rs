//! Input validation applied before anything is written

pub mod validation;

pub use validation::{
    validate_claim_input, validate_claim_update, validate_password, validate_policy_input,
    validate_registration,
};

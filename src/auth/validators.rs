// src/auth/validators.rs

use super::models::{LoginRequest, RegisterRequest, Role};
use crate::common::helpers::looks_like_email;
use crate::common::{ValidationResult, Validator};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 72; // bcrypt ignores bytes past 72

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let email = data.email.trim();
        if email.is_empty() {
            result.add_error("email", "Email is required");
        } else if !looks_like_email(email) {
            result.add_error("email", "Email is not valid");
        }

        if data.password.len() < MIN_PASSWORD_LENGTH {
            result.add_error("password", "Password must be at least 8 characters");
        } else if data.password.len() > MAX_PASSWORD_LENGTH {
            result.add_error("password", "Password must be at most 72 bytes");
        }

        if let Some(role) = &data.role {
            if Role::parse(role).is_none() {
                result.add_error("role", "Role must be 'candidate' or 'recruiter'");
            }
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        }
        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}

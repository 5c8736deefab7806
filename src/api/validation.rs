//! Field-level request validation.
//!
//! Each `parse_*` function checks every field and either returns the typed
//! input for the service layer or the full list of field errors, so the
//! client can render them next to the form fields. Nothing is persisted
//! when the list is non-empty.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::models::{
    AddressInput, AddressKind, BathroomType, GenderPreference, RoomInput, RoomType,
};
use crate::services::{OwnerProfileInput, RegisterInput};

use super::types::{AddressPayload, OwnerProfilePayload, RegisterPayload, RoomPayload};

/// Three letter-digit pairs, e.g. A1B2C3.
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z][0-9]){3}$").expect("postal code regex"));

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub fn parse_register(payload: &RegisterPayload) -> Result<RegisterInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    if payload.first_name.trim().is_empty() {
        errors.push(FieldError::new("first_name", "firstName should not be empty"));
    }
    if payload.last_name.trim().is_empty() {
        errors.push(FieldError::new("last_name", "lastName should not be empty"));
    }
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "email must be a valid address"));
    }
    if !is_strong_password(&payload.password) {
        errors.push(FieldError::new(
            "password",
            "password must be at least 8 characters with lower and upper case letters, a number and a symbol",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegisterInput {
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        email: payload.email.trim().to_string(),
        password: payload.password.clone(),
    })
}

pub fn parse_room(payload: &RoomPayload) -> Result<RoomInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let room_type = RoomType::from_code(&payload.room_type);
    if room_type.is_none() {
        errors.push(FieldError::new(
            "room_type",
            "Select a valid option for Room Type",
        ));
    }

    let bathroom_type = BathroomType::from_code(&payload.bathroom_type);
    if bathroom_type.is_none() {
        errors.push(FieldError::new(
            "bathroom_type",
            "Select a valid option for Bathroom",
        ));
    }

    let gender = GenderPreference::from_code(&payload.gender);
    if gender.is_none() {
        errors.push(FieldError::new("gender", "Select a valid option for Gender"));
    }

    if payload.description.trim().is_empty() {
        errors.push(FieldError::new("description", "description should not be empty"));
    }
    if payload.rent_price < 100 {
        errors.push(FieldError::new("rent_price", "rentPrice must not be less than 100"));
    }
    if !(10..=51).contains(&payload.size) {
        errors.push(FieldError::new("size", "size must be between 10 and 51"));
    }
    if payload.number_of_rooms < 1 {
        errors.push(FieldError::new(
            "number_of_rooms",
            "numberOfRooms must not be less than 1",
        ));
    }

    validate_address(&payload.address, &mut errors);

    match (room_type, bathroom_type, gender) {
        (Some(room_type), Some(bathroom_type), Some(gender)) if errors.is_empty() => {
            Ok(RoomInput {
                room_type,
                bathroom_type,
                gender,
                description: payload.description.clone(),
                rent_price: payload.rent_price,
                size: payload.size,
                number_of_rooms: payload.number_of_rooms,
                address: address_input(&payload.address),
            })
        }
        _ => Err(errors),
    }
}

pub fn parse_owner_profile(
    payload: &OwnerProfilePayload,
) -> Result<OwnerProfileInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let kind = AddressKind::from_code(&payload.kind);
    if kind.is_none() {
        errors.push(FieldError::new("kind", "Select a valid address type"));
    }

    if !is_valid_phone(&payload.phone) {
        errors.push(FieldError::new("phone", "phone must be a valid phone number"));
    }

    validate_address(&payload.address, &mut errors);

    match kind {
        Some(kind) if errors.is_empty() => {
            let address = address_input(&payload.address);
            Ok(OwnerProfileInput {
                kind,
                street: address.street,
                number: address.number,
                other: address.other,
                postal_code: address.postal_code,
                city_id: address.city_id,
                phone: payload.phone.clone(),
            })
        }
        _ => Err(errors),
    }
}

/// Exactly two picture ids, per the pairwise swap contract.
pub fn validate_swap_ids(ids: &[i32]) -> Result<(), Vec<FieldError>> {
    if ids.len() != 2 {
        return Err(vec![FieldError::new(
            "ids",
            "exactly two picture ids are required",
        )]);
    }
    Ok(())
}

fn validate_address(payload: &AddressPayload, errors: &mut Vec<FieldError>) {
    if payload.street.trim().is_empty() {
        errors.push(FieldError::new("street", "street should not be empty"));
    } else if payload.street.len() > 100 {
        errors.push(FieldError::new(
            "street",
            "street must be shorter than or equal to 100 characters",
        ));
    }

    if payload.number < 1 {
        errors.push(FieldError::new("number", "number must not be less than 1"));
    }

    if let Some(other) = &payload.other
        && other.len() > 100
    {
        errors.push(FieldError::new(
            "other",
            "other must be shorter than or equal to 100 characters",
        ));
    }

    if payload.postal_code.len() != 6 {
        errors.push(FieldError::new(
            "postal_code",
            "postalCode must have exactly 6 characters",
        ));
    } else if !POSTAL_CODE.is_match(&payload.postal_code) {
        errors.push(FieldError::new("postal_code", "postalCode is not valid"));
    }

    if payload.city_id < 1 {
        errors.push(FieldError::new("city_id", "cityId must not be less than 1"));
    }
}

fn address_input(payload: &AddressPayload) -> AddressInput {
    AddressInput {
        street: payload.street.clone(),
        number: payload.number,
        other: payload.other.clone(),
        postal_code: payload.postal_code.clone(),
        city_id: payload.city_id,
    }
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Minimum 8 chars with at least one lowercase, uppercase, digit and
/// symbol.
fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// Ten digits after stripping common separators (Canadian numbers, with or
/// without the leading 1).
fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        10 => true,
        11 => digits.starts_with('1'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> AddressPayload {
        AddressPayload {
            street: "Main St".to_string(),
            number: 123,
            other: Some("Near the park".to_string()),
            postal_code: "a1b2c3".to_string(),
            city_id: 1,
        }
    }

    fn room() -> RoomPayload {
        RoomPayload {
            room_type: "I".to_string(),
            bathroom_type: "E".to_string(),
            gender: "F".to_string(),
            description: "Nice room".to_string(),
            rent_price: 500,
            size: 20,
            number_of_rooms: 2,
            address: address(),
        }
    }

    #[test]
    fn test_valid_room_payload() {
        let input = parse_room(&room()).unwrap();
        assert_eq!(input.rent_price, 500);
        assert_eq!(input.address.city_id, 1);
    }

    #[test]
    fn test_room_field_errors_accumulate() {
        let mut payload = room();
        payload.rent_price = 50;
        payload.size = 5;
        payload.room_type = "X".to_string();

        let errors = parse_room(&payload).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"rent_price"));
        assert!(fields.contains(&"size"));
        assert!(fields.contains(&"room_type"));
    }

    #[test]
    fn test_postal_code_rules() {
        let mut payload = room();
        payload.address.postal_code = "A1B2C".to_string();
        assert!(parse_room(&payload).is_err());

        payload.address.postal_code = "AAB2C3".to_string();
        assert!(parse_room(&payload).is_err());

        payload.address.postal_code = "A1B2C3".to_string();
        assert!(parse_room(&payload).is_ok());
    }

    #[test]
    fn test_strong_password() {
        assert!(is_strong_password("Str0ng!pass"));
        assert!(!is_strong_password("weakpass"));
        assert!(!is_strong_password("Short1!"));
        assert!(!is_strong_password("alllower1!"));
        assert!(!is_strong_password("NoSymbol1"));
    }

    #[test]
    fn test_register_weak_password_rejected() {
        let payload = RegisterPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "weakpass".to_string(),
        };

        let errors = parse_register(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("no at sign"));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("416-555-0199"));
        assert!(is_valid_phone("(416) 555 0199"));
        assert!(is_valid_phone("14165550199"));
        assert!(!is_valid_phone("555-0199"));
        assert!(!is_valid_phone("24165550199"));
    }

    #[test]
    fn test_swap_requires_two_ids() {
        assert!(validate_swap_ids(&[1, 2]).is_ok());
        assert!(validate_swap_ids(&[1]).is_err());
        assert!(validate_swap_ids(&[1, 2, 3]).is_err());
    }
}

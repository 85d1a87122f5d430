//! The rules an entry must satisfy before it can be stored.

use rust_decimal::Decimal;

use crate::{BusinessRuleError, Entry};

/// The range of years accepted for an entry, i.e., years written with four digits.
const VALID_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

/// Check `entry` against the business rules for entries.
///
/// The rules are checked in this order and the first one that fails is
/// returned:
/// 1. the description is set and is not blank,
/// 2. the month is set and is between 1 and 12,
/// 3. the year is set and has four digits,
/// 4. the entry belongs to a user,
/// 5. the value is set and greater than zero,
/// 6. the entry type is set.
///
/// # Errors
///
/// Returns the [BusinessRuleError] for the first rule that `entry` breaks.
pub fn validate_entry(entry: &Entry) -> Result<(), BusinessRuleError> {
    if entry
        .description
        .as_deref()
        .is_none_or(is_blank)
    {
        return Err(BusinessRuleError::InvalidDescription);
    }

    if entry.month.is_none_or(|month| !(1..=12).contains(&month)) {
        return Err(BusinessRuleError::InvalidMonth);
    }

    if entry.year.is_none_or(|year| !VALID_YEARS.contains(&year)) {
        return Err(BusinessRuleError::InvalidYear);
    }

    if entry.user_id.is_none() {
        return Err(BusinessRuleError::MissingUser);
    }

    if entry.value.is_none_or(|value| value <= Decimal::ZERO) {
        return Err(BusinessRuleError::InvalidValue);
    }

    if entry.entry_type.is_none() {
        return Err(BusinessRuleError::MissingEntryType);
    }

    Ok(())
}

/// Whether `description` only holds ASCII control characters and spaces.
///
/// Other whitespace, such as a non-breaking space, counts as content.
fn is_blank(description: &str) -> bool {
    description.trim_matches(|c: char| c <= ' ').is_empty()
}

//! Value normalization.
//!
//! One pure function per [`ColumnClass`], each mapping a [`RawValue`] to its
//! canonical string. None of them fail: values that cannot be normalized
//! become an empty string or keep their text form.

pub mod datetime;
pub mod numeric;
pub mod pii;
pub mod text;

use recon_model::{ColumnClass, RawValue};

pub use datetime::{normalize_datetime, parse_datetime};
pub use numeric::{format_cents, normalize_numeric};
pub use pii::{
    mask_email, mask_national_id, mask_note, mask_phone, normalize_email, normalize_national_id,
    normalize_note, normalize_phone,
};
pub use text::normalize_text;

/// Normalize one value according to its column class.
pub fn normalize_value(class: ColumnClass, value: &RawValue) -> String {
    match class {
        ColumnClass::Datetime => normalize_datetime(value),
        ColumnClass::PiiEmail => normalize_email(value),
        ColumnClass::PiiNationalId => normalize_national_id(value),
        ColumnClass::PiiNote => normalize_note(value),
        ColumnClass::PiiPhone => normalize_phone(value),
        ColumnClass::Numeric => normalize_numeric(value),
        ColumnClass::Text => normalize_text(value),
    }
}
